//! Per-item outcomes for operations over many inputs.

use serde::Serialize;

use crate::error::IcdError;

/// One input that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    /// Position of the input in the original sequence.
    pub index: usize,
    pub input: String,
    pub error: IcdError,
}

/// Results aligned with the inputs, plus the failures that left gaps.
///
/// `results[i]` is `None` exactly when `failures` holds an entry with
/// `index == i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutcome<T> {
    pub results: Vec<Option<T>>,
    pub failures: Vec<ItemFailure>,
}

impl<T> Default for BatchOutcome<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> BatchOutcome<T> {
    /// Run `op` over every input, collecting failures instead of stopping.
    pub fn collect<S, F>(inputs: &[S], mut op: F) -> Self
    where
        S: AsRef<str>,
        F: FnMut(&str) -> Result<T, IcdError>,
    {
        let mut outcome = Self {
            results: Vec::with_capacity(inputs.len()),
            failures: Vec::new(),
        };
        for (index, input) in inputs.iter().enumerate() {
            let input = input.as_ref();
            match op(input) {
                Ok(value) => outcome.results.push(Some(value)),
                Err(error) => {
                    outcome.results.push(None);
                    outcome.failures.push(ItemFailure {
                        index,
                        input: input.to_string(),
                        error,
                    });
                }
            }
        }
        outcome
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Successful values in input order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.results.iter().flatten()
    }

    pub fn into_values(self) -> Vec<T> {
        self.results.into_iter().flatten().collect()
    }

    pub fn map<U, F>(self, mut op: F) -> BatchOutcome<U>
    where
        F: FnMut(T) -> U,
    {
        BatchOutcome {
            results: self
                .results
                .into_iter()
                .map(|value| value.map(&mut op))
                .collect(),
            failures: self.failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_leave_aligned_gaps() {
        let outcome = BatchOutcome::collect(&["1", "x", "3"], |input| {
            input
                .parse::<u32>()
                .map_err(|_| IcdError::parse(input, "not a number"))
        });
        assert_eq!(outcome.results, vec![Some(1), None, Some(3)]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].index, 1);
        assert_eq!(outcome.into_values(), vec![1, 3]);
    }
}
