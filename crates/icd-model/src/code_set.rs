use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::code::{Code, CodeForm, CodeKey};

/// Ordered collection of distinct codes.
///
/// Two codes are the same entry when they share kind and short form, so
/// `391.0` and `3910` collapse to whichever was inserted first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Code>", into = "Vec<Code>")]
pub struct CodeSet {
    codes: Vec<Code>,
    keys: HashSet<CodeKey>,
}

impl CodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a code; returns false when an equivalent code is already present.
    pub fn insert(&mut self, code: Code) -> bool {
        if !self.keys.insert(code.key()) {
            return false;
        }
        self.codes.push(code);
        true
    }

    pub fn contains(&self, code: &Code) -> bool {
        self.keys.contains(&code.key())
    }

    pub fn contains_key(&self, key: &CodeKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Code> {
        self.codes.iter()
    }

    pub fn as_slice(&self) -> &[Code] {
        &self.codes
    }

    /// Copy of the set with every code rendered in `form`.
    pub fn with_form(&self, form: CodeForm) -> Self {
        self.iter().map(|code| code.with_form(form)).collect()
    }

    /// Rendered text of each code in its current form.
    pub fn to_strings(&self) -> Vec<String> {
        self.iter().map(ToString::to_string).collect()
    }

    /// Short forms, independent of how each code is currently rendered.
    pub fn short_forms(&self) -> Vec<String> {
        self.iter().map(Code::short).collect()
    }
}

impl PartialEq for CodeSet {
    fn eq(&self, other: &Self) -> bool {
        self.codes.len() == other.codes.len()
            && self
                .codes
                .iter()
                .zip(&other.codes)
                .all(|(left, right)| left.key() == right.key())
    }
}

impl Eq for CodeSet {}

impl FromIterator<Code> for CodeSet {
    fn from_iter<I: IntoIterator<Item = Code>>(iter: I) -> Self {
        let mut set = Self::new();
        for code in iter {
            set.insert(code);
        }
        set
    }
}

impl Extend<Code> for CodeSet {
    fn extend<I: IntoIterator<Item = Code>>(&mut self, iter: I) {
        for code in iter {
            self.insert(code);
        }
    }
}

impl IntoIterator for CodeSet {
    type Item = Code;
    type IntoIter = std::vec::IntoIter<Code>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.into_iter()
    }
}

impl<'a> IntoIterator for &'a CodeSet {
    type Item = &'a Code;
    type IntoIter = std::slice::Iter<'a, Code>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.iter()
    }
}

impl From<Vec<Code>> for CodeSet {
    fn from(codes: Vec<Code>) -> Self {
        codes.into_iter().collect()
    }
}

impl From<CodeSet> for Vec<Code> {
    fn from(set: CodeSet) -> Self {
        set.codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::CodeKind;

    fn code(major: &str, minor: &str, form: CodeForm) -> Code {
        Code::new(CodeKind::Icd9, major, minor, form).unwrap()
    }

    #[test]
    fn equivalent_forms_are_one_entry() {
        let mut set = CodeSet::new();
        assert!(set.insert(code("391", "0", CodeForm::Decimal)));
        assert!(!set.insert(code("391", "0", CodeForm::Short)));
        assert_eq!(set.len(), 1);
        assert_eq!(set.to_strings(), vec!["391.0"]);
    }

    #[test]
    fn keeps_insertion_order() {
        let set: CodeSet = vec![
            code("392", "", CodeForm::Short),
            code("391", "", CodeForm::Short),
        ]
        .into();
        assert_eq!(set.short_forms(), vec!["392", "391"]);
    }
}
