//! Comorbidity assignment for patient records.
//!
//! Records are independent, so they are processed in parallel on the rayon
//! pool. Output rows keep the input record order.

use icd_model::{ComorbidityMap, ItemFailure, ParseOptions};
use icd_normalization::parse_all;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::charlson::{charlson_score, is_charlson_map};

/// Raw diagnosis codes recorded for one patient or encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientRecord {
    pub id: String,
    pub codes: Vec<String>,
}

impl PatientRecord {
    pub fn new(id: impl Into<String>, codes: Vec<String>) -> Self {
        Self {
            id: id.into(),
            codes,
        }
    }
}

/// Group `(id, code)` pairs into records, keeping ids in order of first
/// appearance.
pub fn group_records<I, K, C>(pairs: I) -> Vec<PatientRecord>
where
    I: IntoIterator<Item = (K, C)>,
    K: Into<String>,
    C: Into<String>,
{
    let mut records: Vec<PatientRecord> = Vec::new();
    let mut positions: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    for (id, code) in pairs {
        let id = id.into();
        let position = *positions.entry(id.clone()).or_insert_with(|| {
            records.push(PatientRecord::new(id, Vec::new()));
            records.len() - 1
        });
        records[position].codes.push(code.into());
    }
    records
}

/// Categories matched for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComorbidityRow {
    pub id: String,
    /// Matched category names, in map definition order.
    pub categories: Vec<String>,
    /// One flag per map category, aligned with [`ComorbidityTable::categories`].
    pub flags: Vec<bool>,
    /// Codes of this record that could not be parsed.
    pub failures: Vec<ItemFailure>,
}

/// Per-record comorbidity flags for one map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComorbidityTable {
    pub map: String,
    pub categories: Vec<String>,
    pub rows: Vec<ComorbidityRow>,
}

impl ComorbidityTable {
    pub fn failure_count(&self) -> usize {
        self.rows.iter().map(|row| row.failures.len()).sum()
    }

    /// Records with at least one matched category, per category.
    pub fn category_counts(&self) -> Vec<(&str, usize)> {
        self.categories
            .iter()
            .enumerate()
            .map(|(position, name)| {
                let count = self.rows.iter().filter(|row| row.flags[position]).count();
                (name.as_str(), count)
            })
            .collect()
    }

    /// Charlson index per row, aligned with [`ComorbidityTable::rows`].
    ///
    /// `None` unless the table was built from the Charlson map; other maps
    /// may reuse category names such as `CHF` with different definitions.
    pub fn charlson_scores(&self) -> Option<Vec<u32>> {
        if !is_charlson_map(&self.map) {
            return None;
        }
        Some(
            self.rows
                .iter()
                .map(|row| charlson_score(row.categories.as_slice()))
                .collect(),
        )
    }
}

/// Match every record's codes against `map`.
///
/// Codes that fail to parse are reported on their row and otherwise
/// ignored; they never abort the other records.
pub fn comorbid(
    records: &[PatientRecord],
    map: &ComorbidityMap,
    options: &ParseOptions,
) -> ComorbidityTable {
    let categories: Vec<String> = map.categories().map(str::to_string).collect();
    let rows: Vec<ComorbidityRow> = records
        .par_iter()
        .map(|record| assign(record, map, categories.len(), options))
        .collect();

    let table = ComorbidityTable {
        map: map.name().to_string(),
        categories,
        rows,
    };
    let failures = table.failure_count();
    if failures > 0 {
        warn!(
            map = %table.map,
            failures,
            "some codes could not be parsed during comorbidity assignment"
        );
    }
    debug!(map = %table.map, records = table.rows.len(), "assigned comorbidities");
    table
}

fn assign(
    record: &PatientRecord,
    map: &ComorbidityMap,
    category_count: usize,
    options: &ParseOptions,
) -> ComorbidityRow {
    let outcome = parse_all(&record.codes, options);
    let mut flags = vec![false; category_count];
    for code in outcome.values() {
        for position in map.matching_positions(code) {
            flags[position] = true;
        }
    }
    let categories = map
        .categories()
        .zip(&flags)
        .filter(|(_, flagged)| **flagged)
        .map(|(name, _)| name.to_string())
        .collect();
    ComorbidityRow {
        id: record.id.clone(),
        categories,
        flags,
        failures: outcome.failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouping_keeps_first_appearance_order() {
        let records = group_records([("b", "4280"), ("a", "042"), ("b", "4019")]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "b");
        assert_eq!(records[0].codes, vec!["4280", "4019"]);
        assert_eq!(records[1].codes, vec!["042"]);
    }
}
