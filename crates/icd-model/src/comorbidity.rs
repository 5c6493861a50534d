//! Named groupings of codes into clinical condition categories.
//!
//! A code listed in a category covers itself and every code whose short
//! form extends it: listing `428` in `CHF` matches `4280` and `42820`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::code::{Code, CodeKey, CodeKind};
use crate::code_set::CodeSet;

/// Category name -> codes, for one published mapping (e.g. "charlson").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "MapRepr", into = "MapRepr")]
pub struct ComorbidityMap {
    name: String,
    categories: Vec<(String, CodeSet)>,
    /// (kind, short prefix) -> category positions.
    prefixes: HashMap<CodeKey, Vec<usize>>,
}

impl ComorbidityMap {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add codes to a category, creating it on first use.
    pub fn insert(&mut self, category: &str, codes: impl IntoIterator<Item = Code>) {
        let position = match self.position(category) {
            Some(position) => position,
            None => {
                self.categories.push((category.to_string(), CodeSet::new()));
                self.categories.len() - 1
            }
        };
        for code in codes {
            let code = code.padded();
            let key = code.key();
            if self.categories[position].1.insert(code) {
                let owners = self.prefixes.entry(key).or_default();
                if !owners.contains(&position) {
                    owners.push(position);
                }
            }
        }
    }

    fn position(&self, category: &str) -> Option<usize> {
        self.categories
            .iter()
            .position(|(name, _)| name.eq_ignore_ascii_case(category))
    }

    /// Category names in definition order.
    pub fn categories(&self) -> impl Iterator<Item = &str> + '_ {
        self.categories.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn get(&self, category: &str) -> Option<&CodeSet> {
        self.position(category).map(|position| &self.categories[position].1)
    }

    /// Whether `code` falls under `category`.
    pub fn contains(&self, category: &str, code: &Code) -> bool {
        self.position(category)
            .is_some_and(|position| self.matching_positions(code).contains(&position))
    }

    /// Categories `code` belongs to, in definition order.
    pub fn categories_for(&self, code: &Code) -> Vec<&str> {
        self.matching_positions(code)
            .into_iter()
            .map(|position| self.categories[position].0.as_str())
            .collect()
    }

    /// Positions of matching categories, sorted and without repeats.
    pub fn matching_positions(&self, code: &Code) -> Vec<usize> {
        let short = code.key().short;
        let mut matches: Vec<usize> = (1..=short.len())
            .filter_map(|len| self.prefixes.get(&prefix_key(code.kind(), &short[..len])))
            .flatten()
            .copied()
            .collect();
        matches.sort_unstable();
        matches.dedup();
        matches
    }
}

fn prefix_key(kind: CodeKind, prefix: &str) -> CodeKey {
    CodeKey {
        kind,
        short: prefix.to_string(),
    }
}

#[derive(Serialize, Deserialize)]
struct MapRepr {
    name: String,
    categories: Vec<CategoryRepr>,
}

#[derive(Serialize, Deserialize)]
struct CategoryRepr {
    name: String,
    codes: CodeSet,
}

impl From<MapRepr> for ComorbidityMap {
    fn from(repr: MapRepr) -> Self {
        let mut map = ComorbidityMap::new(repr.name);
        for category in repr.categories {
            map.insert(&category.name, category.codes);
        }
        map
    }
}

impl From<ComorbidityMap> for MapRepr {
    fn from(map: ComorbidityMap) -> Self {
        MapRepr {
            name: map.name,
            categories: map
                .categories
                .into_iter()
                .map(|(name, codes)| CategoryRepr { name, codes })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::CodeForm;

    fn icd9(major: &str, minor: &str) -> Code {
        Code::new(CodeKind::Icd9, major, minor, CodeForm::Short).unwrap()
    }

    #[test]
    fn listed_code_covers_its_descendants() {
        let mut map = ComorbidityMap::new("charlson");
        map.insert("CHF", [icd9("428", "")]);
        map.insert("MI", [icd9("410", ""), icd9("412", "")]);
        assert_eq!(map.categories_for(&icd9("428", "20")), vec!["CHF"]);
        assert!(map.contains("mi", &icd9("410", "01")));
        assert!(map.categories_for(&icd9("401", "9")).is_empty());
    }

    #[test]
    fn unpadded_segments_match_padded_entries() {
        let mut map = ComorbidityMap::new("test");
        map.insert("Infection", [icd9("1", "")]);
        assert_eq!(map.categories_for(&icd9("001", "1")), vec!["Infection"]);
        assert_eq!(map.categories_for(&icd9("1", "9")), vec!["Infection"]);
        assert_eq!(map.get("Infection").unwrap().to_strings(), vec!["001"]);
    }

    #[test]
    fn kinds_do_not_cross_match() {
        let mut map = ComorbidityMap::new("test");
        map.insert("HIV", [icd9("042", "")]);
        let icd10 = Code::new(CodeKind::Icd10, "B20", "", CodeForm::Short).unwrap();
        assert!(map.categories_for(&icd10).is_empty());
    }

    #[test]
    fn category_order_is_definition_order() {
        let mut map = ComorbidityMap::new("test");
        map.insert("Renal", [icd9("585", "")]);
        map.insert("DM", [icd9("250", "")]);
        map.insert("renal", [icd9("586", "")]);
        assert_eq!(map.categories().collect::<Vec<_>>(), vec!["Renal", "DM"]);
        assert_eq!(map.get("RENAL").unwrap().len(), 2);
    }
}
