//! Comorbidity map loading.
//!
//! Comorbidity CSV files list one code prefix per row:
//!
//! ```text
//! map,category,kind,code
//! Charlson,CHF,icd9,428
//! Charlson,CHF,icd10,I50
//! ```
//!
//! Codes are written in short form; a row covers the listed code and every
//! code whose short form extends it. One file may hold several maps.

use std::path::Path;

use icd_model::{ComorbidityMap, FormHint, ParseOptions};
use serde::Deserialize;

use crate::error::{Result, StandardsError};
use crate::hierarchy::parse_kind;

/// Row from comorbidity CSV files.
#[derive(Debug, Deserialize)]
struct ComorbidityCsvRow {
    map: String,
    category: String,
    kind: String,
    code: String,
}

/// Load every map defined in one CSV file, in order of first appearance.
pub fn load_maps_from_str(content: &str, filename: &str) -> Result<Vec<ComorbidityMap>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| csv_error(filename, &e))?
        .clone();

    let mut maps: Vec<ComorbidityMap> = Vec::new();
    let mut row_count = 0usize;
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(filename, &e))?;
        let line = record.position().map_or(0, |pos| pos.line());
        let row: ComorbidityCsvRow = record
            .deserialize(Some(&headers))
            .map_err(|e| csv_error(filename, &e))?;

        for (field, value) in [("map", &row.map), ("category", &row.category)] {
            if value.is_empty() {
                return Err(StandardsError::InvalidValue {
                    field,
                    value: String::new(),
                    file: filename.to_string(),
                    line,
                });
            }
        }

        let kind = parse_kind(&row.kind, filename, line)?;
        let options = ParseOptions::new()
            .with_kind(kind)
            .with_form(FormHint::Short);
        let code = icd_normalization::parse(&row.code, &options).map_err(|source| {
            StandardsError::InvalidCode {
                file: filename.to_string(),
                line,
                source,
            }
        })?;

        let map = match maps
            .iter()
            .position(|map| map.name().eq_ignore_ascii_case(&row.map))
        {
            Some(position) => &mut maps[position],
            None => {
                maps.push(ComorbidityMap::new(row.map.clone()));
                let last = maps.len() - 1;
                &mut maps[last]
            }
        };
        map.insert(&row.category, [code]);
        row_count += 1;
    }

    tracing::info!(
        file = %filename,
        rows = row_count,
        maps = ?maps.iter().map(ComorbidityMap::name).collect::<Vec<_>>(),
        "loaded comorbidity maps"
    );
    Ok(maps)
}

/// Load every map defined in a CSV file on disk.
pub fn load_maps_from_path(path: &Path) -> Result<Vec<ComorbidityMap>> {
    let content = std::fs::read_to_string(path).map_err(|source| StandardsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_maps_from_str(&content, &path.display().to_string())
}

/// Fold `incoming` into `maps`, merging maps that share a name.
pub fn merge_maps(maps: &mut Vec<ComorbidityMap>, incoming: Vec<ComorbidityMap>) {
    for map in incoming {
        match maps
            .iter_mut()
            .find(|existing| existing.name().eq_ignore_ascii_case(map.name()))
        {
            Some(existing) => {
                for category in map.categories() {
                    if let Some(codes) = map.get(category) {
                        existing.insert(category, codes.iter().cloned());
                    }
                }
            }
            None => maps.push(map),
        }
    }
}

fn csv_error(filename: &str, error: &csv::Error) -> StandardsError {
    StandardsError::CsvParse {
        file: filename.to_string(),
        message: error.to_string(),
    }
}
