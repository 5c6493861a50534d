//! Hierarchy loading.
//!
//! Hierarchy CSV files hold one row per classification node:
//!
//! ```text
//! kind,code,parent,billable,short_desc,long_desc
//! icd9,391,,N,Rheum fev w hrt involv,Rheumatic fever with heart involvement
//! icd9,391.0,391,Y,Acute rheumatic pericard,Acute rheumatic pericarditis
//! ```
//!
//! Codes may be written in either form. Rows may appear in any order and
//! may be spread over several files; parents are resolved once all rows
//! are in.

use std::path::Path;

use icd_model::{Code, CodeKind, Hierarchy, HierarchyBuilder, ParseOptions};
use serde::Deserialize;

use crate::error::{Result, StandardsError};

/// Row from hierarchy CSV files.
#[derive(Debug, Deserialize)]
struct HierarchyCsvRow {
    kind: String,
    code: String,
    #[serde(default)]
    parent: String,
    #[serde(default)]
    billable: String,
    #[serde(default)]
    short_desc: String,
    #[serde(default)]
    long_desc: String,
}

/// Add every row of one hierarchy file to `builder`.
///
/// Returns the number of rows added.
pub fn add_hierarchy_rows(
    builder: &mut HierarchyBuilder,
    content: &str,
    filename: &str,
) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| csv_error(filename, &e))?
        .clone();

    let mut added = 0usize;
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(filename, &e))?;
        let line = record.position().map_or(0, |pos| pos.line());
        let row: HierarchyCsvRow = record
            .deserialize(Some(&headers))
            .map_err(|e| csv_error(filename, &e))?;

        let kind = parse_kind(&row.kind, filename, line)?;
        let code = parse_code(kind, &row.code, filename, line)?;
        let parent = if row.parent.is_empty() {
            None
        } else {
            Some(parse_code(kind, &row.parent, filename, line)?)
        };
        let billable = parse_flag(&row.billable, filename, line)?;

        builder.add(code, parent, billable, row.short_desc, row.long_desc);
        added += 1;
    }

    tracing::debug!(file = %filename, rows = added, "read hierarchy rows");
    Ok(added)
}

/// Load a hierarchy from the content of a single CSV file.
pub fn load_hierarchy_from_str(content: &str, filename: &str) -> Result<Hierarchy> {
    let mut builder = HierarchyBuilder::new();
    add_hierarchy_rows(&mut builder, content, filename)?;
    build(builder, filename)
}

/// Load a hierarchy from a CSV file on disk.
pub fn load_hierarchy_from_path(path: &Path) -> Result<Hierarchy> {
    let content = std::fs::read_to_string(path).map_err(|source| StandardsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_hierarchy_from_str(&content, &path.display().to_string())
}

/// Finish a builder, attributing structural errors to `source`.
pub fn build(builder: HierarchyBuilder, source: &str) -> Result<Hierarchy> {
    let hierarchy = builder
        .build()
        .map_err(|source_error| StandardsError::Hierarchy {
            file: source.to_string(),
            source: source_error,
        })?;
    tracing::info!(source = %source, nodes = hierarchy.len(), "loaded hierarchy");
    Ok(hierarchy)
}

// =============================================================================
// Helpers
// =============================================================================

fn csv_error(filename: &str, error: &csv::Error) -> StandardsError {
    StandardsError::CsvParse {
        file: filename.to_string(),
        message: error.to_string(),
    }
}

pub(crate) fn parse_kind(raw: &str, filename: &str, line: u64) -> Result<CodeKind> {
    raw.parse::<CodeKind>()
        .map_err(|_| StandardsError::InvalidValue {
            field: "kind",
            value: raw.to_string(),
            file: filename.to_string(),
            line,
        })
}

fn parse_code(kind: CodeKind, raw: &str, filename: &str, line: u64) -> Result<Code> {
    let options = ParseOptions::new().with_kind(kind).with_strict(true);
    icd_normalization::parse(raw, &options).map_err(|source| StandardsError::InvalidCode {
        file: filename.to_string(),
        line,
        source,
    })
}

/// Accepts `Y`/`N`, `yes`/`no`, `true`/`false` and `1`/`0`; blank is `false`.
fn parse_flag(raw: &str, filename: &str, line: u64) -> Result<bool> {
    match raw.to_ascii_uppercase().as_str() {
        "Y" | "YES" | "TRUE" | "1" => Ok(true),
        "" | "N" | "NO" | "FALSE" | "0" => Ok(false),
        _ => Err(StandardsError::InvalidValue {
            field: "billable",
            value: raw.to_string(),
            file: filename.to_string(),
            line,
        }),
    }
}
