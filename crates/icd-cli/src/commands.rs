//! Command implementations.
//!
//! Each function turns already-read input into a [`Report`](crate::render::Report);
//! argument handling and output live in the binary.

use std::collections::HashMap;
use std::io::{BufRead, Read};

use anyhow::{Context, Result, bail};
use icd_core::{
    CHARLSON_MAP, CondenseOptions, ExplainOptions, Explanation, PatientRecord, children_of_all,
    comorbid, condense_with, expand_range_str, explain, group_records, is_charlson_map,
    sort_codes,
};
use icd_model::{CodeForm, ComorbidityMap, Hierarchy, ParseOptions};
use icd_normalization::{convert_all, parse_all, parse_set, split_parts};
use icd_standards::ReferenceData;
use icd_validate::{ValidationReport, check_codes};
use tracing::{debug, info};

use crate::render::{
    CodeList, ComorbidityReport, ConversionRow, Conversions, MapSummary, MapsReport, PartsReport,
    PartsRow,
};

/// Read codes separated by whitespace or commas, skipping blank lines and
/// lines starting with `#`.
pub fn read_codes<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut codes = Vec::new();
    for line in reader.lines() {
        let line = line.context("read codes")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        codes.extend(
            line.split(|ch: char| ch.is_whitespace() || ch == ',')
                .filter(|token| !token.is_empty())
                .map(str::to_string),
        );
    }
    debug!(count = codes.len(), "read codes from input");
    Ok(codes)
}

pub fn convert_codes(codes: &[String], options: &ParseOptions, target: CodeForm) -> Conversions {
    let outcome = convert_all(codes, options, target);
    let rows = codes
        .iter()
        .zip(outcome.results)
        .map(|(input, output)| ConversionRow {
            input: input.clone(),
            output,
        })
        .collect();
    Conversions {
        rows,
        failures: outcome.failures,
    }
}

pub fn split_codes(codes: &[String], options: &ParseOptions, minor_empty: &str) -> PartsReport {
    let outcome = split_parts(codes, options, minor_empty);
    let rows = codes
        .iter()
        .zip(outcome.results)
        .map(|(input, parts)| {
            let (major, minor) = parts.map(|parts| (parts.major, parts.minor)).unzip();
            PartsRow {
                input: input.clone(),
                major,
                minor,
            }
        })
        .collect();
    PartsReport {
        rows,
        failures: outcome.failures,
    }
}

pub fn validate_codes(
    codes: &[String],
    options: &ParseOptions,
    hierarchy: Option<&Hierarchy>,
) -> ValidationReport {
    check_codes(codes, options, hierarchy)
}

pub fn condense_codes(
    codes: &[String],
    options: &ParseOptions,
    hierarchy: &Hierarchy,
    drop_undefined: bool,
) -> CodeList {
    let (set, failures) = parse_set(codes, options);
    let condensed = condense_with(
        &set,
        hierarchy,
        &CondenseOptions::new().with_drop_undefined(drop_undefined),
    );
    CodeList {
        codes: condensed.codes.to_strings(),
        failures,
        diagnostics: condensed.diagnostics,
    }
}

pub fn explain_codes(
    codes: &[String],
    options: &ParseOptions,
    hierarchy: &Hierarchy,
    condense_first: bool,
) -> Explanation {
    let options = ExplainOptions::new()
        .with_parse(*options)
        .with_condense_first(condense_first);
    explain(codes, hierarchy, &options)
}

pub fn list_children(
    codes: &[String],
    options: &ParseOptions,
    hierarchy: &Hierarchy,
    billable_only: bool,
) -> CodeList {
    let (set, failures) = parse_set(codes, options);
    CodeList {
        codes: children_of_all(&set, hierarchy, billable_only).to_strings(),
        failures,
        ..CodeList::default()
    }
}

/// # Errors
///
/// Fails when either bound does not parse or the bounds do not form a range.
pub fn list_range(
    start: &str,
    end: &str,
    options: &ParseOptions,
    hierarchy: &Hierarchy,
) -> Result<CodeList> {
    let codes = expand_range_str(start, end, options, hierarchy)
        .with_context(|| format!("expand range {start}-{end}"))?;
    Ok(CodeList {
        codes: codes.to_strings(),
        ..CodeList::default()
    })
}

/// Canonical order, duplicates kept.
pub fn sort_input(codes: &[String], options: &ParseOptions) -> CodeList {
    let outcome = parse_all(codes, options);
    let failures = outcome.failures.clone();
    let mut parsed = outcome.into_values();
    sort_codes(&mut parsed);
    CodeList {
        codes: parsed.iter().map(ToString::to_string).collect(),
        failures,
        ..CodeList::default()
    }
}

/// Read `(id, code)` rows from CSV, grouping codes by id.
///
/// # Errors
///
/// Fails when the CSV is malformed or a named column is missing.
pub fn read_records<R: Read>(
    reader: R,
    id_column: &str,
    code_column: &str,
) -> Result<Vec<PatientRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers().context("read CSV header")?.clone();
    let columns: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(index, name)| (name, index))
        .collect();
    let Some(&id_index) = columns.get(id_column) else {
        bail!("missing id column '{id_column}'");
    };
    let Some(&code_index) = columns.get(code_column) else {
        bail!("missing code column '{code_column}'");
    };

    let mut pairs = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("read CSV row {}", row + 2))?;
        let id = record.get(id_index).unwrap_or_default();
        let code = record.get(code_index).unwrap_or_default();
        if code.is_empty() {
            continue;
        }
        pairs.push((id.to_string(), code.to_string()));
    }
    let records = group_records(pairs);
    info!(records = records.len(), "read patient records");
    Ok(records)
}

/// # Errors
///
/// Fails when `with_scores` is set for a map other than Charlson.
pub fn assign_comorbidities(
    records: &[PatientRecord],
    map: &ComorbidityMap,
    options: &ParseOptions,
    with_scores: bool,
) -> Result<ComorbidityReport> {
    if with_scores && !is_charlson_map(map.name()) {
        bail!(
            "--score applies Charlson weights and needs the {CHARLSON_MAP} map, not '{}'",
            map.name()
        );
    }
    ComorbidityReport::new(comorbid(records, map, options), with_scores)
}

/// # Errors
///
/// Fails when `name` does not match a loaded map.
pub fn list_maps(reference: &ReferenceData, name: Option<&str>) -> Result<MapsReport> {
    let maps = match name {
        Some(name) => vec![MapSummary::from(find_map(reference, name)?)],
        None => reference.maps.iter().map(MapSummary::from).collect(),
    };
    Ok(MapsReport { maps })
}

/// Look up a map for assignment, listing the alternatives on failure.
pub fn find_map<'a>(reference: &'a ReferenceData, name: &str) -> Result<&'a ComorbidityMap> {
    reference.map(name).with_context(|| {
        format!(
            "unknown comorbidity map '{name}' (available: {})",
            reference.map_names().join(", ")
        )
    })
}

