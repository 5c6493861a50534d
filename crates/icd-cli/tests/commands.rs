//! Command output against the embedded reference data.

use icd_cli::commands::{
    assign_comorbidities, condense_codes, convert_codes, explain_codes, list_maps, list_range,
    read_codes, read_records, sort_input, split_codes, validate_codes,
};
use icd_cli::render::{OutputFormat, Report, render};
use icd_model::{CodeForm, CodeKind, ParseOptions};
use icd_standards::{ReferenceData, embedded_reference};

fn reference() -> &'static ReferenceData {
    embedded_reference().expect("embedded reference data")
}

fn icd9() -> ParseOptions {
    ParseOptions::new().with_kind(CodeKind::Icd9)
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

fn plain<R: Report>(report: &R) -> String {
    render(report, OutputFormat::Plain).expect("render plain")
}

#[test]
fn convert_keeps_one_line_per_input() {
    let report = convert_codes(
        &strings(&["1", "10.20", "391.0", "bad!"]),
        &icd9(),
        CodeForm::Short,
    );
    insta::assert_snapshot!(plain(&report), @r"
    001
    01020
    3910
    NA
    ");
    assert!(report.has_failures());
    assert_eq!(report.issues().len(), 1);
    assert!(report.issues()[0].starts_with("#3 bad!"));
}

#[test]
fn convert_json_lists_rows_and_failures() {
    let report = convert_codes(&strings(&["0010"]), &icd9(), CodeForm::Decimal);
    let json: serde_json::Value =
        serde_json::from_str(&render(&report, OutputFormat::Json).unwrap()).unwrap();
    assert_eq!(json["rows"][0]["output"], "001.0");
    assert_eq!(json["failures"].as_array().map(Vec::len), Some(0));
}

#[test]
fn parts_use_the_empty_minor_marker() {
    let report = split_codes(&strings(&["V10.01", "E850.0", "391"]), &icd9(), "-");
    assert_eq!(plain(&report), "V10\t01\nE850\t0\n391\t-");
}

#[test]
fn validate_flags_undefined_and_malformed_codes() {
    let report = validate_codes(
        &strings(&["391.0", "391.7", "39-1"]),
        &icd9(),
        Some(&reference().hierarchy),
    );
    insta::assert_snapshot!(plain(&report), @r"
    true
    false
    false
    ");
    assert!(report.has_failures());
    let issues = report.issues();
    assert!(issues.iter().any(|issue| issue.starts_with("#2 39-1")));
    assert!(issues.iter().any(|issue| issue.contains("391.7")));
}

#[test]
fn condense_collapses_complete_groups() {
    let report = condense_codes(
        &strings(&["3910", "3911", "3912", "3918", "3919", "4019"]),
        &icd9(),
        &reference().hierarchy,
        false,
    );
    insta::assert_snapshot!(plain(&report), @r"
    391
    4019
    ");
    assert!(!report.has_failures());
}

#[test]
fn range_lists_descendants_of_the_end_code() {
    let report = list_range("390", "392", &icd9(), &reference().hierarchy).unwrap();
    insta::assert_snapshot!(plain(&report), @r"
    390
    391
    3910
    3911
    3912
    3918
    3919
    392
    3920
    3929
    ");
}

#[test]
fn range_with_reversed_bounds_is_an_error() {
    let error = list_range("392", "390", &icd9(), &reference().hierarchy).unwrap_err();
    assert!(format!("{error:#}").contains("392-390"));
}

#[test]
fn sort_orders_numeric_then_v_then_e_codes() {
    let report = sort_input(&strings(&["E850.0", "V10.01", "401.9", "001"]), &icd9());
    insta::assert_snapshot!(plain(&report), @r"
    001
    401.9
    V10.01
    E850.0
    ");
}

#[test]
fn explain_condensed_chorea() {
    let report = explain_codes(
        &strings(&["392.0", "392.9"]),
        &icd9(),
        &reference().hierarchy,
        true,
    );
    assert_eq!(plain(&report), "Rheumatic chorea");
}

#[test]
fn comorbid_renders_flag_columns_with_scores() {
    let csv = "patient,dx\np1,428.0\np1,250.40\np2,042\np3,\n";
    let records = read_records(csv.as_bytes(), "patient", "dx").unwrap();
    assert_eq!(records.len(), 2);

    let map = reference().map("charlson").unwrap();
    let report = assign_comorbidities(&records, map, &icd9(), true).unwrap();
    insta::assert_snapshot!(plain(&report), @r"
    id,MI,CHF,PVD,Stroke,Dementia,Pulmonary,Rheumatic,PUD,LiverMild,DM,DMcx,Paralysis,Renal,Cancer,LiverSevere,Mets,HIV,score
    p1,0,1,0,0,0,0,0,0,0,0,1,0,0,0,0,0,0,3
    p2,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1,6
    ");
}

#[test]
fn comorbid_quotes_ids_containing_commas() {
    let csv = "patient,dx\n\"smith, j\",428.0\n";
    let records = read_records(csv.as_bytes(), "patient", "dx").unwrap();
    assert_eq!(records[0].id, "smith, j");

    let map = reference().map("charlson").unwrap();
    let report = assign_comorbidities(&records, map, &icd9(), true).unwrap();
    insta::assert_snapshot!(plain(&report), @r#"
    id,MI,CHF,PVD,Stroke,Dementia,Pulmonary,Rheumatic,PUD,LiverMild,DM,DMcx,Paralysis,Renal,Cancer,LiverSevere,Mets,HIV,score
    "smith, j",0,1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1
    "#);
}

#[test]
fn scores_are_refused_for_maps_other_than_charlson() {
    let records = read_records("id,dx\np1,428.0\n".as_bytes(), "id", "dx").unwrap();
    let map = reference().map("elixhauser").unwrap();
    let error = assign_comorbidities(&records, map, &icd9(), true).unwrap_err();
    assert!(error.to_string().contains("Charlson"));
    assert!(error.to_string().contains("'Elixhauser'"));

    let report = assign_comorbidities(&records, map, &icd9(), false).unwrap();
    assert!(report.scores.is_none());
    assert_eq!(report.table.rows[0].categories, vec!["CHF"]);
}

#[test]
fn supplementary_codes_need_an_explicit_kind() {
    let records = read_records("id,dx\np1,V434\np1,V4501\n".as_bytes(), "id", "dx").unwrap();
    let map = reference().map("QuanElixhauser").unwrap();

    let inferred = assign_comorbidities(&records, map, &ParseOptions::new(), false).unwrap();
    assert!(inferred.table.rows[0].categories.is_empty());
    assert_eq!(inferred.table.rows[0].failures.len(), 2);

    let report = assign_comorbidities(&records, map, &icd9(), false).unwrap();
    assert_eq!(report.table.rows[0].categories, vec!["Arrhythmia", "PVD"]);
    assert!(report.table.rows[0].failures.is_empty());
}

#[test]
fn missing_csv_column_is_reported() {
    let error = read_records("id,code\n1,4280\n".as_bytes(), "id", "dx").unwrap_err();
    assert!(error.to_string().contains("'dx'"));
}

#[test]
fn maps_are_found_case_insensitively() {
    let report = list_maps(reference(), Some("ELIXHAUSER")).unwrap();
    assert_eq!(report.maps.len(), 1);
    assert_eq!(report.maps[0].name, "Elixhauser");

    let error = list_maps(reference(), Some("nope")).unwrap_err();
    assert!(error.to_string().contains("Charlson"));
}

#[test]
fn stdin_codes_split_on_whitespace_and_commas() {
    let input = "391.0, 391.1\n# comment\n\n  4019\n";
    let codes = read_codes(input.as_bytes()).unwrap();
    assert_eq!(codes, vec!["391.0", "391.1", "4019"]);
}
