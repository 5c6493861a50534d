//! Tests for icd-model types.

use icd_model::{
    Code, CodeForm, CodeKind, CodeSet, ComorbidityMap, Diagnostic, DiagnosticReport, FormHint,
    Hierarchy, HierarchyNode, KindHint, ParseOptions,
};

fn icd9(major: &str, minor: &str) -> Code {
    Code::new(CodeKind::Icd9, major, minor, CodeForm::Short).unwrap()
}

fn rheumatic_fever() -> Vec<HierarchyNode> {
    let leaf = |minor: &str, desc: &str| {
        HierarchyNode::new(icd9("391", minor), true).with_descriptions(desc, desc)
    };
    vec![
        HierarchyNode::new(icd9("391", ""), false)
            .with_descriptions("Rheumatic fever w heart involvement", "Rheumatic fever with heart involvement")
            .with_children(vec![
                leaf("9", "Acute rheumatic heart disease, unspecified"),
                leaf("0", "Acute rheumatic pericarditis"),
                leaf("1", "Acute rheumatic endocarditis"),
            ]),
        HierarchyNode::new(icd9("390", ""), true),
    ]
}

#[test]
fn forest_is_indexed_in_code_order() {
    let hierarchy = Hierarchy::from_forest(rheumatic_fever()).unwrap();
    assert_eq!(hierarchy.len(), 5);

    let roots: Vec<String> = hierarchy.roots().map(|node| node.code().short()).collect();
    assert_eq!(roots, vec!["390", "391"]);

    let node = hierarchy.get(&icd9("391", "")).unwrap();
    let children: Vec<String> = node.children().map(|child| child.code().short()).collect();
    assert_eq!(children, vec!["3910", "3911", "3919"]);
    assert_eq!(node.long_desc(), "Rheumatic fever with heart involvement");
}

#[test]
fn lookup_ignores_representation() {
    let hierarchy = Hierarchy::from_forest(rheumatic_fever()).unwrap();
    let decimal = Code::new(CodeKind::Icd9, "391", "1", CodeForm::Decimal).unwrap();
    let node = hierarchy.get(&decimal).unwrap();
    assert_eq!(node.parent().unwrap().code().short(), "391");
    assert!(node.is_billable());
}

#[test]
fn code_set_serializes_as_list() {
    let set: CodeSet = vec![icd9("391", "0"), icd9("390", "")].into();
    let json = serde_json::to_string(&set).expect("serialize set");
    let round: CodeSet = serde_json::from_str(&json).expect("deserialize set");
    assert_eq!(round, set);
    assert_eq!(round.short_forms(), vec!["3910", "390"]);
}

#[test]
fn comorbidity_map_round_trips_through_json() {
    let mut map = ComorbidityMap::new("charlson");
    map.insert("CHF", [icd9("428", "")]);
    let json = serde_json::to_string(&map).expect("serialize map");
    let round: ComorbidityMap = serde_json::from_str(&json).expect("deserialize map");
    assert_eq!(round.name(), "charlson");
    assert!(round.contains("CHF", &icd9("428", "0")));
}

#[test]
fn parse_options_deserialize_with_defaults() {
    let options: ParseOptions = serde_json::from_str(r#"{"kind":"icd10"}"#).unwrap();
    assert_eq!(options.kind_hint, KindHint::Icd10);
    assert_eq!(options.form_hint, FormHint::Infer);
    assert!(!options.strict);
}

#[test]
fn diagnostic_report_counts() {
    let mut report = DiagnosticReport::default();
    report.push(Diagnostic::undefined("3918"));
    report.push(Diagnostic::non_billable("391"));
    assert_eq!(report.warning_count(), 2);
    assert_eq!(report.error_count(), 0);
    assert_eq!(report.undefined_codes(), vec!["3918"]);
}
