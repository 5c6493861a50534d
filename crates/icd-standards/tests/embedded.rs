//! The embedded reference data loads and is internally consistent.

use std::fs;
use std::path::PathBuf;

use icd_model::{Code, CodeForm, CodeKind};
use icd_standards::{ReferenceConfig, ReferenceData, StandardsError, embedded_reference};

fn code(kind: CodeKind, major: &str, minor: &str) -> Code {
    Code::new(kind, major, minor, CodeForm::Short).unwrap()
}

fn unique_temp_dir(name: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "icd-standards-{}-{}-{}",
        name,
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    dir
}

#[test]
fn embedded_hierarchy_holds_both_kinds() {
    let reference = embedded_reference().unwrap();
    let hierarchy = &reference.hierarchy;
    assert!(hierarchy.contains(&code(CodeKind::Icd9, "391", "0")));
    assert!(hierarchy.contains(&code(CodeKind::Icd10, "I50", "21")));
    assert!(hierarchy.contains(&code(CodeKind::Icd9, "V10", "")));
    assert!(hierarchy.contains(&code(CodeKind::Icd10, "V10", "")));

    let roots: Vec<String> = hierarchy
        .roots()
        .filter(|root| root.code().kind() == CodeKind::Icd9)
        .map(|root| root.code().short())
        .collect();
    assert_eq!(roots.first().map(String::as_str), Some("001"));
    assert_eq!(roots.last().map(String::as_str), Some("E850"));
}

#[test]
fn rheumatic_fever_has_five_children() {
    let reference = embedded_reference().unwrap();
    let node = reference
        .hierarchy
        .get(&code(CodeKind::Icd9, "391", ""))
        .unwrap();
    assert_eq!(node.children().count(), 5);
    assert_eq!(node.long_desc(), "Rheumatic fever with heart involvement");
    assert!(node.children().all(|child| child.is_billable()));
}

#[test]
fn embedded_maps_are_named_and_searchable() {
    let reference = embedded_reference().unwrap();
    assert_eq!(
        reference.map_names(),
        vec!["Charlson", "Elixhauser", "QuanElixhauser", "AHRQ"]
    );

    let charlson = reference.map("charlson").unwrap();
    assert_eq!(charlson.len(), 17);
    assert_eq!(
        charlson.categories_for(&code(CodeKind::Icd9, "428", "21")),
        vec!["CHF"]
    );
    assert_eq!(
        charlson.categories_for(&code(CodeKind::Icd10, "E10", "22")),
        vec!["DMcx"]
    );
    assert!(reference.map("quan-deyo").is_none());
}

#[test]
fn elixhauser_families_carry_their_full_category_sets() {
    let reference = embedded_reference().unwrap();
    let elixhauser = reference.map("elixhauser").unwrap();
    let quan = reference.map("QUANELIXHAUSER").unwrap();
    let ahrq = reference.map("ahrq").unwrap();
    assert_eq!(elixhauser.len(), 31);
    assert_eq!(quan.len(), 31);
    assert_eq!(ahrq.len(), 29);
    assert!(ahrq.get("Arrhythmia").is_none());

    let pacemaker = code(CodeKind::Icd9, "V45", "01");
    assert_eq!(quan.categories_for(&pacemaker), vec!["Arrhythmia"]);
    assert_eq!(
        ahrq.categories_for(&code(CodeKind::Icd9, "401", "9")),
        vec!["HTN"]
    );
    assert_eq!(
        quan.categories_for(&code(CodeKind::Icd10, "K70", "30")),
        vec!["Liver", "Alcohol"]
    );
    assert!(
        ahrq.categories_for(&code(CodeKind::Icd10, "I50", "9"))
            .is_empty()
    );
}

#[test]
fn directory_layout_replaces_embedded_data() {
    let dir = unique_temp_dir("reference");
    fs::create_dir_all(dir.join("hierarchy")).unwrap();
    fs::create_dir_all(dir.join("comorbidity")).unwrap();
    fs::write(
        dir.join("hierarchy/mini.csv"),
        "kind,code,parent,billable,short_desc,long_desc\nicd10,I10,,Y,HTN,Essential (primary) hypertension\n",
    )
    .unwrap();
    fs::write(
        dir.join("comorbidity/mini.csv"),
        "map,category,kind,code\nMini,HTN,icd10,I10\n",
    )
    .unwrap();

    let reference = ReferenceData::load(&ReferenceConfig::default().with_dir(&dir)).unwrap();
    assert_eq!(reference.hierarchy.len(), 1);
    assert_eq!(reference.map_names(), vec!["Mini"]);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_directory_is_reported() {
    let dir = unique_temp_dir("missing");
    assert!(matches!(
        ReferenceData::from_dir(&dir),
        Err(StandardsError::DirectoryNotFound { .. })
    ));
}
