//! Conversion behaviour across the public API.

use icd_model::{Code, CodeForm, CodeKind, IcdError, KindHint, ParseOptions};
use icd_normalization::{
    convert_all, decimal_to_short, parse, short_to_decimal, to_decimal, to_short,
};
use proptest::prelude::*;

#[test]
fn decimal_to_short_pads_majors_only() {
    let outcome = decimal_to_short(&["1", "10.20", "100", "123.45"], KindHint::Infer);
    assert!(outcome.is_clean());
    assert_eq!(outcome.into_values(), vec!["001", "01020", "100", "12345"]);
}

#[test]
fn short_to_decimal_splits_after_the_major() {
    let outcome = short_to_decimal(&["1", "22", "2244", "1005"], KindHint::Infer);
    assert!(outcome.is_clean());
    assert_eq!(outcome.into_values(), vec!["001", "022", "224.4", "100.5"]);
}

#[test]
fn supplementary_codes_convert_under_an_icd9_hint() {
    let outcome = short_to_decimal(&["V1000", "E8500", "V1"], KindHint::Icd9);
    assert_eq!(outcome.into_values(), vec!["V10.00", "E850.0", "V01"]);
}

#[test]
fn icd10_codes_convert_without_padding() {
    let outcome = decimal_to_short(&["I50.9", "E10.11", "B20"], KindHint::Icd10);
    assert_eq!(outcome.into_values(), vec!["I509", "E1011", "B20"]);
}

#[test]
fn failures_keep_their_position() {
    let outcome = convert_all(
        &["391.0", "", "39-1", "V10"],
        &ParseOptions::default(),
        CodeForm::Short,
    );
    assert_eq!(outcome.results[0].as_deref(), Some("3910"));
    let failed: Vec<usize> = outcome.failures.iter().map(|f| f.index).collect();
    assert_eq!(failed, vec![1, 2, 3]);
    assert!(matches!(
        outcome.failures[2].error,
        IcdError::AmbiguousKind { .. }
    ));
}

#[test]
fn lenient_parse_returns_out_of_grammar_codes() {
    let code = parse("ZZZ9", &ParseOptions::default()).unwrap();
    assert_eq!(code.kind(), CodeKind::Icd10);
    assert_eq!(to_decimal(&code).to_string(), "ZZZ.9");
}

fn icd9_numeric() -> impl Strategy<Value = Code> {
    ("[0-9]{1,3}", "[0-9]{0,2}").prop_map(|(major, minor)| {
        Code::new(CodeKind::Icd9, major, minor, CodeForm::Decimal).unwrap()
    })
}

fn icd10() -> impl Strategy<Value = Code> {
    ("[A-Z][0-9]{2}", "[0-9A-Z]{0,4}").prop_map(|(major, minor)| {
        Code::new(CodeKind::Icd10, major, minor, CodeForm::Short).unwrap()
    })
}

proptest! {
    #[test]
    fn short_form_survives_a_decimal_round_trip(code in prop_oneof![icd9_numeric(), icd10()]) {
        prop_assert_eq!(to_short(&to_decimal(&code)), to_short(&code));
        let decimal = to_decimal(&code);
        prop_assert_eq!(to_decimal(&decimal), decimal);
    }

    #[test]
    fn short_icd9_majors_pad_to_three_digits(major in "[0-9]{1,2}", minor in "[0-9]{0,2}") {
        let code = Code::new(CodeKind::Icd9, major, minor, CodeForm::Decimal).unwrap();
        prop_assert_eq!(to_short(&code).major().len(), 3);
    }

    #[test]
    fn decimal_strings_parse_back_to_the_same_code(code in icd10()) {
        let text = to_decimal(&code).to_string();
        let options = ParseOptions::new().with_kind(CodeKind::Icd10);
        let parsed = parse(&text, &options).unwrap();
        prop_assert_eq!(parsed.key(), code.key());
    }
}
