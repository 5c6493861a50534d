//! Splitting codes into major/minor parts and joining them back.

use icd_model::{BatchOutcome, Code, CodeForm, CodeKind, FormHint, KindHint, ParseOptions, Result};
use serde::Serialize;

use crate::convert::pad_major;
use crate::parse::{options_for, parse};

/// Major and minor segments of one code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parts {
    pub major: String,
    pub minor: String,
}

impl Parts {
    fn from_code(code: &Code, minor_empty: &str) -> Self {
        let minor = if code.minor().is_empty() {
            minor_empty.to_string()
        } else {
            code.minor().to_string()
        };
        Self {
            major: code.major().to_string(),
            minor,
        }
    }
}

/// Split codes read with `options`. A missing minor is reported as
/// `minor_empty`.
pub fn split_parts<S: AsRef<str>>(
    inputs: &[S],
    options: &ParseOptions,
    minor_empty: &str,
) -> BatchOutcome<Parts> {
    BatchOutcome::collect(inputs, |raw| {
        parse(raw, options).map(|code| Parts::from_code(&code, minor_empty))
    })
}

/// Split short-form codes. A missing minor is reported as `minor_empty`.
pub fn short_to_parts<S: AsRef<str>>(
    inputs: &[S],
    kind: KindHint,
    minor_empty: &str,
) -> BatchOutcome<Parts> {
    split_parts(inputs, &options_for(kind, FormHint::Short), minor_empty)
}

/// Split decimal-form codes. A missing minor is reported as `minor_empty`.
pub fn decimal_to_parts<S: AsRef<str>>(
    inputs: &[S],
    kind: KindHint,
    minor_empty: &str,
) -> BatchOutcome<Parts> {
    split_parts(inputs, &options_for(kind, FormHint::Decimal), minor_empty)
}

/// Build a code from separate segments, padding the major.
pub fn parts_to_code(kind: CodeKind, major: &str, minor: &str, form: CodeForm) -> Result<Code> {
    let major = pad_major(kind, major.trim())?;
    Code::new(kind, major, minor.trim(), form)
}

pub fn parts_to_short(kind: CodeKind, major: &str, minor: &str) -> Result<String> {
    parts_to_code(kind, major, minor, CodeForm::Short).map(|code| code.to_string())
}

pub fn parts_to_decimal(kind: CodeKind, major: &str, minor: &str) -> Result<String> {
    parts_to_code(kind, major, minor, CodeForm::Decimal).map(|code| code.to_string())
}

/// Major segment of a code, padded.
pub fn get_major(raw: &str, options: &ParseOptions) -> Result<String> {
    parse(raw, options).map(|code| code.major().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_icd10_short_codes() {
        let outcome = short_to_parts(&["A0111", "B20", "S52521A"], KindHint::Icd10, "");
        let parts: Vec<(String, String)> = outcome
            .into_values()
            .into_iter()
            .map(|p| (p.major, p.minor))
            .collect();
        assert_eq!(
            parts,
            vec![
                ("A01".to_string(), "11".to_string()),
                ("B20".to_string(), String::new()),
                ("S52".to_string(), "521A".to_string()),
            ]
        );
    }

    #[test]
    fn empty_minor_marker_is_configurable() {
        let outcome = decimal_to_parts(&["I10", "I50.9"], KindHint::Icd10, "NA");
        let minors: Vec<String> = outcome.into_values().into_iter().map(|p| p.minor).collect();
        assert_eq!(minors, vec!["NA", "9"]);
    }

    #[test]
    fn joins_parts_with_padding() {
        assert_eq!(parts_to_short(CodeKind::Icd9, "1", "0").unwrap(), "0010");
        assert_eq!(parts_to_decimal(CodeKind::Icd9, "V1", "00").unwrap(), "V01.00");
        assert_eq!(parts_to_decimal(CodeKind::Icd10, "I50", "").unwrap(), "I50");
        assert!(parts_to_short(CodeKind::Icd9, "", "1").is_err());
    }

    #[test]
    fn major_of_decimal_and_short_codes() {
        let options = ParseOptions::default();
        assert_eq!(get_major("4019", &options).unwrap(), "401");
        assert_eq!(get_major("E850.0", &options.with_kind(CodeKind::Icd9)).unwrap(), "E850");
    }
}
