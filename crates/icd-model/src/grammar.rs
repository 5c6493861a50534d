//! Kind-specific grammar rules for code segments.
//!
//! - ICD-9: major is three digits, `V` plus two digits, or `E` plus three
//!   digits. Numeric and `V` minors hold up to two digits, `E` minors one.
//! - ICD-10: major is a letter followed by two digits; the minor holds up to
//!   four letters or digits.

use crate::code::{Code, CodeKind};

/// Longest minor segment per kind.
pub const ICD9_MAX_MINOR: usize = 2;
pub const ICD9_E_MAX_MINOR: usize = 1;
pub const ICD10_MAX_MINOR: usize = 4;

fn all_digits(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit())
}

/// Left-pad an ICD-9 major to its full width: three digits for numeric
/// codes, `V` plus two digits, `E` plus three digits.
///
/// Majors that already have full width, or that are not digit runs after
/// their prefix, are returned unchanged for the validity checker to judge.
pub fn pad_icd9_major(major: &str) -> std::result::Result<String, &'static str> {
    let (prefix, digits, width) = match major.as_bytes().first() {
        None => return Err("empty major"),
        Some(b'E') => ("E", &major[1..], 3),
        Some(b'V') => ("V", &major[1..], 2),
        Some(_) => ("", major, 3),
    };
    if digits.is_empty() {
        return Err("no digits to pad after the prefix");
    }
    if digits.len() >= width || !all_digits(digits) {
        return Ok(major.to_string());
    }
    Ok(format!("{prefix}{digits:0>width$}"))
}

/// Whether `major` is a complete, padded major for `kind`.
pub fn is_valid_major(kind: CodeKind, major: &str) -> bool {
    let bytes = major.as_bytes();
    match kind {
        CodeKind::Icd9 => match bytes.first() {
            Some(b'V') => major.len() == 3 && all_digits(&major[1..]),
            Some(b'E') => major.len() == 4 && all_digits(&major[1..]),
            Some(_) => major.len() == 3 && all_digits(major),
            None => false,
        },
        CodeKind::Icd10 => {
            major.len() == 3 && bytes[0].is_ascii_alphabetic() && all_digits(&major[1..])
        }
    }
}

/// Whether `minor` fits after `major` for `kind`.
pub fn is_valid_minor(kind: CodeKind, major: &str, minor: &str) -> bool {
    match kind {
        CodeKind::Icd9 => {
            let limit = if major.starts_with('E') {
                ICD9_E_MAX_MINOR
            } else {
                ICD9_MAX_MINOR
            };
            minor.len() <= limit && all_digits(minor)
        }
        CodeKind::Icd10 => {
            minor.len() <= ICD10_MAX_MINOR && minor.bytes().all(|b| b.is_ascii_alphanumeric())
        }
    }
}

/// Whether a parsed code satisfies its own kind's grammar.
pub fn conforms(code: &Code) -> bool {
    is_valid_major(code.kind(), code.major())
        && is_valid_minor(code.kind(), code.major(), code.minor())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_each_icd9_family_to_its_width() {
        assert_eq!(pad_icd9_major("1").unwrap(), "001");
        assert_eq!(pad_icd9_major("22").unwrap(), "022");
        assert_eq!(pad_icd9_major("V1").unwrap(), "V01");
        assert_eq!(pad_icd9_major("E85").unwrap(), "E085");
        assert_eq!(pad_icd9_major("391").unwrap(), "391");
        assert!(pad_icd9_major("E").is_err());
        assert!(pad_icd9_major("").is_err());
    }

    #[test]
    fn icd9_majors() {
        assert!(is_valid_major(CodeKind::Icd9, "001"));
        assert!(is_valid_major(CodeKind::Icd9, "V10"));
        assert!(is_valid_major(CodeKind::Icd9, "E850"));
        assert!(!is_valid_major(CodeKind::Icd9, "01"));
        assert!(!is_valid_major(CodeKind::Icd9, "E85"));
        assert!(!is_valid_major(CodeKind::Icd9, "A01"));
    }

    #[test]
    fn icd10_majors() {
        assert!(is_valid_major(CodeKind::Icd10, "A01"));
        assert!(is_valid_major(CodeKind::Icd10, "V10"));
        assert!(!is_valid_major(CodeKind::Icd10, "101"));
        assert!(!is_valid_major(CodeKind::Icd10, "A1"));
        assert!(!is_valid_major(CodeKind::Icd10, "C4A"));
    }

    #[test]
    fn minors() {
        assert!(is_valid_minor(CodeKind::Icd9, "410", "01"));
        assert!(!is_valid_minor(CodeKind::Icd9, "410", "012"));
        assert!(is_valid_minor(CodeKind::Icd9, "E850", "0"));
        assert!(!is_valid_minor(CodeKind::Icd9, "E850", "00"));
        assert!(is_valid_minor(CodeKind::Icd10, "S52", "521A"));
        assert!(!is_valid_minor(CodeKind::Icd10, "S52", "521AB"));
    }
}
