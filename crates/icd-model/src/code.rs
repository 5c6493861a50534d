//! The parsed diagnostic code value.
//!
//! A [`Code`] always stores its major and minor segments separately, so the
//! short form is `major + minor` and the decimal form is `major.minor` (or
//! just `major` when the minor is empty). Which of the two a code *prints*
//! as is carried in [`CodeForm`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{IcdError, Result};
use crate::grammar::pad_icd9_major;

/// Classification family of a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeKind {
    Icd9,
    Icd10,
}

impl CodeKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Icd9 => "ICD-9",
            Self::Icd10 => "ICD-10",
        }
    }

    pub const fn all() -> [CodeKind; 2] {
        [Self::Icd9, Self::Icd10]
    }
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeKind {
    type Err = IcdError;

    fn from_str(value: &str) -> Result<Self> {
        let compact: String = value
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|ch| ch.to_ascii_uppercase())
            .collect();
        match compact.as_str() {
            "ICD9" | "ICD9CM" | "9" => Ok(Self::Icd9),
            "ICD10" | "ICD10CM" | "10" => Ok(Self::Icd10),
            _ => Err(IcdError::parse(value, "unknown code kind")),
        }
    }
}

/// Textual representation a code is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeForm {
    /// No punctuation, e.g. `3910`.
    Short,
    /// Decimal separator after the major, e.g. `391.0`.
    Decimal,
}

/// A single diagnostic code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Code {
    kind: CodeKind,
    major: String,
    minor: String,
    form: CodeForm,
}

impl Code {
    /// Build a code from already separated segments.
    ///
    /// Segments are upper-cased. The major must be non-empty and both
    /// segments may only hold ASCII letters and digits; grammar rules
    /// beyond that are the validity checker's concern.
    pub fn new(
        kind: CodeKind,
        major: impl Into<String>,
        minor: impl Into<String>,
        form: CodeForm,
    ) -> Result<Self> {
        let major = major.into().to_ascii_uppercase();
        let minor = minor.into().to_ascii_uppercase();
        if major.is_empty() {
            return Err(IcdError::parse(format!("{major}{minor}"), "empty major"));
        }
        if let Some(ch) = major
            .chars()
            .chain(minor.chars())
            .find(|ch| !ch.is_ascii_alphanumeric())
        {
            return Err(IcdError::parse(
                format!("{major}.{minor}"),
                format!("unexpected character '{ch}'"),
            ));
        }
        Ok(Self {
            kind,
            major,
            minor,
            form,
        })
    }

    pub fn kind(&self) -> CodeKind {
        self.kind
    }

    pub fn major(&self) -> &str {
        &self.major
    }

    pub fn minor(&self) -> &str {
        &self.minor
    }

    pub fn form(&self) -> CodeForm {
        self.form
    }

    pub fn is_short(&self) -> bool {
        self.form == CodeForm::Short
    }

    /// Short form text, `major + minor`.
    pub fn short(&self) -> String {
        format!("{}{}", self.major, self.minor)
    }

    /// Decimal form text; the separator is only present with a minor.
    pub fn decimal(&self) -> String {
        if self.minor.is_empty() {
            self.major.clone()
        } else {
            format!("{}.{}", self.major, self.minor)
        }
    }

    /// Same segments rendered in another form.
    pub fn with_form(&self, form: CodeForm) -> Self {
        Self {
            form,
            ..self.clone()
        }
    }

    /// The same code with an ICD-9 major left-padded to full width, so
    /// segments like `("1", "")` and `("001", "")` name one diagnosis.
    pub fn padded(&self) -> Self {
        match self.padded_major() {
            Some(major) => Self {
                major,
                ..self.clone()
            },
            None => self.clone(),
        }
    }

    fn padded_major(&self) -> Option<String> {
        if self.kind != CodeKind::Icd9 {
            return None;
        }
        pad_icd9_major(&self.major)
            .ok()
            .filter(|major| *major != self.major)
    }

    /// Identity used for set membership: the same diagnosis written in
    /// either form, or with an unpadded ICD-9 major, compares equal.
    pub fn key(&self) -> CodeKey {
        let short = match self.padded_major() {
            Some(major) => format!("{major}{}", self.minor),
            None => self.short(),
        };
        CodeKey {
            kind: self.kind,
            short,
        }
    }

    /// Canonical ordering key.
    ///
    /// ICD-9 sorts before ICD-10; within ICD-9, numeric codes precede `V`
    /// codes, which precede `E` codes. Codes then compare by short form, so
    /// a parent always sorts directly before its own descendants.
    pub fn sort_key(&self) -> (CodeKind, u8, String) {
        let rank = match (self.kind, self.major.as_bytes().first()) {
            (CodeKind::Icd9, Some(b'V')) => 1,
            (CodeKind::Icd9, Some(b'E')) => 2,
            _ => 0,
        };
        (self.kind, rank, self.key().short)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.form {
            CodeForm::Short => write!(f, "{}{}", self.major, self.minor),
            CodeForm::Decimal => f.write_str(&self.decimal()),
        }
    }
}

/// Form-independent identity of a code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CodeKey {
    pub kind: CodeKind,
    pub short: String,
}

impl CodeKey {
    pub fn new(kind: CodeKind, short: impl Into<String>) -> Self {
        Self {
            kind,
            short: short.into().to_ascii_uppercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_both_forms() {
        let code = Code::new(CodeKind::Icd9, "391", "0", CodeForm::Short).unwrap();
        assert_eq!(code.to_string(), "3910");
        assert_eq!(code.with_form(CodeForm::Decimal).to_string(), "391.0");
    }

    #[test]
    fn decimal_without_minor_has_no_separator() {
        let code = Code::new(CodeKind::Icd9, "100", "", CodeForm::Decimal).unwrap();
        assert_eq!(code.to_string(), "100");
    }

    #[test]
    fn unpadded_icd9_majors_share_a_key_with_padded_ones() {
        let bare = Code::new(CodeKind::Icd9, "1", "", CodeForm::Short).unwrap();
        let full = Code::new(CodeKind::Icd9, "001", "", CodeForm::Decimal).unwrap();
        assert_eq!(bare.key(), full.key());
        assert_eq!(bare.padded().to_string(), "001");
        let e = Code::new(CodeKind::Icd9, "E85", "0", CodeForm::Short).unwrap();
        assert_eq!(e.key().short, "E0850");
        let icd10 = Code::new(CodeKind::Icd10, "A1", "", CodeForm::Short).unwrap();
        assert_eq!(icd10.padded().major(), "A1");
    }

    #[test]
    fn rejects_empty_major() {
        assert!(Code::new(CodeKind::Icd10, "", "1", CodeForm::Short).is_err());
    }

    #[test]
    fn kind_from_str_accepts_common_spellings() {
        assert_eq!("icd9".parse::<CodeKind>().unwrap(), CodeKind::Icd9);
        assert_eq!("ICD-10-CM".parse::<CodeKind>().unwrap(), CodeKind::Icd10);
        assert!("icd11".parse::<CodeKind>().is_err());
    }

    #[test]
    fn icd9_supplementary_codes_sort_after_numeric() {
        let numeric = Code::new(CodeKind::Icd9, "999", "", CodeForm::Short).unwrap();
        let v = Code::new(CodeKind::Icd9, "V01", "", CodeForm::Short).unwrap();
        let e = Code::new(CodeKind::Icd9, "E800", "", CodeForm::Short).unwrap();
        assert!(numeric.sort_key() < v.sort_key());
        assert!(v.sort_key() < e.sort_key());
    }
}
