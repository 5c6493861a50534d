use serde::{Deserialize, Serialize};

use crate::code::{CodeForm, CodeKind};

/// Which classification the caller expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindHint {
    Icd9,
    Icd10,
    /// Decide from the shape of the string.
    #[default]
    Infer,
}

impl KindHint {
    pub fn kind(self) -> Option<CodeKind> {
        match self {
            Self::Icd9 => Some(CodeKind::Icd9),
            Self::Icd10 => Some(CodeKind::Icd10),
            Self::Infer => None,
        }
    }
}

impl From<CodeKind> for KindHint {
    fn from(kind: CodeKind) -> Self {
        match kind {
            CodeKind::Icd9 => Self::Icd9,
            CodeKind::Icd10 => Self::Icd10,
        }
    }
}

/// Which representation the caller expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormHint {
    Short,
    Decimal,
    /// A decimal separator means decimal form, otherwise short form.
    #[default]
    Infer,
}

impl From<CodeForm> for FormHint {
    fn from(form: CodeForm) -> Self {
        match form {
            CodeForm::Short => Self::Short,
            CodeForm::Decimal => Self::Decimal,
        }
    }
}

/// Options for reading raw code strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    #[serde(rename = "kind")]
    pub kind_hint: KindHint,
    #[serde(rename = "form")]
    pub form_hint: FormHint,
    /// Reject codes that fail their kind's grammar instead of returning
    /// them for the caller to inspect.
    pub strict: bool,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_kind(mut self, kind_hint: impl Into<KindHint>) -> Self {
        self.kind_hint = kind_hint.into();
        self
    }

    #[must_use]
    pub fn with_form(mut self, form_hint: impl Into<FormHint>) -> Self {
        self.form_hint = form_hint.into();
        self
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}
