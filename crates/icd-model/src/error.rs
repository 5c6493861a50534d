use serde::Serialize;
use thiserror::Error;

/// Per-item failures raised while reading or reshaping a code.
///
/// None of these are fatal: batch operations collect them next to the
/// successful results instead of aborting.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum IcdError {
    #[error("malformed code '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("code '{input}' is valid as both ICD-9 and ICD-10; give a kind hint")]
    AmbiguousKind { input: String },

    #[error("cannot format code '{input}': {reason}")]
    Conversion { input: String, reason: String },

    #[error("duplicate code in hierarchy: {code}")]
    DuplicateCode { code: String },

    #[error("hierarchy node {code} references unknown parent {parent}")]
    UnknownParent { code: String, parent: String },

    #[error("hierarchy node {code} is its own ancestor")]
    HierarchyCycle { code: String },
}

impl IcdError {
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn conversion(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Conversion {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IcdError>;
