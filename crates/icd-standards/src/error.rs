//! Error types for reference data loading.

use std::path::PathBuf;

use icd_model::IcdError;
use thiserror::Error;

/// Errors that can occur when loading hierarchies and comorbidity maps.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StandardsError {
    /// Reference directory not found.
    #[error("Reference directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read a file or directory.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse CSV content.
    #[error("Failed to parse CSV {file}: {message}")]
    CsvParse { file: String, message: String },

    /// Invalid value in CSV field.
    #[error("Invalid {field} value '{value}' in {file} (line {line})")]
    InvalidValue {
        field: &'static str,
        value: String,
        file: String,
        line: u64,
    },

    /// A code column that does not hold a well-formed code.
    #[error("Invalid code in {file} (line {line}): {source}")]
    InvalidCode {
        file: String,
        line: u64,
        #[source]
        source: IcdError,
    },

    /// Rows that do not form a forest.
    #[error("Inconsistent hierarchy in {file}: {source}")]
    Hierarchy {
        file: String,
        #[source]
        source: IcdError,
    },

    /// The embedded reference data could not be initialised.
    #[error("Embedded reference data unavailable")]
    EmbeddedUnavailable,
}

/// Result type for reference data loading.
pub type Result<T> = std::result::Result<T, StandardsError>;
