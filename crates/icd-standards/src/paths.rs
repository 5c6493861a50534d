//! Reference directory resolution.

use std::path::PathBuf;

/// Environment variable pointing at an alternate reference directory.
pub const REFERENCE_ENV_VAR: &str = "ICD_REFERENCE_DIR";

/// Subdirectory holding hierarchy CSV files.
pub const HIERARCHY_DIR: &str = "hierarchy";

/// Subdirectory holding comorbidity map CSV files.
pub const COMORBIDITY_DIR: &str = "comorbidity";

/// Reference directory from `ICD_REFERENCE_DIR`, if set and non-empty.
///
/// When this returns `None` the embedded data is used.
pub fn reference_dir_from_env() -> Option<PathBuf> {
    std::env::var_os(REFERENCE_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
