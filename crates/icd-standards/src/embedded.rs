//! Embedded reference data.
//!
//! The default hierarchies and comorbidity maps are embedded at compile time
//! using `include_str!()`, so the toolkit works without any files on disk.
//! A directory with the same layout can replace them at runtime (see
//! [`crate::paths`]).
//!
//! # Structure
//!
//! - `hierarchy/icd9.csv`: ICD-9-CM chapters used by the toolkit
//! - `hierarchy/icd10.csv`: ICD-10-CM chapters used by the toolkit
//! - `comorbidity/charlson.csv`: Charlson categories (Quan coding)
//! - `comorbidity/elixhauser.csv`: Elixhauser categories (1998 ICD-9 coding)
//! - `comorbidity/quan_elixhauser.csv`: Elixhauser categories (Quan coding)
//! - `comorbidity/ahrq.csv`: AHRQ comorbidity software categories (ICD-9)

// =============================================================================
// Hierarchies
// =============================================================================

/// ICD-9-CM hierarchy rows.
pub const ICD9_HIERARCHY: &str = include_str!("../data/hierarchy/icd9.csv");

/// ICD-10-CM hierarchy rows.
pub const ICD10_HIERARCHY: &str = include_str!("../data/hierarchy/icd10.csv");

// =============================================================================
// Comorbidity maps
// =============================================================================

/// Charlson comorbidity categories.
pub const CHARLSON_MAP: &str = include_str!("../data/comorbidity/charlson.csv");

/// Elixhauser comorbidity categories.
pub const ELIXHAUSER_MAP: &str = include_str!("../data/comorbidity/elixhauser.csv");

/// Elixhauser categories with the enhanced ICD-9 and ICD-10 coding of Quan et al.
pub const QUAN_ELIXHAUSER_MAP: &str = include_str!("../data/comorbidity/quan_elixhauser.csv");

/// AHRQ comorbidity categories.
pub const AHRQ_MAP: &str = include_str!("../data/comorbidity/ahrq.csv");

/// Hierarchy files as `(filename, content)` pairs.
pub fn hierarchy_files() -> [(&'static str, &'static str); 2] {
    [
        ("hierarchy/icd9.csv", ICD9_HIERARCHY),
        ("hierarchy/icd10.csv", ICD10_HIERARCHY),
    ]
}

/// Comorbidity map files as `(filename, content)` pairs.
pub fn comorbidity_files() -> [(&'static str, &'static str); 4] {
    [
        ("comorbidity/charlson.csv", CHARLSON_MAP),
        ("comorbidity/elixhauser.csv", ELIXHAUSER_MAP),
        ("comorbidity/quan_elixhauser.csv", QUAN_ELIXHAUSER_MAP),
        ("comorbidity/ahrq.csv", AHRQ_MAP),
    ]
}
