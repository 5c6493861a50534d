//! Validity checks for ICD codes.
//!
//! Two levels of checking are offered:
//!
//! - **Grammar**: does a string (or parsed [`Code`](icd_model::Code)) follow
//!   the structural rules of its classification? See [`is_valid`].
//! - **Reference**: is a well-formed code actually an entry of a loaded
//!   [`Hierarchy`](icd_model::Hierarchy), and is it billable? See
//!   [`is_defined`] and [`is_billable`].
//!
//! [`check_codes`] runs both over a batch and reports per-item rows.

mod reference;
mod report;
mod validity;

pub use reference::{filter_defined, is_billable, is_defined, undefined_codes};
pub use report::{CodeCheck, ValidationReport, check_codes};
pub use validity::{filter_invalid, filter_valid, is_valid, is_valid_code, is_valid_str};
