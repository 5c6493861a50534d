//! Checks against a loaded classification hierarchy.

use icd_model::{Code, CodeSet, Hierarchy};
use tracing::debug;

/// Whether `code` is an entry of `hierarchy`, in either form.
pub fn is_defined(code: &Code, hierarchy: &Hierarchy) -> bool {
    hierarchy.contains(code)
}

/// Whether `code` is defined and billable. Category headings are not.
pub fn is_billable(code: &Code, hierarchy: &Hierarchy) -> bool {
    hierarchy.get(code).is_some_and(|node| node.is_billable())
}

/// Codes of `codes` that `hierarchy` defines, in input order.
pub fn filter_defined(codes: &CodeSet, hierarchy: &Hierarchy) -> CodeSet {
    let defined: CodeSet = codes
        .iter()
        .filter(|code| hierarchy.contains(code))
        .cloned()
        .collect();
    if defined.len() < codes.len() {
        debug!(
            dropped = codes.len() - defined.len(),
            "dropped codes missing from the hierarchy"
        );
    }
    defined
}

/// Codes of `codes` that `hierarchy` does not define, in input order.
pub fn undefined_codes(codes: &CodeSet, hierarchy: &Hierarchy) -> CodeSet {
    codes
        .iter()
        .filter(|code| !hierarchy.contains(code))
        .cloned()
        .collect()
}
