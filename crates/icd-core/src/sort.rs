//! Canonical code ordering.
//!
//! ICD-9 sorts before ICD-10. Within ICD-9 numeric codes come first, then
//! `V` codes, then `E` codes. Short and decimal forms of a code sort alike.

use icd_model::{Code, CodeSet};

pub fn sort_codes(codes: &mut [Code]) {
    codes.sort_by_cached_key(Code::sort_key);
}

/// A copy of `codes` in canonical order.
pub fn sorted(codes: &CodeSet) -> CodeSet {
    let mut ordered: Vec<Code> = codes.iter().cloned().collect();
    sort_codes(&mut ordered);
    ordered.into()
}
