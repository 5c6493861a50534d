//! Code range expansion.

use icd_model::{Code, CodeSet, Hierarchy, IcdError, ParseOptions, Result};

/// Every defined code from `start` to `end` inclusive, in hierarchy order,
/// together with all descendants of `end`.
///
/// Neither bound needs to be defined itself. Codes come back in the form of
/// `start`.
///
/// # Errors
///
/// [`IcdError::Parse`] when the bounds are of different kinds or `end`
/// sorts before `start`.
pub fn expand_range(start: &Code, end: &Code, hierarchy: &Hierarchy) -> Result<CodeSet> {
    let range = format!("{start}-{end}");
    if start.kind() != end.kind() {
        return Err(IcdError::parse(range, "range bounds are of different kinds"));
    }
    let low = start.sort_key();
    let high = end.sort_key();
    if low > high {
        return Err(IcdError::parse(range, "range end sorts before its start"));
    }

    let end_short = end.short();
    Ok(hierarchy
        .iter()
        .filter(|node| {
            let key = node.code().sort_key();
            key >= low
                && (key <= high
                    || (key.0 == high.0 && key.1 == high.1 && key.2.starts_with(&end_short)))
        })
        .map(|node| node.code().with_form(start.form()))
        .collect())
}

/// Parse both bounds with `options`, then [`expand_range`].
pub fn expand_range_str(
    start: &str,
    end: &str,
    options: &ParseOptions,
    hierarchy: &Hierarchy,
) -> Result<CodeSet> {
    let start = icd_normalization::parse(start, options)?;
    let end = icd_normalization::parse(end, options)?;
    expand_range(&start, &end, hierarchy)
}
