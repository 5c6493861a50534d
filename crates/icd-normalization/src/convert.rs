//! Short/decimal format conversion.

use icd_model::grammar::pad_icd9_major;
use icd_model::{BatchOutcome, Code, CodeForm, CodeKind, FormHint, KindHint, ParseOptions, Result};
use tracing::debug;

use crate::parse::{options_for, parse};

/// Pad a major for `kind`; ICD-10 majors are never padded.
///
/// # Errors
///
/// [`icd_model::IcdError::Conversion`] when the major has nothing to pad.
pub fn pad_major(kind: CodeKind, major: &str) -> Result<String> {
    match kind {
        CodeKind::Icd9 => pad_icd9_major(major)
            .map_err(|reason| icd_model::IcdError::conversion(major, reason)),
        CodeKind::Icd10 => Ok(major.to_string()),
    }
}

/// Re-render `code` in `form`, padding the major where needed.
pub fn convert(code: &Code, form: CodeForm) -> Code {
    let padded = match pad_major(code.kind(), code.major()) {
        Ok(major) if major != code.major() => Code::new(code.kind(), major, code.minor(), form).ok(),
        _ => None,
    };
    padded.unwrap_or_else(|| code.with_form(form))
}

pub fn to_short(code: &Code) -> Code {
    convert(code, CodeForm::Short)
}

pub fn to_decimal(code: &Code) -> Code {
    convert(code, CodeForm::Decimal)
}

/// Parse `raw` and render it in `target` form.
pub fn convert_str(raw: &str, options: &ParseOptions, target: CodeForm) -> Result<String> {
    parse(raw, options).map(|code| convert(&code, target).to_string())
}

/// Convert every input to `target`; failures are reported per item.
pub fn convert_all<S: AsRef<str>>(
    inputs: &[S],
    options: &ParseOptions,
    target: CodeForm,
) -> BatchOutcome<String> {
    let outcome = BatchOutcome::collect(inputs, |raw| convert_str(raw, options, target));
    debug!(
        total = outcome.len(),
        failed = outcome.failures.len(),
        target = ?target,
        "converted codes"
    );
    outcome
}

/// Decimal-form inputs to short form.
pub fn decimal_to_short<S: AsRef<str>>(inputs: &[S], kind: KindHint) -> BatchOutcome<String> {
    convert_all(inputs, &options_for(kind, FormHint::Decimal), CodeForm::Short)
}

/// Short-form inputs to decimal form.
pub fn short_to_decimal<S: AsRef<str>>(inputs: &[S], kind: KindHint) -> BatchOutcome<String> {
    convert_all(inputs, &options_for(kind, FormHint::Short), CodeForm::Decimal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icd10_majors_are_left_alone() {
        assert_eq!(pad_major(CodeKind::Icd10, "A1").unwrap(), "A1");
    }

    #[test]
    fn convert_pads_codes_built_from_raw_segments() {
        let code = Code::new(CodeKind::Icd9, "1", "0", CodeForm::Decimal).unwrap();
        assert_eq!(to_short(&code).to_string(), "0010");
        assert_eq!(to_decimal(&code).to_string(), "001.0");
    }

    #[test]
    fn decimal_rendering_drops_empty_minor() {
        let code = Code::new(CodeKind::Icd9, "100", "", CodeForm::Short).unwrap();
        assert_eq!(to_decimal(&code).to_string(), "100");
    }
}
