//! Code parser.
//!
//! Reading a code happens in two steps. The raw string is first scanned
//! into a token (trimmed, upper-cased, representation decided), then the
//! token is split into major and minor segments under a concrete kind. When
//! no kind is given, the kind is inferred from the leading character:
//! digits mean ICD-9, letters other than `E` and `V` mean ICD-10, and `E`/`V`
//! codes are tried under both grammars.

use icd_model::grammar::{conforms, pad_icd9_major};
use icd_model::{
    BatchOutcome, Code, CodeForm, CodeKind, CodeSet, FormHint, IcdError, ItemFailure, KindHint,
    ParseOptions, Result,
};
use tracing::debug;


/// Outcome of kind inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KindResolution {
    Resolved(Code),
    /// The string is a valid code under both classifications.
    Ambiguous { icd9: Code, icd10: Code },
}

impl KindResolution {
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous { .. })
    }

    /// Every candidate parse, ICD-9 first.
    pub fn candidates(&self) -> Vec<&Code> {
        match self {
            Self::Resolved(code) => vec![code],
            Self::Ambiguous { icd9, icd10 } => vec![icd9, icd10],
        }
    }

    /// The single parse, if there is one.
    pub fn into_code(self) -> Option<Code> {
        match self {
            Self::Resolved(code) => Some(code),
            Self::Ambiguous { .. } => None,
        }
    }
}

struct Token<'a> {
    raw: &'a str,
    text: String,
    form: CodeForm,
}

impl<'a> Token<'a> {
    fn scan(raw: &'a str, form_hint: FormHint) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IcdError::parse(raw, "empty code"));
        }
        if let Some(ch) = trimmed
            .chars()
            .find(|ch| !(ch.is_ascii_alphanumeric() || *ch == '.'))
        {
            return Err(IcdError::parse(trimmed, format!("unexpected character '{ch}'")));
        }
        let separators = trimmed.matches('.').count();
        if separators > 1 {
            return Err(IcdError::parse(trimmed, "more than one decimal separator"));
        }
        let form = match form_hint {
            FormHint::Short if separators == 1 => {
                return Err(IcdError::parse(
                    trimmed,
                    "decimal separator in a short-form code",
                ));
            }
            FormHint::Short => CodeForm::Short,
            FormHint::Decimal => CodeForm::Decimal,
            FormHint::Infer if separators == 1 => CodeForm::Decimal,
            FormHint::Infer => CodeForm::Short,
        };
        Ok(Self {
            raw: trimmed,
            text: trimmed.to_ascii_uppercase(),
            form,
        })
    }

    fn segments(&self, kind: CodeKind) -> (&str, &str) {
        match self.form {
            CodeForm::Decimal => self
                .text
                .split_once('.')
                .unwrap_or((self.text.as_str(), "")),
            CodeForm::Short => split_short(kind, &self.text),
        }
    }

    fn leading(&self) -> u8 {
        self.text.as_bytes()[0]
    }
}

/// Split a short-form string. Anything no longer than a full major is the
/// major alone, so `"020"` is major `020` and never `2.0`.
fn split_short(kind: CodeKind, text: &str) -> (&str, &str) {
    let width = match kind {
        CodeKind::Icd9 if text.starts_with('E') => 4,
        _ => 3,
    };
    if text.len() <= width {
        (text, "")
    } else {
        text.split_at(width)
    }
}

fn parse_as(token: &Token<'_>, kind: CodeKind, strict: bool) -> Result<Code> {
    let (major, minor) = token.segments(kind);
    if major.is_empty() {
        return Err(IcdError::conversion(token.raw, "no major part to pad"));
    }
    let major = match kind {
        CodeKind::Icd9 => {
            pad_icd9_major(major).map_err(|reason| IcdError::conversion(token.raw, reason))?
        }
        CodeKind::Icd10 => major.to_string(),
    };
    let code = Code::new(kind, major, minor, token.form)?;
    if strict && !conforms(&code) {
        return Err(IcdError::parse(token.raw, format!("not a valid {kind} code")));
    }
    Ok(code)
}

fn infer(token: &Token<'_>, strict: bool) -> Result<KindResolution> {
    match token.leading() {
        b'E' | b'V' => {
            let icd9 = parse_as(token, CodeKind::Icd9, false)
                .ok()
                .filter(conforms);
            let icd10 = parse_as(token, CodeKind::Icd10, false)
                .ok()
                .filter(conforms);
            match (icd9, icd10) {
                (Some(icd9), Some(icd10)) => {
                    debug!(code = token.raw, "code is valid under both kinds");
                    Ok(KindResolution::Ambiguous { icd9, icd10 })
                }
                (Some(code), None) | (None, Some(code)) => Ok(KindResolution::Resolved(code)),
                (None, None) => Err(IcdError::parse(
                    token.raw,
                    "not a valid ICD-9 or ICD-10 code",
                )),
            }
        }
        lead if lead.is_ascii_digit() || lead == b'.' => {
            parse_as(token, CodeKind::Icd9, strict).map(KindResolution::Resolved)
        }
        _ => parse_as(token, CodeKind::Icd10, strict).map(KindResolution::Resolved),
    }
}

/// Parse a code, reporting every candidate when the kind is ambiguous.
pub fn resolve(raw: &str, options: &ParseOptions) -> Result<KindResolution> {
    let token = Token::scan(raw, options.form_hint)?;
    match options.kind_hint.kind() {
        Some(kind) => parse_as(&token, kind, options.strict).map(KindResolution::Resolved),
        None => infer(&token, options.strict),
    }
}

/// Parse a single code.
///
/// # Errors
///
/// - [`IcdError::Parse`] for malformed input, or for grammar violations in
///   strict mode.
/// - [`IcdError::AmbiguousKind`] when no kind hint is given and the string
///   is valid under both classifications.
/// - [`IcdError::Conversion`] when the major has nothing to pad.
pub fn parse(raw: &str, options: &ParseOptions) -> Result<Code> {
    match resolve(raw, options)? {
        KindResolution::Resolved(code) => Ok(code),
        KindResolution::Ambiguous { .. } => Err(IcdError::AmbiguousKind {
            input: raw.trim().to_string(),
        }),
    }
}

/// Parse every input; failures are collected per item.
pub fn parse_all<S: AsRef<str>>(inputs: &[S], options: &ParseOptions) -> BatchOutcome<Code> {
    let outcome = BatchOutcome::collect(inputs, |raw| parse(raw, options));
    if !outcome.is_clean() {
        debug!(
            total = outcome.len(),
            failed = outcome.failures.len(),
            "some codes could not be parsed"
        );
    }
    outcome
}

/// Parse inputs into a de-duplicated set plus the inputs that failed.
pub fn parse_set<S: AsRef<str>>(
    inputs: &[S],
    options: &ParseOptions,
) -> (CodeSet, Vec<ItemFailure>) {
    let outcome = parse_all(inputs, options);
    let failures = outcome.failures.clone();
    (outcome.into_values().into_iter().collect(), failures)
}

/// Kind hint shorthand used by the batch helpers.
pub(crate) fn options_for(kind: KindHint, form: FormHint) -> ParseOptions {
    ParseOptions::new().with_kind(kind).with_form(form)
}
