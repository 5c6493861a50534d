//! Per-item validation rows for a batch of raw codes.

use icd_model::grammar::conforms;
use icd_model::{
    Code, CodeKind, Diagnostic, DiagnosticReport, Hierarchy, IcdError, ParseOptions,
};
use icd_normalization::{KindResolution, resolve};
use serde::Serialize;
use tracing::warn;

/// Outcome of checking one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeCheck {
    pub index: usize,
    pub input: String,
    /// Parsed code in decimal form; absent when the input did not parse.
    pub code: Option<String>,
    pub kind: Option<CodeKind>,
    pub valid: bool,
    /// `None` when no hierarchy was consulted or the input did not parse.
    pub defined: Option<bool>,
    pub billable: Option<bool>,
    pub error: Option<IcdError>,
}

/// Rows for every input plus soft diagnostics from the reference checks.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub rows: Vec<CodeCheck>,
    pub diagnostics: DiagnosticReport,
}

impl ValidationReport {
    pub fn valid_count(&self) -> usize {
        self.rows.iter().filter(|row| row.valid).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.rows.len() - self.valid_count()
    }

    pub fn undefined_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.defined == Some(false))
            .count()
    }

    /// True when every input was a valid code and, if a hierarchy was
    /// given, a defined one.
    pub fn all_valid(&self) -> bool {
        self.rows
            .iter()
            .all(|row| row.valid && row.defined != Some(false))
    }
}

/// Check every input against the grammar and, optionally, `hierarchy`.
///
/// Inputs are parsed leniently so that out-of-grammar codes still show
/// their parsed segments; `options.strict` is ignored.
pub fn check_codes<S: AsRef<str>>(
    inputs: &[S],
    options: &ParseOptions,
    hierarchy: Option<&Hierarchy>,
) -> ValidationReport {
    let lenient = options.with_strict(false);
    let mut report = ValidationReport::default();
    for (index, input) in inputs.iter().enumerate() {
        let input = input.as_ref();
        let row = match resolve(input, &lenient) {
            Ok(KindResolution::Resolved(code)) => {
                check_code(index, input, &code, hierarchy, &mut report.diagnostics)
            }
            Ok(KindResolution::Ambiguous { .. }) => CodeCheck {
                index,
                input: input.to_string(),
                code: None,
                kind: None,
                valid: true,
                defined: None,
                billable: None,
                error: Some(IcdError::AmbiguousKind {
                    input: input.trim().to_string(),
                }),
            },
            Err(error) => CodeCheck {
                index,
                input: input.to_string(),
                code: None,
                kind: None,
                valid: false,
                defined: None,
                billable: None,
                error: Some(error),
            },
        };
        report.rows.push(row);
    }
    if report.invalid_count() > 0 || !report.diagnostics.is_empty() {
        warn!(
            total = report.rows.len(),
            invalid = report.invalid_count(),
            undefined = report.undefined_count(),
            "code check found problems"
        );
    }
    report
}

fn check_code(
    index: usize,
    input: &str,
    code: &Code,
    hierarchy: Option<&Hierarchy>,
    diagnostics: &mut DiagnosticReport,
) -> CodeCheck {
    let valid = conforms(code);
    let node = hierarchy.map(|hierarchy| hierarchy.get(code));
    let decimal = code.decimal();
    if valid {
        match node {
            Some(None) => diagnostics.push(Diagnostic::undefined(&decimal)),
            Some(Some(node)) if !node.is_billable() => {
                diagnostics.push(Diagnostic::non_billable(&decimal));
            }
            _ => {}
        }
    }
    CodeCheck {
        index,
        input: input.to_string(),
        code: Some(decimal),
        kind: Some(code.kind()),
        valid,
        defined: node.map(|node| node.is_some()),
        billable: node.map(|node| node.is_some_and(|node| node.is_billable())),
        error: None,
    }
}
