//! Human-readable descriptions of code lists.

use icd_model::{
    CodeKind, Diagnostic, DiagnosticReport, Hierarchy, ItemFailure, ParseOptions,
};
use icd_normalization::parse_set;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::condense::{CondenseOptions, condense_with};

/// Options for [`explain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainOptions {
    pub parse: ParseOptions,
    /// Condense the codes before describing them, so that a complete set of
    /// children is described by its parent.
    pub condense_first: bool,
}

impl ExplainOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_parse(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    #[must_use]
    pub fn with_condense_first(mut self, condense_first: bool) -> Self {
        self.condense_first = condense_first;
        self
    }
}

/// One described code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplainRow {
    pub code: String,
    pub kind: CodeKind,
    pub long_desc: String,
    pub short_desc: String,
    pub billable: bool,
}

/// Rows for defined codes, per-item failures for malformed input and
/// warnings for well-formed codes the hierarchy does not define.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Explanation {
    pub rows: Vec<ExplainRow>,
    pub failures: Vec<ItemFailure>,
    pub diagnostics: DiagnosticReport,
}

/// Describe `inputs` using `hierarchy`.
///
/// Rows follow input order, or hierarchy order when condensing first.
pub fn explain<S: AsRef<str>>(
    inputs: &[S],
    hierarchy: &Hierarchy,
    options: &ExplainOptions,
) -> Explanation {
    let (codes, failures) = parse_set(inputs, &options.parse);
    let codes = if options.condense_first {
        condense_with(
            &codes,
            hierarchy,
            &CondenseOptions::new().with_report_undefined(false),
        )
        .codes
    } else {
        codes
    };

    let mut explanation = Explanation {
        failures,
        ..Explanation::default()
    };
    for code in &codes {
        match hierarchy.get(code) {
            Some(node) => explanation.rows.push(ExplainRow {
                code: code.to_string(),
                kind: code.kind(),
                long_desc: node.long_desc().to_string(),
                short_desc: node.short_desc().to_string(),
                billable: node.is_billable(),
            }),
            None => explanation
                .diagnostics
                .push(Diagnostic::undefined(code.to_string())),
        }
    }

    debug!(
        rows = explanation.rows.len(),
        failures = explanation.failures.len(),
        undefined = explanation.diagnostics.len(),
        "explained codes"
    );
    explanation
}
