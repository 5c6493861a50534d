use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Well-formed, but not an entry of the reference classification.
    UndefinedCode,
    /// Defined, but only as a category heading.
    NonBillableCode,
}

/// A non-fatal finding reported next to an operation's results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// The code the finding is about, as rendered by the caller.
    pub code: String,
    pub message: String,
}

impl Diagnostic {
    pub fn undefined(code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            kind: DiagnosticKind::UndefinedCode,
            severity: Severity::Warning,
            message: format!("{code} is not defined in the reference hierarchy"),
            code,
        }
    }

    pub fn non_billable(code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            kind: DiagnosticKind::NonBillableCode,
            severity: Severity::Warning,
            message: format!("{code} is a category heading, not a billable diagnosis"),
            code,
        }
    }
}

/// Diagnostics gathered by one call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticReport {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity == Severity::Warning)
            .count()
    }

    /// Codes reported as undefined, in report order.
    pub fn undefined_codes(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.kind == DiagnosticKind::UndefinedCode)
            .map(|diagnostic| diagnostic.code.as_str())
            .collect()
    }
}

impl Extend<Diagnostic> for DiagnosticReport {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.diagnostics.extend(iter);
    }
}
