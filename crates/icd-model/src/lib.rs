//! Shared data model for ICD-9 and ICD-10 code handling.

pub mod batch;
pub mod code;
pub mod code_set;
pub mod comorbidity;
pub mod diagnostics;
pub mod error;
pub mod grammar;
pub mod hierarchy;
pub mod options;

pub use batch::{BatchOutcome, ItemFailure};
pub use code::{Code, CodeForm, CodeKey, CodeKind};
pub use code_set::CodeSet;
pub use comorbidity::ComorbidityMap;
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticReport, Severity};
pub use error::{IcdError, Result};
pub use hierarchy::{Hierarchy, HierarchyBuilder, HierarchyNode, Node, NodeId};
pub use options::{FormHint, KindHint, ParseOptions};
