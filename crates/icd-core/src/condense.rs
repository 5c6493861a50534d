//! Hierarchy condensation.
//!
//! A node's coverage is the set of coverage points (leaves, plus billable
//! inner nodes) in its subtree. Condensing replaces every group of codes
//! that together cover a whole subtree with the subtree's root, repeated
//! upward until nothing more collapses.

use icd_model::{Code, CodeForm, CodeSet, Diagnostic, DiagnosticReport, Hierarchy, Node};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Options for [`condense_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CondenseOptions {
    /// Drop codes the hierarchy does not define instead of passing them
    /// through.
    pub drop_undefined: bool,
    /// Report undefined codes as diagnostics.
    pub report_undefined: bool,
}

impl Default for CondenseOptions {
    fn default() -> Self {
        Self {
            drop_undefined: false,
            report_undefined: true,
        }
    }
}

impl CondenseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_drop_undefined(mut self, drop_undefined: bool) -> Self {
        self.drop_undefined = drop_undefined;
        self
    }

    #[must_use]
    pub fn with_report_undefined(mut self, report_undefined: bool) -> Self {
        self.report_undefined = report_undefined;
        self
    }
}

/// Result of [`condense`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Condensed {
    /// Condensed defined codes in hierarchy order, then undefined codes in
    /// input order.
    pub codes: CodeSet,
    pub diagnostics: DiagnosticReport,
}

/// Condense `codes` with default options.
pub fn condense(codes: &CodeSet, hierarchy: &Hierarchy) -> Condensed {
    condense_with(codes, hierarchy, &CondenseOptions::default())
}

/// Condense `codes` to the minimal set of codes with the same coverage.
///
/// Output codes are rendered in the form of the first input code.
pub fn condense_with(codes: &CodeSet, hierarchy: &Hierarchy, options: &CondenseOptions) -> Condensed {
    let form = output_form(codes);
    let mut condensed = Condensed::default();
    let mut present: Vec<Node<'_>> = Vec::with_capacity(codes.len());
    let mut undefined: Vec<&Code> = Vec::new();
    for code in codes {
        match hierarchy.get(code) {
            Some(node) => present.push(node),
            None => undefined.push(code),
        }
    }

    for node in collapse(&present) {
        condensed.codes.insert(node.code().with_form(form));
    }

    if !undefined.is_empty() {
        warn!(
            count = undefined.len(),
            dropped = options.drop_undefined,
            "codes not defined in the hierarchy"
        );
    }
    for code in undefined {
        if options.report_undefined {
            condensed.diagnostics.push(Diagnostic::undefined(code.to_string()));
        }
        if !options.drop_undefined {
            condensed.codes.insert(code.clone());
        }
    }

    debug!(input = codes.len(), output = condensed.codes.len(), "condensed codes");
    condensed
}

/// Maximal fully covered nodes, in pre-order.
fn collapse<'a>(present: &[Node<'a>]) -> Vec<Node<'a>> {
    let mut roots: Vec<Node<'a>> = present.iter().map(Node::root).collect();
    roots.sort_by_key(|root| root.id());
    roots.dedup_by_key(|root| root.id());

    let mut output = Vec::new();
    for root in roots {
        let range = root.subtree_range();
        let mut marked = vec![false; range.len()];
        for node in present {
            if range.contains(&node.id().index()) {
                marked[node.id().index() - range.start] = true;
            }
        }

        // Children sit after their parent in pre-order, so a reverse walk
        // sees every child before its parent.
        let mut covered = vec![false; range.len()];
        let nodes: Vec<Node<'a>> = root.subtree().collect();
        for node in nodes.iter().rev() {
            let slot = node.id().index() - range.start;
            covered[slot] = marked[slot]
                || (!node.is_coverage_point()
                    && node
                        .children()
                        .all(|child| covered[child.id().index() - range.start]));
        }

        let mut next = 0usize;
        for node in &nodes {
            let index = node.id().index();
            if index < next {
                continue;
            }
            if covered[index - range.start] {
                output.push(*node);
                next = node.subtree_range().end;
            }
        }
    }
    output
}

fn output_form(codes: &CodeSet) -> CodeForm {
    codes.iter().next().map_or(CodeForm::Short, Code::form)
}

/// Every coverage point under each defined code; undefined codes are kept
/// as they are.
pub fn expand_to_leaves(codes: &CodeSet, hierarchy: &Hierarchy) -> CodeSet {
    let mut leaves = CodeSet::new();
    for code in codes {
        match hierarchy.get(code) {
            Some(node) => {
                for point in node.subtree().filter(Node::is_coverage_point) {
                    leaves.insert(point.code().with_form(code.form()));
                }
            }
            None => {
                leaves.insert(code.clone());
            }
        }
    }
    leaves
}
