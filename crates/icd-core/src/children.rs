//! Descendant lookup.

use icd_model::{Code, CodeSet, Hierarchy};
use tracing::debug;

/// `code` and all of its descendants in hierarchy order, rendered in the
/// form of `code`. Undefined codes have no children and yield an empty set.
pub fn children(code: &Code, hierarchy: &Hierarchy, billable_only: bool) -> CodeSet {
    let Some(node) = hierarchy.get(code) else {
        debug!(code = %code, "no children for undefined code");
        return CodeSet::new();
    };
    node.subtree()
        .filter(|node| !billable_only || node.is_billable())
        .map(|node| node.code().with_form(code.form()))
        .collect()
}

/// [`children`] of every code, merged in input order without repeats.
pub fn children_of_all(codes: &CodeSet, hierarchy: &Hierarchy, billable_only: bool) -> CodeSet {
    let mut all = CodeSet::new();
    for code in codes {
        all.extend(children(code, hierarchy, billable_only));
    }
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use icd_model::{CodeForm, CodeKind, HierarchyNode};

    fn icd10(major: &str, minor: &str) -> Code {
        Code::new(CodeKind::Icd10, major, minor, CodeForm::Decimal).unwrap()
    }

    fn hierarchy() -> Hierarchy {
        Hierarchy::from_forest(vec![HierarchyNode::new(icd10("I50", ""), false).with_children(
            vec![
                HierarchyNode::new(icd10("I50", "9"), true),
                HierarchyNode::new(icd10("I50", "2"), false).with_children(vec![
                    HierarchyNode::new(icd10("I50", "21"), true),
                ]),
            ],
        )])
        .unwrap()
    }

    #[test]
    fn descendants_in_hierarchy_order() {
        let all = children(&icd10("I50", ""), &hierarchy(), false);
        assert_eq!(all.to_strings(), vec!["I50", "I50.2", "I50.21", "I50.9"]);
        let billable = children(&icd10("I50", ""), &hierarchy(), true);
        assert_eq!(billable.to_strings(), vec!["I50.21", "I50.9"]);
    }

    #[test]
    fn undefined_code_has_no_children() {
        assert!(children(&icd10("I51", ""), &hierarchy(), false).is_empty());
    }
}
