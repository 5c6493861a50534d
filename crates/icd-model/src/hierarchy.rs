//! Classification hierarchy as a read-only forest.
//!
//! Reference data arrives either as nested [`HierarchyNode`] trees or as
//! flat parent-linked rows (see [`HierarchyBuilder`]). Both end up in a
//! [`Hierarchy`], which stores nodes in pre-order so that every subtree is a
//! contiguous index range. Roots and siblings are ordered by
//! [`Code::sort_key`], which makes pre-order and canonical code order agree.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::code::{Code, CodeForm, CodeKey};
use crate::error::{IcdError, Result};

/// A position in the official classification tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub code: Code,
    pub is_billable: bool,
    #[serde(default)]
    pub short_desc: String,
    #[serde(default)]
    pub long_desc: String,
    #[serde(default)]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    pub fn new(code: Code, is_billable: bool) -> Self {
        Self {
            code,
            is_billable,
            short_desc: String::new(),
            long_desc: String::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_descriptions(mut self, short: impl Into<String>, long: impl Into<String>) -> Self {
        self.short_desc = short.into();
        self.long_desc = long.into();
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<HierarchyNode>) -> Self {
        self.children = children;
        self
    }
}

/// Index of a node inside a [`Hierarchy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Entry {
    code: Code,
    billable: bool,
    short_desc: String,
    long_desc: String,
    parent: Option<usize>,
    children: Vec<usize>,
    /// Exclusive end of this node's subtree in pre-order.
    end: usize,
}

/// Indexed classification forest.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    entries: Vec<Entry>,
    index: HashMap<CodeKey, usize>,
    roots: Vec<usize>,
}

impl Hierarchy {
    /// Build from nested trees.
    pub fn from_forest(nodes: Vec<HierarchyNode>) -> Result<Self> {
        let mut builder = HierarchyBuilder::new();
        let mut stack: Vec<(HierarchyNode, Option<Code>)> =
            nodes.into_iter().map(|node| (node, None)).collect();
        while let Some((mut node, parent)) = stack.pop() {
            let children = std::mem::take(&mut node.children);
            let code = node.code.clone();
            builder.add(
                node.code,
                parent,
                node.is_billable,
                node.short_desc,
                node.long_desc,
            );
            stack.extend(children.into_iter().map(|child| (child, Some(code.clone()))));
        }
        builder.build()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, code: &Code) -> bool {
        self.index.contains_key(&code.key())
    }

    pub fn get(&self, code: &Code) -> Option<Node<'_>> {
        self.get_key(&code.key())
    }

    pub fn get_key(&self, key: &CodeKey) -> Option<Node<'_>> {
        self.index.get(key).map(|&id| self.node(NodeId(id)))
    }

    /// Node handle for an id obtained from this hierarchy.
    pub fn node(&self, id: NodeId) -> Node<'_> {
        Node {
            hierarchy: self,
            id: id.0,
        }
    }

    pub fn roots(&self) -> impl Iterator<Item = Node<'_>> + '_ {
        self.roots.iter().map(|&id| self.node(NodeId(id)))
    }

    /// All nodes in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = Node<'_>> + '_ {
        (0..self.entries.len()).map(|id| self.node(NodeId(id)))
    }

    /// Rebuild nested trees, e.g. for serialisation.
    pub fn to_forest(&self) -> Vec<HierarchyNode> {
        self.roots().map(|root| root.to_tree()).collect()
    }
}

/// Borrowed view of one hierarchy node.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    hierarchy: &'a Hierarchy,
    id: usize,
}

impl<'a> Node<'a> {
    fn entry(&self) -> &'a Entry {
        &self.hierarchy.entries[self.id]
    }

    pub fn id(&self) -> NodeId {
        NodeId(self.id)
    }

    /// Code in short form.
    pub fn code(&self) -> &'a Code {
        &self.entry().code
    }

    pub fn is_billable(&self) -> bool {
        self.entry().billable
    }

    pub fn is_leaf(&self) -> bool {
        self.entry().children.is_empty()
    }

    /// Whether the node counts as its own unit of coverage: leaves always
    /// do, inner nodes only when they are billable themselves.
    pub fn is_coverage_point(&self) -> bool {
        self.is_leaf() || self.is_billable()
    }

    pub fn short_desc(&self) -> &'a str {
        &self.entry().short_desc
    }

    pub fn long_desc(&self) -> &'a str {
        &self.entry().long_desc
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        self.entry().parent.map(|id| self.hierarchy.node(NodeId(id)))
    }

    pub fn root(&self) -> Node<'a> {
        let mut node = *self;
        while let Some(parent) = node.parent() {
            node = parent;
        }
        node
    }

    pub fn children(&self) -> impl Iterator<Item = Node<'a>> + use<'a> {
        let hierarchy = self.hierarchy;
        self.entry()
            .children
            .iter()
            .map(move |&id| hierarchy.node(NodeId(id)))
    }

    /// This node followed by all of its descendants, in pre-order.
    pub fn subtree(&self) -> impl Iterator<Item = Node<'a>> + use<'a> {
        let hierarchy = self.hierarchy;
        (self.id..self.entry().end).map(move |id| hierarchy.node(NodeId(id)))
    }

    /// Pre-order index range of the subtree rooted here.
    pub fn subtree_range(&self) -> std::ops::Range<usize> {
        self.id..self.entry().end
    }

    pub fn is_ancestor_of(&self, other: &Node<'_>) -> bool {
        self.id < other.id && other.id < self.entry().end
    }

    fn to_tree(self) -> HierarchyNode {
        let entry = self.entry();
        HierarchyNode {
            code: entry.code.clone(),
            is_billable: entry.billable,
            short_desc: entry.short_desc.clone(),
            long_desc: entry.long_desc.clone(),
            children: self.children().map(Node::to_tree).collect(),
        }
    }
}

#[derive(Debug, Clone)]
struct FlatRow {
    code: Code,
    parent: Option<CodeKey>,
    billable: bool,
    short_desc: String,
    long_desc: String,
}

/// Assembles a [`Hierarchy`] from parent-linked rows in any order.
#[derive(Debug, Clone, Default)]
pub struct HierarchyBuilder {
    rows: Vec<FlatRow>,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        code: Code,
        parent: Option<Code>,
        billable: bool,
        short_desc: impl Into<String>,
        long_desc: impl Into<String>,
    ) -> &mut Self {
        self.rows.push(FlatRow {
            code: code.padded().with_form(CodeForm::Short),
            parent: parent.map(|parent| parent.key()),
            billable,
            short_desc: short_desc.into(),
            long_desc: long_desc.into(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn build(self) -> Result<Hierarchy> {
        let mut by_key: HashMap<CodeKey, usize> = HashMap::with_capacity(self.rows.len());
        for (row_idx, row) in self.rows.iter().enumerate() {
            if by_key.insert(row.code.key(), row_idx).is_some() {
                return Err(IcdError::DuplicateCode {
                    code: row.code.to_string(),
                });
            }
        }

        let mut child_rows: Vec<Vec<usize>> = vec![Vec::new(); self.rows.len()];
        let mut root_rows = Vec::new();
        for (row_idx, row) in self.rows.iter().enumerate() {
            match &row.parent {
                Some(parent) => {
                    let parent_idx =
                        *by_key
                            .get(parent)
                            .ok_or_else(|| IcdError::UnknownParent {
                                code: row.code.to_string(),
                                parent: parent.short.clone(),
                            })?;
                    child_rows[parent_idx].push(row_idx);
                }
                None => root_rows.push(row_idx),
            }
        }

        let sort_rows = |rows: &mut Vec<usize>, all: &[FlatRow]| {
            rows.sort_by(|&left, &right| all[left].code.sort_key().cmp(&all[right].code.sort_key()));
        };
        sort_rows(&mut root_rows, &self.rows);
        for children in &mut child_rows {
            sort_rows(children, &self.rows);
        }

        // Pre-order layout; `order[row]` is the final entry id of a row.
        let mut order: Vec<Option<usize>> = vec![None; self.rows.len()];
        let mut preorder = Vec::with_capacity(self.rows.len());
        let mut stack: Vec<usize> = root_rows.iter().rev().copied().collect();
        while let Some(row_idx) = stack.pop() {
            order[row_idx] = Some(preorder.len());
            preorder.push(row_idx);
            stack.extend(child_rows[row_idx].iter().rev().copied());
        }
        if let Some(stray) = order.iter().position(Option::is_none) {
            // Only rows on a parent cycle are unreachable from the roots.
            return Err(IcdError::HierarchyCycle {
                code: self.rows[stray].code.to_string(),
            });
        }

        let entry_id = |row_idx: usize| order[row_idx].unwrap_or_default();
        let mut rows: Vec<Option<FlatRow>> = self.rows.into_iter().map(Some).collect();
        let mut entries: Vec<Entry> = Vec::with_capacity(preorder.len());
        for &row_idx in &preorder {
            let Some(row) = rows[row_idx].take() else {
                continue;
            };
            entries.push(Entry {
                code: row.code,
                billable: row.billable,
                short_desc: row.short_desc,
                long_desc: row.long_desc,
                parent: row
                    .parent
                    .as_ref()
                    .and_then(|key| by_key.get(key))
                    .map(|&parent_row| entry_id(parent_row)),
                children: child_rows[row_idx].iter().map(|&child| entry_id(child)).collect(),
                end: 0,
            });
        }

        // Subtree ends, children before parents.
        for id in (0..entries.len()).rev() {
            let end = entries[id]
                .children
                .last()
                .map_or(id + 1, |&last_child| entries[last_child].end);
            entries[id].end = end;
        }

        let index = entries
            .iter()
            .enumerate()
            .map(|(id, entry)| (entry.code.key(), id))
            .collect();
        let roots = root_rows.iter().map(|&row_idx| entry_id(row_idx)).collect();

        Ok(Hierarchy {
            entries,
            index,
            roots,
        })
    }
}
