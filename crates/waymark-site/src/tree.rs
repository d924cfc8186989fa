//! Arena-backed navigation tree.
//!
//! The tree is stored as a flat node table with parallel child, parent, and
//! root index tables. Nodes are addressed by index internally and by key at
//! the API surface. Keys are unique across the whole tree, so key lookup and
//! ancestor walks resolve through a single index map.
//!
//! Trees are immutable once constructed. Both constructors validate the
//! structural invariants: [`NavTree::build`] for authored sidebar input and
//! [`NavTree::from_parts`] for flat input loaded from a manifest, which can
//! additionally encode index errors, sharing, and cycles.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sidebar::{SidebarEntry, SidebarSpec};

/// Errors raised while constructing a navigation tree.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// An entry produced an empty navigation key.
    #[error("Navigation entry has an empty key (label: {label:?})")]
    EmptyKey { label: String },

    /// Two nodes resolved to the same navigation key.
    #[error("Duplicate navigation key: {0}")]
    DuplicateKey(String),

    /// A child or root index points past the end of the node table.
    #[error("Navigation index {index} out of range for {len} nodes")]
    IndexOutOfRange { index: usize, len: usize },

    /// The children table does not line up with the node table.
    #[error("Navigation children table has {children} rows for {nodes} nodes")]
    LengthMismatch { nodes: usize, children: usize },

    /// A node is listed as a root or as a child more than once.
    #[error("Navigation node {0} is referenced more than once")]
    SharedNode(usize),

    /// A node cannot be reached from any root.
    #[error("Navigation node {0} is not reachable from any root")]
    Unreachable(usize),

    /// A parent chain loops back on itself.
    #[error("Cycle detected in navigation structure at node {0}")]
    Cycle(usize),
}

/// Whether a navigation node resolves to a document or only groups others.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavKind {
    /// Leaf node backed by a document; resolvable through the route table.
    Doc,
    /// Grouping node; participates in ancestor chains but has no route.
    Category,
}

/// A single navigation node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavNode {
    /// Unique key within the tree. Document nodes use their slug.
    pub key: String,
    /// Human-readable label shown in the sidebar.
    pub label: String,
    pub kind: NavKind,
}

/// An immutable navigation tree.
#[derive(Clone, Debug)]
pub struct NavTree {
    nodes: Vec<NavNode>,
    children: Vec<Vec<usize>>,
    parents: Vec<Option<usize>>,
    roots: Vec<usize>,
    key_index: HashMap<String, usize>,
}

impl NavTree {
    /// Build a tree from a parsed sidebar specification.
    ///
    /// Entries keep their authored order. Category keys are derived from
    /// labels unless an explicit key is given.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyKey`] when an entry resolves to an
    /// empty key and [`ValidationError::DuplicateKey`] when two entries
    /// resolve to the same key.
    pub fn build(spec: &SidebarSpec) -> Result<Self, ValidationError> {
        let mut tree = Self {
            nodes: Vec::new(),
            children: Vec::new(),
            parents: Vec::new(),
            roots: Vec::new(),
            key_index: HashMap::new(),
        };
        for entry in &spec.entries {
            let idx = tree.insert_entry(entry, None)?;
            tree.roots.push(idx);
        }
        Ok(tree)
    }

    /// Reassemble a tree from its flat tables, validating every structural
    /// invariant along the way.
    ///
    /// This is the re-validation door for manifests and other external flat
    /// representations: key uniqueness, index ranges, single-parent linkage,
    /// reachability, and acyclicity are all checked before the tree is
    /// accepted.
    pub fn from_parts(
        nodes: Vec<NavNode>,
        children: Vec<Vec<usize>>,
        roots: Vec<usize>,
    ) -> Result<Self, ValidationError> {
        let len = nodes.len();
        if children.len() != len {
            return Err(ValidationError::LengthMismatch {
                nodes: len,
                children: children.len(),
            });
        }

        let mut key_index = HashMap::with_capacity(len);
        for (idx, node) in nodes.iter().enumerate() {
            if node.key.trim().is_empty() {
                return Err(ValidationError::EmptyKey {
                    label: node.label.clone(),
                });
            }
            if key_index.insert(node.key.clone(), idx).is_some() {
                return Err(ValidationError::DuplicateKey(node.key.clone()));
            }
        }

        // Each node may appear at most once as a child.
        let mut parents: Vec<Option<usize>> = vec![None; len];
        for (parent, child_list) in children.iter().enumerate() {
            for &child in child_list {
                if child >= len {
                    return Err(ValidationError::IndexOutOfRange { index: child, len });
                }
                if parents[child].is_some() {
                    return Err(ValidationError::SharedNode(child));
                }
                parents[child] = Some(parent);
            }
        }

        let mut is_root = vec![false; len];
        for &root in &roots {
            if root >= len {
                return Err(ValidationError::IndexOutOfRange { index: root, len });
            }
            if parents[root].is_some() || is_root[root] {
                return Err(ValidationError::SharedNode(root));
            }
            is_root[root] = true;
        }

        // Everything must be reachable from the roots. Nodes the traversal
        // misses are either orphaned or sit on a parent chain that loops.
        let mut visited = vec![false; len];
        let mut stack = roots.clone();
        while let Some(idx) = stack.pop() {
            visited[idx] = true;
            stack.extend(children[idx].iter().copied());
        }
        if let Some(start) = (0..len).find(|&i| !visited[i]) {
            let mut current = start;
            for _ in 0..len {
                match parents[current] {
                    Some(parent) => current = parent,
                    None => return Err(ValidationError::Unreachable(start)),
                }
                if current == start {
                    return Err(ValidationError::Cycle(start));
                }
            }
            return Err(ValidationError::Cycle(start));
        }

        Ok(Self {
            nodes,
            children,
            parents,
            roots,
            key_index,
        })
    }

    fn insert_entry(
        &mut self,
        entry: &SidebarEntry,
        parent: Option<usize>,
    ) -> Result<usize, ValidationError> {
        let key = entry.navigation_key();
        let label = entry.display_label();
        if key.is_empty() {
            return Err(ValidationError::EmptyKey { label });
        }
        let kind = match entry {
            SidebarEntry::Doc(_) | SidebarEntry::DocRef { .. } => NavKind::Doc,
            SidebarEntry::Category { .. } => NavKind::Category,
        };

        let idx = self.nodes.len();
        match self.key_index.entry(key.clone()) {
            Entry::Occupied(_) => return Err(ValidationError::DuplicateKey(key)),
            Entry::Vacant(slot) => {
                slot.insert(idx);
            }
        }
        self.nodes.push(NavNode { key, label, kind });
        self.children.push(Vec::new());
        self.parents.push(parent);
        if let Some(parent) = parent {
            self.children[parent].push(idx);
        }

        if let SidebarEntry::Category { items, .. } = entry {
            for item in items {
                self.insert_entry(item, Some(idx))?;
            }
        }
        Ok(idx)
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&NavNode> {
        self.key_index.get(key).map(|&idx| &self.nodes[idx])
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.key_index.contains_key(key)
    }

    /// Top-level nodes in authored order.
    #[must_use]
    pub fn root_nodes(&self) -> Vec<&NavNode> {
        self.roots.iter().map(|&idx| &self.nodes[idx]).collect()
    }

    /// Direct children of the node with `key`, in authored order.
    ///
    /// Returns an empty list for leaf nodes and unknown keys.
    #[must_use]
    pub fn children_of(&self, key: &str) -> Vec<&NavNode> {
        match self.key_index.get(key) {
            Some(&idx) => self.children[idx].iter().map(|&c| &self.nodes[c]).collect(),
            None => Vec::new(),
        }
    }

    /// Lazy pre-order traversal over the whole tree.
    ///
    /// Parents are yielded before their children, siblings in authored
    /// order. Each call starts a fresh traversal.
    #[must_use]
    pub fn flatten(&self) -> Flatten<'_> {
        let mut stack = Vec::with_capacity(self.roots.len());
        stack.extend(self.roots.iter().rev().copied());
        Flatten { tree: self, stack }
    }

    /// Chain of nodes from a root to the node with `key`, inclusive.
    ///
    /// Returns `None` when the key is not present in the tree.
    #[must_use]
    pub fn find_path(&self, key: &str) -> Option<Vec<&NavNode>> {
        let mut idx = *self.key_index.get(key)?;
        let mut path = vec![&self.nodes[idx]];
        while let Some(parent) = self.parents[idx] {
            path.push(&self.nodes[parent]);
            idx = parent;
        }
        path.reverse();
        Some(path)
    }

    // Flat table accessors (for serialization).

    pub(crate) fn nodes(&self) -> &[NavNode] {
        &self.nodes
    }

    pub(crate) fn children_indices(&self) -> &[Vec<usize>] {
        &self.children
    }

    pub(crate) fn root_indices(&self) -> &[usize] {
        &self.roots
    }
}

/// Lazy depth-first pre-order traversal over a [`NavTree`].
///
/// Created by [`NavTree::flatten`].
#[derive(Debug)]
pub struct Flatten<'a> {
    tree: &'a NavTree,
    stack: Vec<usize>,
}

impl<'a> Iterator for Flatten<'a> {
    type Item = &'a NavNode;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.stack.pop()?;
        self.stack.extend(self.tree.children[idx].iter().rev().copied());
        Some(&self.tree.nodes[idx])
    }
}
