//! Internal node implementation for the radix tree.
//!
//! This module contains the `TreeNode` structure that forms the backbone of
//! the tree. Each node owns its children exclusively; the concatenation of
//! edge labels along a root-to-node path forms the node's full key.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Map, Value};

/// Reserved key under which a node's data list appears in the export
/// document. Normalized edge labels never contain it, so it cannot collide
/// with a child entry.
pub(crate) const DATA_KEY: &str = "$";

/// A node in the radix tree.
///
/// Each node holds a map from edge label to child node, and optionally an
/// ordered list of values attached at the exact key path reaching it. The
/// data list is never empty while present; it is removed the instant the
/// last value is taken out.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TreeNode<V> {
    /// Child nodes keyed by their edge label. Among the children of any
    /// node, no two labels share a first character (the radix property),
    /// so at most one child can match a key remainder.
    pub children: BTreeMap<String, TreeNode<V>>,

    /// Values inserted under the exact key path reaching this node, if any
    pub data: Option<Vec<V>>,
}

impl<V> TreeNode<V> {
    /// Creates an empty node with no children and no data.
    pub fn new() -> Self {
        TreeNode {
            children: BTreeMap::new(),
            data: None,
        }
    }

    /// Creates a leaf node holding a single value.
    pub fn with_value(value: V) -> Self {
        TreeNode {
            children: BTreeMap::new(),
            data: Some(vec![value]),
        }
    }

    /// Returns whether this node carries neither children nor data.
    ///
    /// Empty nodes are removed by ancestor pruning; only the root may stay
    /// empty.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.data.is_none()
    }

    /// Follows a previously recorded sequence of edge labels downward,
    /// returning the node at the end of the path.
    pub fn descend_mut(&mut self, path: &[String]) -> &mut TreeNode<V> {
        let mut node = self;
        for label in path {
            node = node
                .children
                .get_mut(label)
                .expect("traversal path refers to live nodes");
        }
        node
    }

    /// Serializes this subtree as a nested mapping: one entry per child edge
    /// label, plus the reserved `"$"` entry holding the data list when
    /// present.
    pub fn to_document(&self) -> Value
    where
        V: Serialize,
    {
        let mut doc = Map::new();
        if let Some(values) = &self.data {
            doc.insert(DATA_KEY.to_string(), json!(values));
        }
        for (label, child) in &self.children {
            doc.insert(label.clone(), child.to_document());
        }
        Value::Object(doc)
    }
}

impl<V> Default for TreeNode<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl<V> TreeNode<V> {
    /// Recounts (nodes holding data, total values) across the whole subtree.
    /// The incrementally maintained tree counters must always agree with
    /// this scan.
    pub fn scan_counts(&self) -> (usize, usize) {
        let mut keywords = 0;
        let mut values = 0;
        if let Some(data) = &self.data {
            keywords += 1;
            values += data.len();
        }
        for child in self.children.values() {
            let (k, v) = child.scan_counts();
            keywords += k;
            values += v;
        }
        (keywords, values)
    }

    /// Checks the radix property for every node in the subtree: no two
    /// sibling edge labels share a first character, and no label is empty.
    pub fn labels_are_well_formed(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        for (label, child) in &self.children {
            let first = match label.chars().next() {
                Some(c) => c,
                None => return false,
            };
            if !seen.insert(first) {
                return false;
            }
            if !child.labels_are_well_formed() {
                return false;
            }
        }
        true
    }
}
