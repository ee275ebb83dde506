//! The main radix tree implementation.
//!
//! This module contains the `RadixTree` type, which provides the primary API
//! for inserting and removing multi-valued keyword entries and for exporting
//! the tree as a nested document.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use tracing::{trace, warn};

use crate::error::RemoveError;
use crate::key::KeyCodec;
use crate::node::TreeNode;
use crate::traverse::{traverse, Outcome, TraversalState};

/// A mutable radix tree mapping normalized keywords to lists of values.
///
/// Keys are normalized (aliased, case-folded, space-to-underscore) before
/// every operation, so the same logical keyword always reaches the same
/// node. Values attached under the same key accumulate in insertion order.
///
/// Mutation goes through `&mut self`, which rules out interleaved access at
/// compile time; callers wanting shared access wrap the tree in their own
/// lock.
///
/// # Examples
///
/// ```
/// use keyword_index::RadixTree;
///
/// let mut tree = RadixTree::new();
/// tree.insert("Card Game", 7);
/// tree.insert("card_game", 8);
///
/// // Both values ended up under the same normalized key.
/// assert_eq!(tree.keyword_count(), 1);
/// assert_eq!(tree.data_count(), 2);
/// ```
#[derive(Debug)]
pub struct RadixTree<V> {
    /// The root node; it has no incoming edge and is never pruned
    root: TreeNode<V>,

    /// Number of nodes currently holding a non-empty data list
    keyword_count: usize,

    /// Total number of values across all nodes
    data_count: usize,

    /// Key normalization, fixed at construction time
    codec: KeyCodec,
}

impl<V: PartialEq> RadixTree<V> {
    /// Creates a new, empty tree with no alias table.
    pub fn new() -> Self {
        Self::with_codec(KeyCodec::new())
    }

    /// Creates an empty tree whose keys are substituted through `aliases`
    /// before normalization.
    pub fn with_aliases(aliases: HashMap<String, String>) -> Self {
        Self::with_codec(KeyCodec::with_aliases(aliases))
    }

    fn with_codec(codec: KeyCodec) -> Self {
        RadixTree {
            root: TreeNode::new(),
            keyword_count: 0,
            data_count: 0,
            codec,
        }
    }

    /// Number of distinct complete keys currently holding data.
    pub fn keyword_count(&self) -> usize {
        self.keyword_count
    }

    /// Total number of individual values across all keys.
    pub fn data_count(&self) -> usize {
        self.data_count
    }

    /// Returns `true` if the tree holds no values.
    pub fn is_empty(&self) -> bool {
        self.data_count == 0
    }

    /// Inserts a value under a key. Never fails: the key either reaches an
    /// existing node, extends the tree with a new edge, or splits an edge
    /// at the point of divergence.
    pub fn insert(&mut self, key: &str, value: V) {
        let key = self.codec.normalize(key);
        if key.is_empty() {
            // The root is the exact node for the empty key.
            self.insert_data(&TraversalState::default(), value);
            return;
        }

        let state = traverse(&self.root, &key);
        let outcome = state.classify(key.len());
        trace!(key = %key, outcome = ?outcome, "insert");

        match outcome {
            Outcome::NonExistent | Outcome::Suffix => self.create_node(&key, &state, value),
            Outcome::Exact => self.insert_data(&state, value),
            Outcome::Exists => self.split_node(&key, &state, value),
        }
    }

    /// Removes a value (or, with `None`, a key's entire data list).
    ///
    /// Best-effort: an unknown key, a key that is only a prefix of longer
    /// entries, a partial (typo-like) match, or a value that is not present
    /// comes back as a [`RemoveError`] with the tree and counters untouched.
    pub fn remove(&mut self, key: &str, value: Option<&V>) -> Result<(), RemoveError> {
        let key = self.codec.normalize(key);
        if key.is_empty() {
            return self.remove_data(&key, &TraversalState::default(), value);
        }

        let state = traverse(&self.root, &key);
        let outcome = state.classify(key.len());
        trace!(key = %key, outcome = ?outcome, "remove");

        let err = match outcome {
            Outcome::Exact => return self.remove_data(&key, &state, value),
            Outcome::NonExistent => RemoveError::KeyNotFound { key },
            Outcome::Suffix => RemoveError::KeyIsPrefixOnly {
                key,
                matched: state.ttl_chars_match,
            },
            Outcome::Exists => RemoveError::KeyPartialMatch {
                key,
                matched: state.ttl_chars_match,
            },
        };
        warn!("remove failed: {}", err);
        Err(err)
    }

    /// Adds a new child for the unmatched key suffix under the node the
    /// traversal stopped at.
    fn create_node(&mut self, key: &str, state: &TraversalState, value: V) {
        let suffix = key[state.ttl_chars_match..].to_string();
        let node = self.root.descend_mut(&state.path);
        node.children.insert(suffix, TreeNode::with_value(value));
        self.keyword_count += 1;
        self.data_count += 1;
    }

    /// Appends a value to the data list of an exactly matched node.
    fn insert_data(&mut self, state: &TraversalState, value: V) {
        let node = self.root.descend_mut(&state.path);
        if let Some(values) = node.data.as_mut() {
            values.push(value);
        } else {
            node.data = Some(vec![value]);
            self.keyword_count += 1;
        }
        self.data_count += 1;
    }

    /// Forks an existing edge at the divergence offset.
    ///
    /// The old edge is replaced by an intermediate node keyed by the shared
    /// prefix; the old child is re-parented under it with the label
    /// remainder, and the new value lands either on the intermediate node
    /// itself (key fully consumed) or on a second child keyed by the key's
    /// remaining suffix. Callers only ever observe the finished fork.
    fn split_node(&mut self, key: &str, state: &TraversalState, value: V) {
        let shared = state.node_key[..state.chars_match].to_string();
        let label_rest = state.node_key[state.chars_match..].to_string();
        let key_rest = &key[state.ttl_chars_match..];

        let node = self.root.descend_mut(&state.path);
        let old_child = node
            .children
            .remove(&state.node_key)
            .expect("diverging edge exists on the matched node");

        let mut fork = TreeNode::new();
        fork.children.insert(label_rest, old_child);
        if key_rest.is_empty() {
            fork.data = Some(vec![value]);
        } else {
            fork.children
                .insert(key_rest.to_string(), TreeNode::with_value(value));
        }
        node.children.insert(shared, fork);

        self.keyword_count += 1;
        self.data_count += 1;
    }

    /// Removes a single value (or the whole data list) from an exactly
    /// matched node, then prunes emptied ancestors.
    fn remove_data(
        &mut self,
        key: &str,
        state: &TraversalState,
        value: Option<&V>,
    ) -> Result<(), RemoveError> {
        let node = self.root.descend_mut(&state.path);
        let values = match node.data.as_mut() {
            Some(values) => values,
            None => {
                // A dataless node usually stands in as a prefix of longer
                // keys; without children either (only the root can be in
                // that state) the key is simply absent.
                let err = if node.children.is_empty() {
                    RemoveError::KeyNotFound {
                        key: key.to_string(),
                    }
                } else {
                    RemoveError::KeyIsPrefixOnly {
                        key: key.to_string(),
                        matched: state.ttl_chars_match,
                    }
                };
                warn!("remove failed: {}", err);
                return Err(err);
            }
        };

        match value {
            None => {
                let removed = values.len();
                node.data = None;
                self.data_count -= removed;
                self.keyword_count -= 1;
            }
            Some(target) => {
                // Structural equality, not identity: values may be plain
                // records rather than unique handles.
                match values.iter().position(|v| v == target) {
                    Some(index) => {
                        values.remove(index);
                        self.data_count -= 1;
                        if values.is_empty() {
                            node.data = None;
                            self.keyword_count -= 1;
                        }
                    }
                    None => {
                        let err = RemoveError::ValueNotFound {
                            key: key.to_string(),
                        };
                        warn!("remove failed: {}", err);
                        return Err(err);
                    }
                }
            }
        }

        if node.is_empty() {
            self.prune(&state.path);
        }
        Ok(())
    }

    /// Walks the recorded ancestor path deepest-first, dropping any child
    /// left with no children and no data. Idempotent; the root itself is
    /// never removed.
    fn prune(&mut self, path: &[String]) {
        for depth in (0..path.len()).rev() {
            let ancestor = self.root.descend_mut(&path[..depth]);
            ancestor.children.retain(|_, child| !child.is_empty());
        }
    }
}

impl<V: PartialEq + Serialize> RadixTree<V> {
    /// Produces a deep, read-only snapshot of the tree as a nested mapping.
    ///
    /// Each node serializes as a map from edge label to sub-node, with the
    /// reserved `"$"` key holding the node's data list when present.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyword_index::RadixTree;
    /// use serde_json::json;
    ///
    /// let mut tree = RadixTree::new();
    /// tree.insert("cart", 1);
    /// tree.insert("cast", 2);
    ///
    /// assert_eq!(
    ///     tree.export(),
    ///     json!({ "ca": { "rt": { "$": [1] }, "st": { "$": [2] } } })
    /// );
    /// ```
    pub fn export(&self) -> Value {
        self.root.to_document()
    }
}

impl<V: PartialEq> Default for RadixTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn counts<V: PartialEq>(tree: &RadixTree<V>) -> (usize, usize) {
        (tree.keyword_count, tree.data_count)
    }

    #[test]
    fn test_new_tree() {
        let tree: RadixTree<u32> = RadixTree::new();
        assert!(tree.is_empty());
        assert_eq!(counts(&tree), (0, 0));
        assert_eq!(tree.export(), json!({}));
    }

    #[test]
    fn test_insert_fresh_key() {
        let mut tree = RadixTree::new();
        tree.insert("dog", 1);
        assert_eq!(counts(&tree), (1, 1));
        assert_eq!(tree.export(), json!({ "dog": { "$": [1] } }));
    }

    #[test]
    fn test_insert_suffix_extends_existing_node() {
        let mut tree = RadixTree::new();
        tree.insert("car", 1);
        tree.insert("card", 2);
        assert_eq!(
            tree.export(),
            json!({ "car": { "$": [1], "d": { "$": [2] } } })
        );
        assert_eq!(counts(&tree), (2, 2));
    }

    #[test]
    fn test_split_with_key_fully_consumed() {
        // "alpha" ends partway through the "alphabet" edge, so the fork
        // node itself takes the value.
        let mut tree = RadixTree::new();
        tree.insert("alphabet", 1);
        tree.insert("alpha", 2);
        assert_eq!(
            tree.export(),
            json!({ "alpha": { "$": [2], "bet": { "$": [1] } } })
        );
        assert_eq!(counts(&tree), (2, 2));
    }

    #[test]
    fn test_exact_insert_on_dataless_fork_node() {
        let mut tree = RadixTree::new();
        tree.insert("card", 1);
        tree.insert("care", 2);
        // "car" now exists as a fork without data; an exact insert there
        // must start a list and count a new keyword.
        tree.insert("car", 3);
        assert_eq!(counts(&tree), (3, 3));
        assert_eq!(
            tree.export(),
            json!({ "car": { "$": [3], "d": { "$": [1] }, "e": { "$": [2] } } })
        );
    }

    #[test]
    fn test_empty_key_attaches_to_root() {
        let mut tree = RadixTree::new();
        tree.insert("", 1);
        tree.insert("", 2);
        assert_eq!(counts(&tree), (1, 2));
        assert_eq!(tree.export(), json!({ "$": [1, 2] }));

        tree.remove("", None).unwrap();
        assert_eq!(counts(&tree), (0, 0));
        assert_eq!(tree.export(), json!({}));
    }

    #[test]
    fn test_remove_empty_key_from_empty_tree_reports_not_found() {
        // The root matches the empty key exactly, but with no data and no
        // children there are no longer entries it could be a prefix of.
        let mut tree: RadixTree<u32> = RadixTree::new();
        assert_eq!(
            tree.remove("", None),
            Err(RemoveError::KeyNotFound {
                key: String::new()
            })
        );
        assert_eq!(counts(&tree), (0, 0));
    }

    #[test]
    fn test_remove_empty_key_from_populated_tree_reports_prefix_only() {
        let mut tree = RadixTree::new();
        tree.insert("card", 1);
        assert_eq!(
            tree.remove("", None),
            Err(RemoveError::KeyIsPrefixOnly {
                key: String::new(),
                matched: 0,
            })
        );
        assert_eq!(counts(&tree), (1, 1));
    }

    #[test]
    fn test_remove_dataless_node_reports_prefix_only() {
        let mut tree = RadixTree::new();
        tree.insert("card", 1);
        tree.insert("care", 2);
        // "car" is a real node, but only as a fork.
        assert_eq!(
            tree.remove("car", None),
            Err(RemoveError::KeyIsPrefixOnly {
                key: "car".to_string(),
                matched: 3,
            })
        );
        assert_eq!(counts(&tree), (2, 2));
    }

    #[test]
    fn test_remove_prunes_cascading_forks() {
        let mut tree = RadixTree::new();
        tree.insert("cart", 1);
        tree.insert("cast", 2);
        // Removing one arm of the fork leaves "ca" with a single child;
        // the fork node keeps standing since it still has that child.
        tree.remove("cart", None).unwrap();
        assert_eq!(tree.export(), json!({ "ca": { "st": { "$": [2] } } }));

        tree.remove("cast", None).unwrap();
        assert_eq!(tree.export(), json!({}));
        assert_eq!(counts(&tree), (0, 0));
    }

    #[test]
    fn test_pruning_is_idempotent() {
        let mut tree = RadixTree::new();
        tree.insert("card", 1);
        tree.insert("care", 2);
        tree.remove("card", None).unwrap();

        let before = tree.root.clone();
        let path = vec!["car".to_string(), "e".to_string()];
        tree.prune(&path);
        tree.prune(&path);
        assert_eq!(tree.root, before);
    }

    #[test]
    fn test_failed_removals_leave_counters_alone() {
        let mut tree = RadixTree::new();
        tree.insert("card", 1);
        let before = counts(&tree);

        assert!(tree.remove("zzz", None).is_err());
        assert!(tree.remove("car", None).is_err());
        assert!(tree.remove("cardigan", None).is_err());
        assert!(tree.remove("cord", None).is_err());
        assert!(tree.remove("card", Some(&99)).is_err());

        assert_eq!(counts(&tree), before);
        assert_eq!(tree.root.scan_counts(), before);
    }

    #[test]
    fn test_alias_table_routes_to_substitute_key() {
        let mut aliases = HashMap::new();
        aliases.insert("JS".to_string(), "Java Script".to_string());
        let mut tree = RadixTree::with_aliases(aliases);

        tree.insert("JS", 1);
        tree.insert("java_script", 2);
        assert_eq!(counts(&tree), (1, 2));
        assert_eq!(tree.export(), json!({ "java_script": { "$": [1, 2] } }));

        tree.remove("JS", Some(&1)).unwrap();
        assert_eq!(tree.export(), json!({ "java_script": { "$": [2] } }));
    }

    quickcheck::quickcheck! {
        fn prop_counters_match_full_scan(ops: Vec<(String, u8, bool)>) -> bool {
            let mut tree = RadixTree::new();
            for (key, value, is_insert) in ops {
                if is_insert {
                    tree.insert(&key, value);
                } else {
                    let _ = tree.remove(&key, Some(&value));
                }
            }
            (tree.keyword_count, tree.data_count) == tree.root.scan_counts()
        }

        fn prop_radix_property_survives_mutation(ops: Vec<(String, bool)>) -> bool {
            let mut tree = RadixTree::new();
            for (key, is_insert) in ops {
                if is_insert {
                    tree.insert(&key, 0u8);
                } else {
                    let _ = tree.remove(&key, None);
                }
            }
            tree.root.labels_are_well_formed()
        }
    }
}
