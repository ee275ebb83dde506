//! Prefix traversal and outcome classification.
//!
//! A single top-down pass descends from the root, greedily following the one
//! child whose edge label shares a non-empty prefix with the unmatched key
//! remainder (unique by the radix property). The pass records everything the
//! mutation handlers need afterwards: the fully matched path, the last edge
//! label examined, and how much of it (and of the whole key) matched.

use crate::node::TreeNode;

/// How a key relates to the tree after traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// No shared prefix with anything at the root level
    NonExistent,
    /// The matched node is a strict prefix of the key; the key continues
    /// beyond it
    Suffix,
    /// The key matches a node boundary exactly
    Exact,
    /// The key diverges partway through an edge label
    Exists,
}

/// Everything recorded during one traversal pass.
#[derive(Debug, Default)]
pub(crate) struct TraversalState {
    /// Edge labels fully matched from the root down to the current node,
    /// in descent order. Pruning consumes this read-only, deepest first.
    pub path: Vec<String>,

    /// Label of the last edge examined, whether or not it matched fully
    pub node_key: String,

    /// Matched length of `node_key`, in bytes (always a char boundary)
    pub chars_match: usize,

    /// Cumulative matched length since the root
    pub ttl_chars_match: usize,
}

impl TraversalState {
    /// Classifies the traversal against a key of `key_len` bytes.
    ///
    /// The four outcomes are exhaustive for any state a well-formed tree can
    /// produce; matching past the end of the key would mean the radix
    /// property no longer holds, which is a programming error rather than a
    /// reportable condition.
    pub fn classify(&self, key_len: usize) -> Outcome {
        assert!(
            self.ttl_chars_match <= key_len,
            "traversal matched {} bytes of a {}-byte key",
            self.ttl_chars_match,
            key_len
        );
        if self.ttl_chars_match == 0 {
            Outcome::NonExistent
        } else if self.ttl_chars_match < key_len && self.chars_match == self.node_key.len() {
            Outcome::Suffix
        } else if self.ttl_chars_match == key_len && self.chars_match == self.node_key.len() {
            Outcome::Exact
        } else {
            Outcome::Exists
        }
    }
}

/// Descends from `root` following `key`, returning the recorded state.
///
/// Descent continues only while the key remainder is non-empty, the current
/// node has children, and the previous step consumed an entire edge label.
/// Every step consumes at least one character, so the walk always
/// terminates.
pub(crate) fn traverse<V>(root: &TreeNode<V>, key: &str) -> TraversalState {
    let mut state = TraversalState::default();
    let mut node = root;
    let mut remaining = key;

    loop {
        // At most one child can share a first character with the remainder.
        let mut step = None;
        for (label, child) in &node.children {
            let matched = common_prefix(remaining, label);
            if matched > 0 {
                step = Some((label, child, matched));
                break;
            }
        }

        let (label, child, matched) = match step {
            Some(found) => found,
            None => break,
        };

        state.ttl_chars_match += matched;
        state.chars_match = matched;
        state.node_key = label.clone();

        if matched < label.len() {
            // The match stopped partway through the edge label.
            break;
        }

        state.path.push(label.clone());
        remaining = &remaining[matched..];
        node = child;

        if remaining.is_empty() || node.children.is_empty() {
            break;
        }
    }

    state
}

/// Byte length of the shared prefix of `a` and `b`, always on a char
/// boundary.
pub(crate) fn common_prefix(a: &str, b: &str) -> usize {
    let mut len = 0;
    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca != cb {
            break;
        }
        len += ca.len_utf8();
    }
    len
}
