//! Removal error taxonomy.

use thiserror::Error;

/// Why a removal could not be applied.
///
/// All variants are non-fatal and leave the tree and its counters exactly as
/// they were. `matched` carries the number of key bytes that did line up
/// with the tree, which is usually enough to explain the mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoveError {
    /// The key shares no prefix with any entry.
    #[error("key {key:?} not found")]
    KeyNotFound { key: String },

    /// The key is a strict prefix of longer entries and holds no data of
    /// its own, so there is nothing to remove at it.
    #[error("key {key:?} is only a prefix of longer entries ({matched} bytes matched)")]
    KeyIsPrefixOnly { key: String, matched: usize },

    /// The key diverges partway through an existing edge label, which
    /// usually means a typo.
    #[error("key {key:?} only partially matches an entry ({matched} bytes matched)")]
    KeyPartialMatch { key: String, matched: usize },

    /// The key matched a node exactly, but the supplied value is not in its
    /// data list.
    #[error("value not present under key {key:?}")]
    ValueNotFound { key: String },
}
