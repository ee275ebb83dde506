//! # Keyword Index
//!
//! A compressed prefix tree (radix tree) for multi-valued keyword entries,
//! intended as the indexing core of a keyword-to-data lookup service such as
//! an autocomplete or tagging index.
//!
//! Keys are normalized before every operation: optionally substituted
//! through an alias table, lower-cased, and separator-replaced, so the same
//! logical keyword always maps to the same tree path. Inserting never
//! fails; removing is best-effort and reports mismatches as [`RemoveError`]
//! values without touching the tree. The whole tree can be exported as a
//! nested mapping document for external publishing.
//!
//! ## Example
//!
//! ```rust
//! use keyword_index::RadixTree;
//!
//! let mut tree = RadixTree::new();
//!
//! tree.insert("card", 1);
//! tree.insert("care", 2);
//!
//! // "card" and "care" now share a "car" fork node.
//! assert_eq!(tree.keyword_count(), 2);
//! assert_eq!(tree.data_count(), 2);
//!
//! tree.remove("card", None).unwrap();
//! assert_eq!(tree.data_count(), 1);
//! ```

mod error;
mod key;
mod node;
mod traverse;
mod tree;

// Re-export public types
pub use crate::error::RemoveError;
pub use crate::key::KeyCodec;
pub use crate::tree::RadixTree;
