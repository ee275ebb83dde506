//! Key normalization for tree operations.
//!
//! Every key passes through the same codec before touching the tree, so the
//! same logical keyword always resolves to the same path regardless of how a
//! caller spelled it.

use std::collections::HashMap;

/// Normalizes raw keys into their canonical tree form.
///
/// A raw key is first substituted through the alias table (if an entry for it
/// exists), then lower-cased, then every space is replaced with an
/// underscore. Data values are never normalized.
///
/// # Examples
///
/// ```
/// use keyword_index::KeyCodec;
///
/// let codec = KeyCodec::new();
/// assert_eq!(codec.normalize("Card Game"), "card_game");
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeyCodec {
    /// Raw key -> substitute key, consulted before normalization
    aliases: HashMap<String, String>,
}

impl KeyCodec {
    /// Creates a codec with no alias table.
    pub fn new() -> Self {
        KeyCodec {
            aliases: HashMap::new(),
        }
    }

    /// Creates a codec that substitutes raw keys through the given alias
    /// table before normalizing them.
    pub fn with_aliases(aliases: HashMap<String, String>) -> Self {
        KeyCodec { aliases }
    }

    /// Produces the canonical form of a raw key.
    ///
    /// The alias lookup happens on the key exactly as the caller supplied it;
    /// only the substituted result is case-folded and separator-replaced.
    pub fn normalize(&self, raw: &str) -> String {
        let substituted = self.aliases.get(raw).map(String::as_str).unwrap_or(raw);
        substituted.to_lowercase().replace(' ', "_")
    }
}
