//! Commit identifier type

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a full SHA-1 commit hash in hexadecimal form
pub const FULL_HASH_LEN: usize = 40;

/// Shortest abbreviation accepted in lenient mode
pub const MIN_ABBREVIATED_LEN: usize = 7;

/// Character class of a normalized identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharClass {
    Hexadecimal,
    Other,
}

/// A string claimed to reference a commit, kept in raw and normalized form.
///
/// Build it through the normalizer so that `normalized` is always canonical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    raw: String,
    normalized: String,
}

impl Identifier {
    #[must_use]
    pub fn new(raw: impl Into<String>, normalized: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            normalized: normalized.into(),
        }
    }

    /// The value exactly as the caller supplied it
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Length of the normalized value
    #[must_use]
    pub fn len(&self) -> usize {
        self.normalized.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    #[must_use]
    pub fn char_class(&self) -> CharClass {
        if !self.normalized.is_empty() && self.normalized.bytes().all(|b| b.is_ascii_hexdigit()) {
            CharClass::Hexadecimal
        } else {
            CharClass::Other
        }
    }

    #[must_use]
    pub fn is_hexadecimal(&self) -> bool {
        self.char_class() == CharClass::Hexadecimal
    }

    /// True for a full-length hexadecimal commit hash
    #[must_use]
    pub fn is_full_hash(&self) -> bool {
        self.len() == FULL_HASH_LEN && self.is_hexadecimal()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_hex_and_other() {
        let hex = Identifier::new("A1B2C3D", "a1b2c3d");
        assert_eq!(hex.char_class(), CharClass::Hexadecimal);
        assert!(!hex.is_full_hash());

        let other = Identifier::new("zzzz123", "zzzz123");
        assert_eq!(other.char_class(), CharClass::Other);
    }

    #[test]
    fn full_hash_requires_forty_hex_chars() {
        let full = Identifier::new("x", "0123456789abcdef0123456789abcdef01234567");
        assert!(full.is_full_hash());
        assert_eq!(full.len(), FULL_HASH_LEN);
    }
}
