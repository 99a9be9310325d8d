//! Enode identifier: the unique key of a node in the fleet.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// Hex node identity taken from an `enode://<id>@<ip>:<port>` URL.
///
/// Identifiers are compared verbatim. The directory and the node's own
/// monitor must agree byte for byte, otherwise the crawl records a mismatch.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Enode(String);

impl Enode {
    /// Wrap a raw identifier without validation (surrounding whitespace is trimmed).
    pub fn new(raw: impl Into<String>) -> Self {
        let s: String = raw.into();
        Self(s.trim().to_string())
    }

    /// Parse an identifier, rejecting empty or non-hex input.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let id = Self::new(raw);
        if id.is_valid() {
            Ok(id)
        } else {
            Err(TypesError::InvalidEnode(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Non-empty and made only of hex digits.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && self.0.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// First 16 characters, for log lines.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(16) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for Enode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Enode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Enode {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_whitespace() {
        assert_eq!(Enode::new("  ab12  ").as_str(), "ab12");
    }

    #[test]
    fn parse_rejects_non_hex() {
        assert!(Enode::parse("abc123").is_ok());
        assert_eq!(
            Enode::parse("xyz"),
            Err(TypesError::InvalidEnode("xyz".into()))
        );
        assert!(Enode::parse("   ").is_err());
    }

    #[test]
    fn short_truncates_long_ids() {
        let id = Enode::new("0123456789abcdef0123456789abcdef");
        assert_eq!(id.short(), "0123456789abcdef");
        assert_eq!(Enode::new("abc").short(), "abc");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Enode::new("beef")).unwrap();
        assert_eq!(json, "\"beef\"");
    }
}
