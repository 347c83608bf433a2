//! Type-safe identifiers.
//!
//! The bridge correlates every outbound call with the client's current
//! session token, sent as the `uid` field.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Constants
// ============================================================================

/// Prefix shared by every generated token.
const TOKEN_PREFIX: &str = "uid-";

/// Number of random characters after the prefix.
const TOKEN_RANDOM_LEN: usize = 16;

// ============================================================================
// SessionToken
// ============================================================================

/// Opaque per-session identifier, e.g. `uid-3f2a9c0d81b74e6a`.
///
/// Regenerated every time the connection state is reset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generates a new random token.
    #[must_use]
    pub fn generate() -> Self {
        let random = Uuid::new_v4().simple().to_string();
        Self(format!("{TOKEN_PREFIX}{}", &random[..TOKEN_RANDOM_LEN]))
    }

    /// Returns the token as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_format() {
        let token = SessionToken::generate();
        let s = token.as_str();

        assert!(s.starts_with("uid-"));
        assert_eq!(s.len(), TOKEN_PREFIX.len() + TOKEN_RANDOM_LEN);
        assert!(
            s[TOKEN_PREFIX.len()..]
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = SessionToken::generate();
        let b = SessionToken::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_serializes_as_string() {
        let token = SessionToken::generate();
        let json = serde_json::to_string(&token).expect("serialize");
        assert_eq!(json, format!("\"{token}\""));
    }
}
