use serde::{Deserialize, Serialize};
use std::fmt;

/// The durable, authentication-backed identity of a voter.
///
/// Uniqueness of votes is keyed on this value, never on the display identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerIdentity(String);

impl CallerIdentity {
    /// Builds a caller identity from a raw value.
    ///
    /// Returns `None` when the value is empty after trimming, which callers
    /// treat the same as an unauthenticated request.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The rotating anonymous token shown publicly next to a vote.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayIdentity(String);

impl DisplayIdentity {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_rejects_blank() {
        assert_eq!(CallerIdentity::parse("  user-1 ").unwrap().as_str(), "user-1");
        assert!(CallerIdentity::parse("").is_none());
        assert!(CallerIdentity::parse("   ").is_none());
    }
}
