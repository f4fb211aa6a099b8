//! Revision specifiers.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::RootHash;

/// A parsed revision specifier: `HEAD`, a ref name, or a root hash.
///
/// Parsing is purely syntactic; resolving a spec to a commit is the
/// versioned store's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitSpec {
    /// The current session head.
    Head,
    /// A named ref (local branch or remote-tracking path).
    Ref(String),
    /// An exact commit hash.
    Hash(RootHash),
}

impl CommitSpec {
    /// Parse a revision specifier string.
    ///
    /// A 40-character hex string parses as a hash, `HEAD` (any case) as
    /// the session head, and anything else non-empty as a ref name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCommitSpec`] for empty or
    /// whitespace-containing input.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(CoreError::InvalidCommitSpec(s.to_string()));
        }

        if s.eq_ignore_ascii_case("HEAD") {
            return Ok(Self::Head);
        }

        if let Ok(hash) = s.parse::<RootHash>() {
            return Ok(Self::Hash(hash));
        }

        Ok(Self::Ref(s.to_string()))
    }
}

impl FromStr for CommitSpec {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CommitSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Head => write!(f, "HEAD"),
            Self::Ref(name) => write!(f, "{name}"),
            Self::Hash(hash) => write!(f, "{hash}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_head_case_insensitively() {
        assert_eq!(CommitSpec::parse("HEAD").expect("valid"), CommitSpec::Head);
        assert_eq!(CommitSpec::parse("head").expect("valid"), CommitSpec::Head);
    }

    #[test]
    fn parses_hash() {
        let hex = "ab".repeat(20);
        let spec = CommitSpec::parse(&hex).expect("valid");
        assert!(matches!(spec, CommitSpec::Hash(_)));
    }

    #[test]
    fn parses_ref_name() {
        let spec = CommitSpec::parse("feature/x").expect("valid");
        assert_eq!(spec, CommitSpec::Ref("feature/x".to_string()));
    }

    #[test]
    fn rejects_empty_and_whitespace() {
        assert!(CommitSpec::parse("").is_err());
        assert!(CommitSpec::parse("two words").is_err());
    }

    #[test]
    fn display_roundtrip() {
        for input in ["HEAD", "main", &"0f".repeat(20)] {
            let spec = CommitSpec::parse(input).expect("valid");
            let redisplayed = CommitSpec::parse(&spec.to_string()).expect("valid");
            assert_eq!(spec, redisplayed);
        }
    }
}
