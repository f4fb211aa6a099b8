//! Content hashes and cache keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Content address of an entire versioned tree state at a point in time.
///
/// Two hashes are equal iff their bytes are bit-identical. The all-zero
/// hash is reserved as the "empty" sentinel for unborn branches.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RootHash([u8; RootHash::LEN]);

impl RootHash {
    /// The width of a root hash in bytes.
    pub const LEN: usize = 20;

    /// The empty (all-zero) hash.
    pub const EMPTY: Self = Self([0; Self::LEN]);

    /// Create a `RootHash` from raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    /// Returns `true` if this is the empty sentinel hash.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

impl fmt::Display for RootHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for RootHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RootHash({self})")
    }
}

impl FromStr for RootHash {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != Self::LEN * 2 || !s.is_ascii() {
            return Err(CoreError::InvalidHash(s.to_string()));
        }

        let mut bytes = [0u8; Self::LEN];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = &s[i * 2..i * 2 + 2];
            *byte =
                u8::from_str_radix(pair, 16).map_err(|_| CoreError::InvalidHash(s.to_string()))?;
        }
        Ok(Self(bytes))
    }
}

/// Opaque cache key wrapping the root hash of a versioned tree.
///
/// Used as a map key wherever "as of this root" caching is needed.
/// Equality is value equality on the underlying hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataCacheKey(RootHash);

impl DataCacheKey {
    /// Create a cache key for the given root hash.
    #[must_use]
    pub const fn new(root: RootHash) -> Self {
        Self(root)
    }

    /// Get the underlying root hash.
    #[must_use]
    pub const fn root(&self) -> RootHash {
        self.0
    }
}

impl From<RootHash> for DataCacheKey {
    fn from(root: RootHash) -> Self {
        Self::new(root)
    }
}
