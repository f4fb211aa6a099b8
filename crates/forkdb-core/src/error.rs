//! Error types for the core crate.

use thiserror::Error;

/// Errors that can occur in the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A ref string could not be parsed.
    #[error("invalid ref: {0}")]
    InvalidRef(String),

    /// A hash string could not be parsed.
    #[error("invalid hash: {0}")]
    InvalidHash(String),

    /// A revision specifier could not be parsed.
    #[error("invalid commit spec: {0}")]
    InvalidCommitSpec(String),
}

/// A specialized `Result` type for core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;
