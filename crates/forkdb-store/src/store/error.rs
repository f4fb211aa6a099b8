//! Store error types.

use thiserror::Error;

/// Errors that can occur in versioned store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The named branch does not exist.
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// No commit exists with the given hash.
    #[error("hash not found: {0}")]
    HashNotFound(String),

    /// The revision specifier did not resolve to a commit.
    #[error("not a commit: {0}")]
    NotACommit(String),

    /// The branch name is not valid.
    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    /// A ref with this name already exists.
    #[error("ref already exists: {0}")]
    AlreadyExists(String),

    /// The working set ref does not exist.
    #[error("working set not found: {0}")]
    WorkingSetNotFound(String),

    /// Fast-forward comparison: the two commits are the same.
    #[error("up to date")]
    UpToDate,

    /// Fast-forward comparison: the source commit is strictly ahead of
    /// the destination.
    #[error("commit is ahead of destination")]
    IsAhead,

    /// An internal lock was poisoned (a thread panicked while holding it).
    #[error("internal lock poisoned: {0}")]
    LockPoisoned(String),
}

impl StoreError {
    /// Returns `true` if this error reports absence of a ref or commit
    /// rather than a failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::BranchNotFound(_) | Self::HashNotFound(_) | Self::NotACommit(_))
    }
}

/// A specialized `Result` type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
