//! Error types for `ForkDB`.
//!
//! This module provides the [`enum@Error`] type that represents all possible
//! errors from the session and branch-management layers.

use thiserror::Error;

/// Errors that can occur when using `ForkDB`.
#[derive(Debug, Error)]
pub enum Error {
    /// A branch with this name already exists.
    #[error("branch '{0}' already exists")]
    AlreadyExists(String),

    /// Attempted to delete the currently checked-out branch.
    #[error("attempted to delete checked out branch '{0}'")]
    CheckedOutBranchDelete(String),

    /// The branch is not fully merged into the current working branch.
    #[error("branch '{0}' is not fully merged")]
    UnmergedBranch(String),

    /// A versioned store error occurred.
    #[error("store error: {0}")]
    Store(#[from] forkdb_store::StoreError),

    /// A ref or spec could not be parsed.
    #[error("ref error: {0}")]
    Ref(#[from] forkdb_core::CoreError),

    /// Session or repository state is inconsistent with the operation.
    #[error("state error: {0}")]
    State(String),
}

impl Error {
    /// Create a state error.
    #[must_use]
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    /// Returns `true` if this error reports that a branch or commit was
    /// absent rather than a failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_not_found())
    }

    /// Returns `true` if this is a merged-state violation the caller can
    /// override with `force`.
    #[must_use]
    pub const fn is_unmerged(&self) -> bool {
        matches!(self, Self::UnmergedBranch(_))
    }
}

/// A specialized `Result` type for `ForkDB` operations.
pub type Result<T> = std::result::Result<T, Error>;
