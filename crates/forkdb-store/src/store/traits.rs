//! Core versioned store trait.
//!
//! This module defines the trait that versioned store backends implement:
//!
//! - [`VersionedStore`] - revision resolution, ref mutation, and working
//!   set movement
//!
//! The trait is object-safe so callers can hold a `&dyn VersionedStore`
//! or an `Arc<dyn VersionedStore>` across layers.

use std::sync::Arc;

use forkdb_core::{BranchRef, CommitSpec, HeadRef, WorkingSetRef};

use super::{Commit, StoreError, StoreResult};

/// A store holding a commit graph and a mutable ref namespace.
///
/// Implementations must be thread-safe (`Send + Sync`). Ref mutations
/// are atomic per call; no multi-ref transaction is offered here.
///
/// # Example
///
/// ```ignore
/// use forkdb_store::VersionedStore;
/// use forkdb_core::{BranchRef, CommitSpec, HeadRef};
///
/// fn example<S: VersionedStore + ?Sized>(store: &S) -> Result<(), StoreError> {
///     let spec = CommitSpec::parse("main")?;
///     let commit = store.resolve(&spec, None)?;
///     store.new_branch_at_commit(&BranchRef::new("feature"), &commit)?;
///     Ok(())
/// }
/// ```
pub trait VersionedStore: Send + Sync {
    /// Resolve a revision specifier to a commit.
    ///
    /// `head` supplies the session head for [`CommitSpec::Head`]; it is
    /// ignored for ref and hash specs.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BranchNotFound`] for a missing ref,
    /// [`StoreError::HashNotFound`] for a missing commit hash, and
    /// [`StoreError::NotACommit`] for a `HEAD` spec without a head.
    fn resolve(&self, spec: &CommitSpec, head: Option<&HeadRef>) -> StoreResult<Commit>;

    /// Check whether a ref exists.
    fn has_ref(&self, r: &HeadRef) -> StoreResult<bool>;

    /// Create a branch pointing at the given commit.
    ///
    /// Also initializes the branch's working set from the commit root.
    /// An existing branch with the same name is overwritten; callers that
    /// care check [`has_ref`](Self::has_ref) first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidBranchName`] if the name fails
    /// validation, [`StoreError::HashNotFound`] if the commit is not in
    /// this store.
    fn new_branch_at_commit(&self, branch: &BranchRef, commit: &Commit) -> StoreResult<()>;

    /// Delete a ref.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BranchNotFound`] if the ref does not exist.
    fn delete_ref(&self, r: &HeadRef) -> StoreResult<()>;

    /// Copy the working set at `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::WorkingSetNotFound`] if `from` has no
    /// working set, [`StoreError::AlreadyExists`] if `to` already has one
    /// and `force` is not set.
    fn copy_working_set(
        &self,
        from: &WorkingSetRef,
        to: &WorkingSetRef,
        force: bool,
    ) -> StoreResult<()>;

    /// Delete a working set. Deleting an absent working set is a no-op.
    fn delete_working_set(&self, r: &WorkingSetRef) -> StoreResult<()>;

    /// Check whether `from` can fast-forward to `to`, i.e. whether `from`
    /// is an ancestor of `to`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UpToDate`] when the commits are identical
    /// and [`StoreError::IsAhead`] when `from` is a strict descendant of
    /// `to`; callers fold both into their merged/unmerged decision.
    fn can_fast_forward(&self, from: &Commit, to: &Commit) -> StoreResult<bool>;
}

// ============================================================================
// Blanket Implementations
// ============================================================================

/// Implement `VersionedStore` for `Arc<S>` to allow shared ownership of
/// stores across sessions.
impl<S: VersionedStore + ?Sized> VersionedStore for Arc<S> {
    fn resolve(&self, spec: &CommitSpec, head: Option<&HeadRef>) -> StoreResult<Commit> {
        (**self).resolve(spec, head)
    }

    fn has_ref(&self, r: &HeadRef) -> StoreResult<bool> {
        (**self).has_ref(r)
    }

    fn new_branch_at_commit(&self, branch: &BranchRef, commit: &Commit) -> StoreResult<()> {
        (**self).new_branch_at_commit(branch, commit)
    }

    fn delete_ref(&self, r: &HeadRef) -> StoreResult<()> {
        (**self).delete_ref(r)
    }

    fn copy_working_set(
        &self,
        from: &WorkingSetRef,
        to: &WorkingSetRef,
        force: bool,
    ) -> StoreResult<()> {
        (**self).copy_working_set(from, to, force)
    }

    fn delete_working_set(&self, r: &WorkingSetRef) -> StoreResult<()> {
        (**self).delete_working_set(r)
    }

    fn can_fast_forward(&self, from: &Commit, to: &Commit) -> StoreResult<bool> {
        (**self).can_fast_forward(from, to)
    }
}

/// Validate a user-supplied branch name.
///
/// This is deliberately a small predicate, not a full ref-name grammar:
/// non-empty, printable ASCII without whitespace, no `..`, and no leading
/// `-` or trailing `/`.
#[must_use]
pub(crate) fn is_valid_branch_name(name: &str) -> bool {
    if name.is_empty() || name.starts_with('-') || name.ends_with('/') {
        return false;
    }
    if name.contains("..") {
        return false;
    }
    name.chars().all(|c| c.is_ascii_graphic())
}
