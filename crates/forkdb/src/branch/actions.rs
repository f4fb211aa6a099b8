//! Branch lifecycle operations over a [`VersionedStore`].
//!
//! Each operation is a free function generic over the store and the
//! repository-state seam, mirroring how they compose: rename is a copy,
//! a head move, and a forced delete.

use forkdb_core::{BranchRef, CommitSpec, HeadRef, RemoteRef, WorkingSetRef};
use forkdb_store::{Commit, StoreError, VersionedStore};

use crate::branch::repo_state::{RepoStateReader, RepoStateWriter};
use crate::error::{Error, Result};

/// Options controlling branch deletion.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteOptions {
    /// Skip the merged-branch check.
    pub force: bool,
    /// Delete a remote-tracking branch instead of a local one.
    pub remote: bool,
}

/// Create a new branch at `start_point`.
///
/// `start_point` is any revision specifier; `head` supplies the session
/// head when the spec is `HEAD`.
///
/// # Errors
///
/// Returns [`Error::AlreadyExists`] if the branch exists and `force` is
/// not set, or a store error if the start point does not resolve.
pub fn create_branch<S: VersionedStore + ?Sized>(
    store: &S,
    name: &str,
    start_point: &str,
    force: bool,
    head: Option<&HeadRef>,
) -> Result<()> {
    let branch = BranchRef::new(name);
    if !force && store.has_ref(&HeadRef::from(branch.clone()))? {
        return Err(Error::AlreadyExists(name.to_string()));
    }
    let spec = CommitSpec::parse(start_point)?;
    let commit = store.resolve(&spec, head)?;
    store.new_branch_at_commit(&branch, &commit)?;
    tracing::info!(branch = name, start_point, "created branch");
    Ok(())
}

/// Copy branch `from` to a new branch `to`, including its working set.
///
/// # Errors
///
/// Returns [`StoreError::BranchNotFound`] (wrapped) if `from` does not
/// exist and [`Error::AlreadyExists`] if `to` exists without `force`.
pub fn copy_branch<S: VersionedStore + ?Sized>(
    store: &S,
    from: &str,
    to: &str,
    force: bool,
) -> Result<()> {
    let src = BranchRef::new(from);
    let dest = BranchRef::new(to);

    if !store.has_ref(&HeadRef::from(src.clone()))? {
        return Err(StoreError::BranchNotFound(from.to_string()).into());
    }
    if store.has_ref(&HeadRef::from(dest.clone()))? {
        if !force {
            return Err(Error::AlreadyExists(to.to_string()));
        }
        store.delete_ref(&HeadRef::from(dest.clone()))?;
        store.delete_working_set(&WorkingSetRef::for_branch(&dest))?;
    }

    let spec = CommitSpec::parse(from)?;
    let commit = store.resolve(&spec, None)?;
    store.new_branch_at_commit(&dest, &commit)?;
    store.copy_working_set(
        &WorkingSetRef::for_branch(&src),
        &WorkingSetRef::for_branch(&dest),
        true,
    )?;
    tracing::info!(from, to, "copied branch");
    Ok(())
}

/// Rename branch `from` to `to`.
///
/// If `from` is the checked-out branch, the head pointer follows the
/// rename. The old branch is removed with `force` since copying it to
/// the new name cannot lose work.
///
/// # Errors
///
/// Returns [`Error::AlreadyExists`] if `to` exists without `force`.
pub fn rename_branch<S, R>(
    store: &S,
    repo_state: &R,
    from: &str,
    to: &str,
    force: bool,
) -> Result<()>
where
    S: VersionedStore + ?Sized,
    R: RepoStateReader + RepoStateWriter + ?Sized,
{
    copy_branch(store, from, to, force)?;
    if repo_state.head_ref()?.name() == from {
        repo_state.set_head_ref(BranchRef::new(to))?;
    }
    delete_branch(store, repo_state, from, DeleteOptions { force: true, remote: false })?;
    tracing::info!(from, to, "renamed branch");
    Ok(())
}

/// Delete a branch.
///
/// The checked-out branch can never be deleted, even with `force`. A
/// branch not fully merged into the checked-out branch requires `force`.
/// With `options.remote`, `name` addresses a remote-tracking branch
/// (`<remote>/<branch>`) and neither check applies.
///
/// # Errors
///
/// Returns [`Error::CheckedOutBranchDelete`] or
/// [`Error::UnmergedBranch`] when the respective check fails.
pub fn delete_branch<S, R>(
    store: &S,
    repo_state: &R,
    name: &str,
    options: DeleteOptions,
) -> Result<()>
where
    S: VersionedStore + ?Sized,
    R: RepoStateReader + ?Sized,
{
    if options.remote {
        let remote = RemoteRef::from_path_str(name)?;
        store.delete_ref(&HeadRef::from(remote))?;
        tracing::info!(branch = name, "deleted remote-tracking branch");
        return Ok(());
    }

    let branch = BranchRef::new(name);
    let checked_out = repo_state.head_ref()?;
    if checked_out.name() == name {
        return Err(Error::CheckedOutBranchDelete(name.to_string()));
    }

    let spec = CommitSpec::parse(name)?;
    let commit = store.resolve(&spec, None)?;

    if !options.force {
        let head_spec = CommitSpec::parse(checked_out.name())?;
        let head_commit = store.resolve(&head_spec, None)?;
        if !is_merged(store, &commit, &head_commit)? {
            return Err(Error::UnmergedBranch(name.to_string()));
        }
    }

    store.delete_ref(&HeadRef::from(branch.clone()))?;
    store.delete_working_set(&WorkingSetRef::for_branch(&branch))?;
    tracing::info!(branch = name, force = options.force, "deleted branch");
    Ok(())
}

/// Whether `commit` is reachable from `head_commit`.
///
/// Fast-forward probing answers this: identical commits and commits the
/// head is already ahead of count the same as a plain ancestor result.
fn is_merged<S: VersionedStore + ?Sized>(
    store: &S,
    commit: &Commit,
    head_commit: &Commit,
) -> Result<bool> {
    match store.can_fast_forward(commit, head_commit) {
        Ok(merged) => Ok(merged),
        Err(StoreError::UpToDate) => Ok(true),
        Err(StoreError::IsAhead) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Check whether a local branch with this name exists.
///
/// # Errors
///
/// Propagates store failures; a missing branch is `Ok(false)`.
pub fn is_branch<S: VersionedStore + ?Sized>(store: &S, name: &str) -> Result<bool> {
    Ok(store.has_ref(&HeadRef::from(BranchRef::new(name)))?)
}

/// Resolve a revision specifier, treating absence as `None`.
///
/// # Errors
///
/// Propagates store failures other than not-found.
pub fn maybe_resolve_commit<S: VersionedStore + ?Sized>(
    store: &S,
    spec_str: &str,
    head: Option<&HeadRef>,
) -> Result<Option<Commit>> {
    let spec = CommitSpec::parse(spec_str)?;
    match store.resolve(&spec, head) {
        Ok(commit) => Ok(Some(commit)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}
