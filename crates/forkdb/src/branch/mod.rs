//! Branch lifecycle: create, copy, rename, and delete.

mod actions;
mod repo_state;

pub use actions::{
    copy_branch, create_branch, delete_branch, is_branch, maybe_resolve_commit, rename_branch,
    DeleteOptions,
};
pub use repo_state::{RepoState, RepoStateReader, RepoStateWriter};
