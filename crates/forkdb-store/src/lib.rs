//! `ForkDB` Store
//!
//! This crate provides the versioned object store abstraction and backend
//! implementations for `ForkDB`.
//!
//! # Overview
//!
//! A versioned store holds an immutable commit graph plus a mutable ref
//! namespace (branches, remote-tracking branches, and per-branch working
//! sets). The session and branch-management layers above consume it
//! through the [`VersionedStore`] trait and never touch storage directly.
//!
//! # Core Trait
//!
//! - [`VersionedStore`] - resolve revision specs, test and mutate refs,
//!   and move working sets between branches
//!
//! # Error Handling
//!
//! All store operations return [`StoreResult<T>`], an alias for
//! `Result<T, StoreError>`. Fast-forward comparisons signal the two
//! boundary cases (`UpToDate`, `IsAhead`) as error variants so callers
//! can fold them into merged/unmerged decisions.
//!
//! # Example
//!
//! ```ignore
//! use forkdb_store::{MemoryStore, VersionedStore};
//! use forkdb_core::{BranchRef, CommitSpec};
//!
//! let store = MemoryStore::new();
//! let base = store.commit_root(root, &[])?;
//! store.new_branch_at_commit(&BranchRef::new("main"), &base)?;
//!
//! let head = store.resolve(&CommitSpec::parse("main")?, None)?;
//! assert_eq!(head.root(), root);
//! ```

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod backends;
pub mod store;

pub use backends::MemoryStore;
pub use store::{Commit, StoreError, StoreResult, VersionedStore};
