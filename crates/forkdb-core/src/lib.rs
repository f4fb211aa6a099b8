//! `ForkDB` Core
//!
//! Core value types shared by every layer of `ForkDB`:
//!
//! - [`RootHash`] - content address of a versioned tree state
//! - [`DataCacheKey`] - opaque cache key wrapping a root hash
//! - [`BranchRef`], [`RemoteRef`], [`WorkingSetRef`], [`HeadRef`] - ref types
//! - [`CommitSpec`] - parsed revision specifier
//!
//! These types carry no behavior beyond identity, parsing, and display.
//! Resolution of specs to commits lives in `forkdb-store`; caching lives
//! in the top-level `forkdb` crate.

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use types::{BranchRef, CommitSpec, DataCacheKey, HeadRef, RemoteRef, RootHash, WorkingSetRef};
