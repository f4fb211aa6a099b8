//! # ForkDB
//!
//! Session caches and branch management for a version-controlled SQL
//! database.
//!
//! Two layers live here:
//!
//! - [`session`]: per-session caches keyed by content root hashes, plus
//!   the transaction snapshot they validate against. A changed root is a
//!   natural cache miss; nothing needs explicit invalidation on write.
//! - [`branch`]: branch lifecycle operations (create, copy, rename,
//!   delete) composed over the [`forkdb_store::VersionedStore`] seam.
//!
//! ## Example
//!
//! ```
//! use forkdb::session::{DbTransaction, SessionContext};
//! use forkdb_core::{DataCacheKey, RootHash};
//!
//! let mut ctx = SessionContext::new();
//! ctx.begin_transaction(DbTransaction::new())?;
//!
//! let key = DataCacheKey::new(RootHash::EMPTY);
//! assert!(ctx.session_cache().table_indexes(key, "users").is_none());
//!
//! let _ = ctx.end_transaction();
//! # Ok::<(), forkdb::Error>(())
//! ```

#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod branch;
pub mod error;
pub mod session;

pub use error::{Error, Result};
