//! Session-scoped caching keyed by content roots.
//!
//! A session owns a [`SessionContext`], which bundles the two caches and
//! the active [`DbTransaction`]. Cache entries are validated by root
//! hash ([`forkdb_core::DataCacheKey`]), so a new root naturally misses
//! without any explicit invalidation.

mod cache;
mod context;
mod metrics;
mod transaction;
mod types;

pub use cache::{DatabaseCache, SessionCache, MAX_CACHED_KEYS};
pub use context::SessionContext;
pub use metrics::{CacheMetrics, MetricsSnapshot};
pub use transaction::DbTransaction;
pub use types::{BranchState, IndexDef, InitialDbState, SqlDatabase, Table, ViewDefinition};
