//! Per-session state: the two caches and the active transaction.

use crate::error::{Error, Result};
use crate::session::cache::{DatabaseCache, SessionCache};
use crate::session::transaction::DbTransaction;

/// Everything a session holds between statements: the schema-object
/// cache, the database cache, and the currently active transaction.
///
/// A context is owned by exactly one session and is not shared; the
/// caches inside it handle their own interior locking so cache methods
/// take `&self`.
#[derive(Debug, Default)]
pub struct SessionContext {
    session_cache: SessionCache,
    database_cache: DatabaseCache,
    transaction: Option<DbTransaction>,
}

impl SessionContext {
    /// Create a fresh session context with empty caches and no active
    /// transaction.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The schema-object cache for this session.
    #[must_use]
    pub fn session_cache(&self) -> &SessionCache {
        &self.session_cache
    }

    /// The database cache for this session.
    #[must_use]
    pub fn database_cache(&self) -> &DatabaseCache {
        &self.database_cache
    }

    /// The active transaction, if one has begun.
    #[must_use]
    pub fn transaction(&self) -> Option<&DbTransaction> {
        self.transaction.as_ref()
    }

    /// Begin a transaction.
    ///
    /// Returns an error if a transaction is already active.
    pub fn begin_transaction(&mut self, transaction: DbTransaction) -> Result<()> {
        if self.transaction.is_some() {
            return Err(Error::state("a transaction is already active"));
        }
        tracing::debug!(dbs = transaction.db_count(), "beginning transaction");
        self.transaction = Some(transaction);
        Ok(())
    }

    /// End the active transaction, returning it if one was active.
    ///
    /// Cached table handles may capture transaction-scoped state, so the
    /// table cache is cleared here; indexes and views survive.
    pub fn end_transaction(&mut self) -> Option<DbTransaction> {
        let transaction = self.transaction.take();
        if transaction.is_some() {
            self.session_cache.clear_table_cache();
        }
        transaction
    }

    /// Drop every cached entry in both caches.
    ///
    /// Called when the session observes an out-of-band change it cannot
    /// attribute to a root, such as a branch deletion.
    pub fn invalidate_caches(&self) {
        self.session_cache.clear();
        self.database_cache.clear();
    }
}
