//! Transaction-scoped root snapshots.

use std::collections::HashMap;

use forkdb_core::RootHash;

/// The per-database roots captured when a transaction begins.
///
/// The session-var cache keys its fingerprints against these roots: if a
/// transaction never recorded a root for a database, nothing about that
/// database can safely be cached for the transaction's duration.
#[derive(Debug, Clone, Default)]
pub struct DbTransaction {
    initial_roots: HashMap<String, RootHash>,
}

impl DbTransaction {
    /// Create a transaction with no recorded roots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an initial root for a database (builder form).
    #[must_use]
    pub fn with_initial_root(mut self, db_name: impl Into<String>, root: RootHash) -> Self {
        self.initial_roots.insert(db_name.into(), root);
        self
    }

    /// Record an initial root for a database.
    pub fn set_initial_root(&mut self, db_name: impl Into<String>, root: RootHash) {
        self.initial_roots.insert(db_name.into(), root);
    }

    /// The root recorded for the named database at transaction start, if
    /// any.
    #[must_use]
    pub fn initial_root(&self, db_name: &str) -> Option<RootHash> {
        self.initial_roots.get(db_name).copied()
    }

    /// Number of databases with recorded roots.
    #[must_use]
    pub fn db_count(&self) -> usize {
        self.initial_roots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(byte: u8) -> RootHash {
        RootHash::new([byte; RootHash::LEN])
    }

    #[test]
    fn records_and_returns_roots() {
        let tx = DbTransaction::new().with_initial_root("mydb", root(1));
        assert_eq!(tx.initial_root("mydb"), Some(root(1)));
        assert_eq!(tx.initial_root("otherdb"), None);
        assert_eq!(tx.db_count(), 1);
    }

    #[test]
    fn set_overwrites() {
        let mut tx = DbTransaction::new();
        tx.set_initial_root("mydb", root(1));
        tx.set_initial_root("mydb", root(2));
        assert_eq!(tx.initial_root("mydb"), Some(root(2)));
    }
}
