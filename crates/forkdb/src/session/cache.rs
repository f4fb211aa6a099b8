//! Session-scoped caches keyed by content root.
//!
//! Both caches here live for the duration of a single session. Entries
//! are keyed first by [`DataCacheKey`] (a content root hash) and then by
//! lower-cased object name, so anything cached against a root stays valid
//! for exactly as long as that root describes the data.
//!
//! Eviction is deliberately coarse: when the number of distinct roots in
//! a map exceeds its capacity, the whole map is flushed before the new
//! root is inserted. Sessions touch a small number of roots at a time, so
//! a full flush is cheaper and simpler than per-entry accounting.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use forkdb_core::DataCacheKey;

use crate::session::metrics::CacheMetrics;
use crate::session::transaction::DbTransaction;
use crate::session::types::{
    BranchState, IndexDef, InitialDbState, SqlDatabase, Table, ViewDefinition,
};

/// Maximum number of distinct cache keys held per map before a full
/// flush.
pub const MAX_CACHED_KEYS: usize = 64;

#[derive(Default)]
struct SessionCacheState {
    indexes: HashMap<DataCacheKey, HashMap<String, Vec<IndexDef>>>,
    tables: HashMap<DataCacheKey, HashMap<String, Arc<dyn Table>>>,
    views: HashMap<DataCacheKey, HashMap<String, ViewDefinition>>,
}

/// Caches schema objects resolved against content roots: table indexes,
/// table handles, and view definitions.
///
/// Lookups and inserts normalize names to lower case; cached payloads
/// keep their original casing. Lock poisoning degrades reads to misses
/// and writes to no-ops rather than propagating a panic across sessions.
pub struct SessionCache {
    state: RwLock<SessionCacheState>,
    capacity: usize,
    metrics: Arc<CacheMetrics>,
}

impl SessionCache {
    /// Create a session cache with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(MAX_CACHED_KEYS)
    }

    /// Create a session cache holding at most `capacity` distinct roots
    /// per map.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: RwLock::new(SessionCacheState::default()),
            capacity,
            metrics: Arc::new(CacheMetrics::new()),
        }
    }

    /// Get the metrics for this cache.
    #[must_use]
    pub fn metrics(&self) -> Arc<CacheMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Cache the index list for a table at the given root.
    pub fn cache_table_indexes(&self, key: DataCacheKey, table: &str, indexes: Vec<IndexDef>) {
        if let Ok(mut state) = self.state.write() {
            if state.indexes.len() > self.capacity {
                state.indexes.clear();
                self.metrics.record_flush();
                tracing::debug!(capacity = self.capacity, "flushed index cache");
            }
            state.indexes.entry(key).or_default().insert(table.to_lowercase(), indexes);
        }
    }

    /// Get the cached index list for a table at the given root.
    #[must_use]
    pub fn table_indexes(&self, key: DataCacheKey, table: &str) -> Option<Vec<IndexDef>> {
        let result = self
            .state
            .read()
            .ok()
            .and_then(|state| state.indexes.get(&key)?.get(&table.to_lowercase()).cloned());
        match result {
            Some(indexes) => {
                self.metrics.record_hit();
                Some(indexes)
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    /// Cache a resolved table handle at the given root.
    pub fn cache_table(&self, key: DataCacheKey, name: &str, table: Arc<dyn Table>) {
        if let Ok(mut state) = self.state.write() {
            if state.tables.len() > self.capacity {
                state.tables.clear();
                self.metrics.record_flush();
                tracing::debug!(capacity = self.capacity, "flushed table cache");
            }
            state.tables.entry(key).or_default().insert(name.to_lowercase(), table);
        }
    }

    /// Get a cached table handle at the given root.
    #[must_use]
    pub fn cached_table(&self, key: DataCacheKey, name: &str) -> Option<Arc<dyn Table>> {
        let result = self
            .state
            .read()
            .ok()
            .and_then(|state| state.tables.get(&key)?.get(&name.to_lowercase()).cloned());
        match result {
            Some(table) => {
                self.metrics.record_hit();
                Some(table)
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    /// Drop every cached table handle, leaving indexes and views intact.
    ///
    /// Called at transaction boundaries: table handles may capture
    /// transaction-scoped state that must not leak into the next one.
    pub fn clear_table_cache(&self) {
        if let Ok(mut state) = self.state.write() {
            state.tables.clear();
        }
    }

    /// Cache the full set of view definitions for a root.
    ///
    /// An empty `views` list still marks the root as known, so later
    /// lookups can distinguish "no views" from "never fetched".
    pub fn cache_views(&self, key: DataCacheKey, views: Vec<ViewDefinition>) {
        if let Ok(mut state) = self.state.write() {
            if state.views.len() > self.capacity {
                state.views.clear();
                self.metrics.record_flush();
                tracing::debug!(capacity = self.capacity, "flushed view cache");
            }
            let entry = state.views.entry(key).or_default();
            for view in views {
                entry.insert(view.name.to_lowercase(), view);
            }
        }
    }

    /// Whether the view set for this root has been cached (even if
    /// empty).
    #[must_use]
    pub fn views_cached(&self, key: DataCacheKey) -> bool {
        self.state.read().ok().is_some_and(|state| state.views.contains_key(&key))
    }

    /// Get a cached view definition at the given root.
    #[must_use]
    pub fn cached_view(&self, key: DataCacheKey, name: &str) -> Option<ViewDefinition> {
        let result = self
            .state
            .read()
            .ok()
            .and_then(|state| state.views.get(&key)?.get(&name.to_lowercase()).cloned());
        match result {
            Some(view) => {
                self.metrics.record_hit();
                Some(view)
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    /// Drop every cached entry across all three maps.
    pub fn clear(&self) {
        if let Ok(mut state) = self.state.write() {
            state.indexes.clear();
            state.tables.clear();
            state.views.clear();
            self.metrics.record_flush();
        }
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCache").field("capacity", &self.capacity).finish_non_exhaustive()
    }
}

/// Key identifying one revision-qualified database request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RevisionDbKey {
    db_name: String,
    requested_name: String,
}

/// Fingerprint of the session-var state written for one database.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SessionVarKey {
    root: DataCacheKey,
    head: String,
}

#[derive(Default)]
struct DatabaseCacheState {
    revision_dbs: HashMap<RevisionDbKey, Arc<dyn SqlDatabase>>,
    initial_db_states: HashMap<DataCacheKey, HashMap<String, InitialDbState>>,
    session_vars: HashMap<String, SessionVarKey>,
}

/// Caches resolved database handles, per-root initial database states,
/// and the session-var fingerprints used to skip redundant variable
/// writes.
pub struct DatabaseCache {
    state: RwLock<DatabaseCacheState>,
    capacity: usize,
    metrics: Arc<CacheMetrics>,
}

impl DatabaseCache {
    /// Create a database cache with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(MAX_CACHED_KEYS)
    }

    /// Create a database cache holding at most `capacity` distinct roots
    /// in the initial-state map.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: RwLock::new(DatabaseCacheState::default()),
            capacity,
            metrics: Arc::new(CacheMetrics::new()),
        }
    }

    /// Get the metrics for this cache.
    #[must_use]
    pub fn metrics(&self) -> Arc<CacheMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Get a cached database handle for an exact (name, requested name)
    /// pair.
    ///
    /// Matching is exact on the stored keys: the revision-qualified name
    /// was lower-cased at insert time, the requested name was not.
    #[must_use]
    pub fn cached_revision_db(
        &self,
        db_name: &str,
        requested_name: &str,
    ) -> Option<Arc<dyn SqlDatabase>> {
        let key = RevisionDbKey {
            db_name: db_name.to_string(),
            requested_name: requested_name.to_string(),
        };
        let result =
            self.state.read().ok().and_then(|state| state.revision_dbs.get(&key).cloned());
        match result {
            Some(db) => {
                self.metrics.record_hit();
                Some(db)
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    /// Cache a resolved database handle under its lower-cased
    /// revision-qualified name and verbatim requested name.
    pub fn cache_revision_db(&self, db: Arc<dyn SqlDatabase>) {
        let key = RevisionDbKey {
            db_name: db.revision_qualified_name().to_lowercase(),
            requested_name: db.requested_name(),
        };
        if let Ok(mut state) = self.state.write() {
            if state.revision_dbs.len() > self.capacity {
                state.revision_dbs.clear();
                self.metrics.record_flush();
                tracing::debug!(capacity = self.capacity, "flushed revision-db cache");
            }
            state.revision_dbs.insert(key, db);
        }
    }

    /// Get the cached initial state for a database at the given root.
    ///
    /// Names are normalized to lower case on insert and lookup, the same
    /// discipline as the schema-object maps; callers that already pass
    /// lower-cased names see verbatim matching.
    #[must_use]
    pub fn cached_initial_db_state(
        &self,
        key: DataCacheKey,
        db_name: &str,
    ) -> Option<InitialDbState> {
        let result = self.state.read().ok().and_then(|state| {
            state.initial_db_states.get(&key)?.get(&db_name.to_lowercase()).cloned()
        });
        match result {
            Some(initial) => {
                self.metrics.record_hit();
                Some(initial)
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    /// Cache the initial state for a database at the given root.
    pub fn cache_initial_db_state(
        &self,
        key: DataCacheKey,
        db_name: &str,
        initial: InitialDbState,
    ) {
        if let Ok(mut state) = self.state.write() {
            if state.initial_db_states.len() > self.capacity {
                state.initial_db_states.clear();
                self.metrics.record_flush();
                tracing::debug!(capacity = self.capacity, "flushed initial-state cache");
            }
            state
                .initial_db_states
                .entry(key)
                .or_default()
                .insert(db_name.to_lowercase(), initial);
        }
    }

    /// Record the session-var fingerprint for a database and report
    /// whether the session variables need to be rewritten.
    ///
    /// The fingerprint is the (transaction root, head ref) pair. Returns
    /// `true` when no root is recorded for the database, when no
    /// fingerprint was cached, or when the cached fingerprint differs
    /// from the current one. Returns `false` only on an exact match,
    /// meaning the previously-written variables are still accurate.
    #[must_use]
    pub fn cache_session_vars(
        &self,
        branch_state: &BranchState,
        transaction: &DbTransaction,
    ) -> bool {
        let Some(root) = transaction.initial_root(branch_state.db_name()) else {
            return true;
        };
        let new_key =
            SessionVarKey { root: DataCacheKey::new(root), head: branch_state.head().to_string() };
        let Ok(mut state) = self.state.write() else {
            return true;
        };
        let existing =
            state.session_vars.insert(branch_state.db_name().to_string(), new_key.clone());
        match existing {
            Some(old) => old != new_key,
            None => true,
        }
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        if let Ok(mut state) = self.state.write() {
            state.revision_dbs.clear();
            state.initial_db_states.clear();
            state.session_vars.clear();
            self.metrics.record_flush();
        }
    }
}

impl Default for DatabaseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DatabaseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseCache").field("capacity", &self.capacity).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::types::test_support::{database, table};
    use forkdb_core::{BranchRef, HeadRef, RootHash};

    fn key(byte: u8) -> DataCacheKey {
        DataCacheKey::new(RootHash::new([byte; RootHash::LEN]))
    }

    fn head() -> HeadRef {
        HeadRef::from(BranchRef::new("main"))
    }

    // ========================================================================
    // SessionCache
    // ========================================================================

    #[test]
    fn test_table_indexes_roundtrip() {
        let cache = SessionCache::new();
        let indexes = vec![IndexDef::new("pk", "users", vec!["id".to_string()], true)];

        cache.cache_table_indexes(key(1), "Users", indexes.clone());

        // Lookup is case-insensitive on the table name.
        assert_eq!(cache.table_indexes(key(1), "users"), Some(indexes.clone()));
        assert_eq!(cache.table_indexes(key(1), "USERS"), Some(indexes));
        assert_eq!(cache.table_indexes(key(2), "users"), None);
    }

    #[test]
    fn test_empty_index_list_is_a_hit() {
        let cache = SessionCache::new();
        cache.cache_table_indexes(key(1), "bare", Vec::new());
        assert_eq!(cache.table_indexes(key(1), "bare"), Some(Vec::new()));
        assert_eq!(cache.metrics().hits(), 1);
    }

    #[test]
    fn test_cached_table_handle() {
        let cache = SessionCache::new();
        cache.cache_table(key(1), "Users", table("Users"));

        let cached = cache.cached_table(key(1), "users").expect("cached table");
        assert_eq!(cached.name(), "Users");
        assert!(cache.cached_table(key(1), "orders").is_none());
    }

    #[test]
    fn test_clear_table_cache_leaves_other_maps() {
        let cache = SessionCache::new();
        cache.cache_table(key(1), "users", table("users"));
        cache.cache_table_indexes(key(1), "users", Vec::new());
        cache.cache_views(key(1), vec![ViewDefinition::new("v", "SELECT 1", "")]);

        cache.clear_table_cache();

        assert!(cache.cached_table(key(1), "users").is_none());
        assert!(cache.table_indexes(key(1), "users").is_some());
        assert!(cache.cached_view(key(1), "v").is_some());
    }

    #[test]
    fn test_views_cached_marker_with_empty_set() {
        let cache = SessionCache::new();
        assert!(!cache.views_cached(key(1)));

        cache.cache_views(key(1), Vec::new());

        assert!(cache.views_cached(key(1)));
        assert!(cache.cached_view(key(1), "anything").is_none());
    }

    #[test]
    fn test_view_lookup_case_insensitive() {
        let cache = SessionCache::new();
        cache.cache_views(key(1), vec![ViewDefinition::new("MyView", "SELECT 1", "")]);

        let view = cache.cached_view(key(1), "myview").expect("cached view");
        assert_eq!(view.name, "MyView");
    }

    #[test]
    fn test_flush_on_capacity_overflow() {
        let cache = SessionCache::with_capacity(4);
        for i in 0..=4u8 {
            cache.cache_table(key(i), "t", table("t"));
        }
        // Five distinct roots fit: the flush triggers on the insert that
        // follows, not the one that reaches capacity + 1.
        assert!(cache.cached_table(key(0), "t").is_some());
        assert_eq!(cache.metrics().flushes(), 0);

        cache.cache_table(key(5), "t", table("t"));

        assert_eq!(cache.metrics().flushes(), 1);
        assert!(cache.cached_table(key(0), "t").is_none());
        assert!(cache.cached_table(key(5), "t").is_some());
    }

    #[test]
    fn test_flush_is_per_map() {
        let cache = SessionCache::with_capacity(2);
        for i in 0..4u8 {
            cache.cache_table(key(i), "t", table("t"));
        }
        assert_eq!(cache.metrics().flushes(), 1);
        // The index map never overflowed, so earlier entries survive.
        cache.cache_table_indexes(key(0), "t", Vec::new());
        assert!(cache.table_indexes(key(0), "t").is_some());
    }

    #[test]
    fn test_clear_drops_everything() {
        let cache = SessionCache::new();
        cache.cache_table(key(1), "t", table("t"));
        cache.cache_views(key(1), Vec::new());

        cache.clear();

        assert!(cache.cached_table(key(1), "t").is_none());
        assert!(!cache.views_cached(key(1)));
    }

    // ========================================================================
    // DatabaseCache
    // ========================================================================

    #[test]
    fn test_revision_db_exact_match() {
        let cache = DatabaseCache::new();
        cache.cache_revision_db(database("mydb/Feature", "MyDB/Feature"));

        // The qualified name was lower-cased at insert; the requested
        // name was stored verbatim.
        assert!(cache.cached_revision_db("mydb/feature", "MyDB/Feature").is_some());
        assert!(cache.cached_revision_db("MyDB/Feature", "MyDB/Feature").is_none());
        assert!(cache.cached_revision_db("mydb/feature", "mydb/feature").is_none());
    }

    #[test]
    fn test_revision_db_flush_at_capacity() {
        let cache = DatabaseCache::with_capacity(2);
        for i in 0..4 {
            let name = format!("db{i}/main");
            cache.cache_revision_db(database(&name, &name));
        }
        assert_eq!(cache.metrics().flushes(), 1);
        assert!(cache.cached_revision_db("db0/main", "db0/main").is_none());
        assert!(cache.cached_revision_db("db3/main", "db3/main").is_some());
    }

    #[test]
    fn test_initial_db_state_roundtrip() {
        let cache = DatabaseCache::new();
        let initial = InitialDbState::new(RootHash::new([7; RootHash::LEN]), head(), false);

        cache.cache_initial_db_state(key(1), "MyDB", initial.clone());

        assert_eq!(cache.cached_initial_db_state(key(1), "mydb"), Some(initial));
        assert_eq!(cache.cached_initial_db_state(key(2), "mydb"), None);
    }

    #[test]
    fn test_initial_db_state_flush() {
        let cache = DatabaseCache::with_capacity(2);
        let initial = InitialDbState::new(RootHash::new([7; RootHash::LEN]), head(), false);
        for i in 0..4u8 {
            cache.cache_initial_db_state(key(i), "db", initial.clone());
        }
        assert_eq!(cache.metrics().flushes(), 1);
        assert!(cache.cached_initial_db_state(key(0), "db").is_none());
        assert!(cache.cached_initial_db_state(key(3), "db").is_some());
    }

    #[test]
    fn test_session_vars_no_root_always_needs_update() {
        let cache = DatabaseCache::new();
        let state = BranchState::new("mydb", "refs/heads/main");
        let tx = DbTransaction::new();

        assert!(cache.cache_session_vars(&state, &tx));
        // Nothing was cached, so the answer does not change.
        assert!(cache.cache_session_vars(&state, &tx));
    }

    #[test]
    fn test_session_vars_fingerprint_match() {
        let cache = DatabaseCache::new();
        let state = BranchState::new("mydb", "refs/heads/main");
        let root = RootHash::new([1; RootHash::LEN]);
        let tx = DbTransaction::new().with_initial_root("mydb", root);

        assert!(cache.cache_session_vars(&state, &tx));
        assert!(!cache.cache_session_vars(&state, &tx));
    }

    #[test]
    fn test_session_vars_detect_root_change() {
        let cache = DatabaseCache::new();
        let state = BranchState::new("mydb", "refs/heads/main");
        let tx1 = DbTransaction::new().with_initial_root("mydb", RootHash::new([1; RootHash::LEN]));
        let tx2 = DbTransaction::new().with_initial_root("mydb", RootHash::new([2; RootHash::LEN]));

        assert!(cache.cache_session_vars(&state, &tx1));
        assert!(cache.cache_session_vars(&state, &tx2));
        assert!(!cache.cache_session_vars(&state, &tx2));
    }

    #[test]
    fn test_session_vars_detect_head_change() {
        let cache = DatabaseCache::new();
        let root = RootHash::new([1; RootHash::LEN]);
        let tx = DbTransaction::new().with_initial_root("mydb", root);
        let on_main = BranchState::new("mydb", "refs/heads/main");
        let on_feature = BranchState::new("mydb", "refs/heads/feature");

        assert!(cache.cache_session_vars(&on_main, &tx));
        assert!(cache.cache_session_vars(&on_feature, &tx));
        assert!(!cache.cache_session_vars(&on_feature, &tx));
    }

    #[test]
    fn test_database_cache_clear() {
        let cache = DatabaseCache::new();
        cache.cache_revision_db(database("mydb/main", "mydb/main"));
        let state = BranchState::new("mydb", "refs/heads/main");
        let tx = DbTransaction::new().with_initial_root("mydb", RootHash::new([1; RootHash::LEN]));
        assert!(cache.cache_session_vars(&state, &tx));

        cache.clear();

        assert!(cache.cached_revision_db("mydb/main", "mydb/main").is_none());
        // Cleared fingerprints mean the next write is needed again.
        assert!(cache.cache_session_vars(&state, &tx));
    }
}
