//! Value types and collaborator traits consumed by the session caches.
//!
//! The caches never interpret these beyond identity: a table handle is an
//! opaque `Arc<dyn Table>`, a database handle an `Arc<dyn SqlDatabase>`.
//! Payloads keep their original casing; only map keys are lower-cased.

use serde::{Deserialize, Serialize};

use forkdb_core::{HeadRef, RootHash};

/// Descriptor of a single index on a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDef {
    /// The index name as defined.
    pub name: String,
    /// The table this index belongs to.
    pub table: String,
    /// Indexed column names, in key order.
    pub columns: Vec<String>,
    /// Whether the index enforces uniqueness.
    pub unique: bool,
}

impl IndexDef {
    /// Create an index descriptor.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        table: impl Into<String>,
        columns: Vec<String>,
        unique: bool,
    ) -> Self {
        Self { name: name.into(), table: table.into(), columns, unique }
    }
}

/// A view definition: the name and query text as originally written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDefinition {
    /// The view name as defined (original casing).
    pub name: String,
    /// The defining query text.
    pub text_definition: String,
    /// The SQL mode in effect when the view was created.
    pub sql_mode: String,
}

impl ViewDefinition {
    /// Create a view definition.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        text_definition: impl Into<String>,
        sql_mode: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            text_definition: text_definition.into(),
            sql_mode: sql_mode.into(),
        }
    }
}

/// An opaque table handle, valid for the snapshot it was built from.
///
/// The cache stores these without inspecting them; handles must not hold
/// session state of their own.
pub trait Table: Send + Sync {
    /// The table name as defined.
    fn name(&self) -> &str;
}

/// A resolved database handle.
///
/// Database handles are safe to cache across statements only because
/// they defer all data access to the session; the cache uses just the
/// two name accessors as key material.
pub trait SqlDatabase: Send + Sync {
    /// The revision-qualified name, e.g. `db/branch`.
    fn revision_qualified_name(&self) -> String;

    /// The name the client used to request this database.
    fn requested_name(&self) -> String;
}

/// Snapshot of a database's state captured when a session first resolves
/// it at a given root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialDbState {
    /// The database root at resolution time.
    pub root: RootHash,
    /// The head ref the database was resolved against.
    pub head_ref: HeadRef,
    /// Whether the database was resolved read-only (e.g. a detached
    /// commit rather than a branch).
    pub read_only: bool,
}

impl InitialDbState {
    /// Create an initial-state snapshot.
    #[must_use]
    pub const fn new(root: RootHash, head_ref: HeadRef, read_only: bool) -> Self {
        Self { root, head_ref, read_only }
    }
}

/// The branch-level state a session holds for one database: the base
/// database name and the head reference string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchState {
    db_name: String,
    head: String,
}

impl BranchState {
    /// Create a branch state view.
    #[must_use]
    pub fn new(db_name: impl Into<String>, head: impl Into<String>) -> Self {
        Self { db_name: db_name.into(), head: head.into() }
    }

    /// The base (unqualified) database name.
    #[must_use]
    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    /// The head reference string.
    #[must_use]
    pub fn head(&self) -> &str {
        &self.head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_def_construction() {
        let idx = IndexDef::new("PK", "Users", vec!["id".to_string()], true);
        assert_eq!(idx.name, "PK");
        assert!(idx.unique);
    }

    #[test]
    fn view_definition_keeps_casing() {
        let view = ViewDefinition::new("MyView", "SELECT 1", "");
        assert_eq!(view.name, "MyView");
    }

    #[test]
    fn branch_state_accessors() {
        let state = BranchState::new("mydb", "refs/heads/main");
        assert_eq!(state.db_name(), "mydb");
        assert_eq!(state.head(), "refs/heads/main");
    }
}
