//! Commits in the versioned store's graph.

use forkdb_core::RootHash;

/// A commit: an immutable snapshot root plus its position in the graph.
///
/// Commits are cheap to clone and carry everything the session and
/// branch-management layers need; the tree contents behind `root` stay
/// in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    hash: RootHash,
    root: RootHash,
    parents: Vec<RootHash>,
}

impl Commit {
    /// Create a commit value.
    #[must_use]
    pub fn new(hash: RootHash, root: RootHash, parents: Vec<RootHash>) -> Self {
        Self { hash, root, parents }
    }

    /// The commit's own content address.
    #[must_use]
    pub const fn hash(&self) -> RootHash {
        self.hash
    }

    /// The root hash of the tree state this commit snapshots.
    #[must_use]
    pub const fn root(&self) -> RootHash {
        self.root
    }

    /// Hashes of the parent commits, first parent first.
    #[must_use]
    pub fn parents(&self) -> &[RootHash] {
        &self.parents
    }
}
