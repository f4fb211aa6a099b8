//! In-memory versioned store backend.
//!
//! Holds the commit graph and ref namespace in process memory behind a
//! read-write lock. Used by tests and by embedders that manage
//! durability themselves.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::RwLock;

use tracing::debug;

use forkdb_core::{BranchRef, CommitSpec, HeadRef, RemoteRef, RootHash, WorkingSetRef};

use crate::store::{is_valid_branch_name, Commit, StoreError, StoreResult, VersionedStore};

/// Internal store state: commit graph plus ref namespace.
///
/// Refs and working sets are keyed by fully qualified ref path, so local
/// and remote-tracking branches share one map.
struct StoreState {
    commits: HashMap<RootHash, Commit>,
    refs: HashMap<String, RootHash>,
    working_sets: HashMap<String, RootHash>,
    /// Sequence number folded into commit hashes so that two commits of
    /// the same tree are still distinct commits.
    next_seq: u64,
}

impl StoreState {
    fn new() -> Self {
        Self {
            commits: HashMap::new(),
            refs: HashMap::new(),
            working_sets: HashMap::new(),
            next_seq: 1,
        }
    }

    fn commit_for_ref(&self, path: &str) -> StoreResult<Commit> {
        let hash =
            self.refs.get(path).ok_or_else(|| StoreError::BranchNotFound(path.to_string()))?;
        self.commit_for_hash(*hash)
    }

    fn commit_for_hash(&self, hash: RootHash) -> StoreResult<Commit> {
        self.commits.get(&hash).cloned().ok_or_else(|| StoreError::HashNotFound(hash.to_string()))
    }

    /// Walk the graph from `descendant` back through parents looking for
    /// `ancestor`.
    fn is_ancestor(&self, ancestor: RootHash, descendant: RootHash) -> bool {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([descendant]);

        while let Some(hash) = queue.pop_front() {
            if hash == ancestor {
                return true;
            }
            if !seen.insert(hash) {
                continue;
            }
            if let Some(commit) = self.commits.get(&hash) {
                queue.extend(commit.parents().iter().copied());
            }
        }
        false
    }
}

/// An in-memory [`VersionedStore`].
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { state: RwLock::new(StoreState::new()) }
    }

    /// Record a new commit snapshotting `root` with the given parents.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::HashNotFound`] if any parent is not in this
    /// store.
    pub fn commit_root(&self, root: RootHash, parents: &[RootHash]) -> StoreResult<Commit> {
        let mut state = write_lock(&self.state)?;

        for parent in parents {
            if !state.commits.contains_key(parent) {
                return Err(StoreError::HashNotFound(parent.to_string()));
            }
        }

        let seq = state.next_seq;
        state.next_seq += 1;

        let hash = commit_hash(root, parents, seq);
        let commit = Commit::new(hash, root, parents.to_vec());
        state.commits.insert(hash, commit.clone());
        Ok(commit)
    }

    /// Point a remote-tracking ref at an existing commit.
    ///
    /// Stands in for a fetch; remote synchronization itself is out of
    /// scope for this store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::HashNotFound`] if the commit is not in this
    /// store.
    pub fn set_remote_ref(&self, remote: &RemoteRef, commit: &Commit) -> StoreResult<()> {
        let mut state = write_lock(&self.state)?;
        if !state.commits.contains_key(&commit.hash()) {
            return Err(StoreError::HashNotFound(commit.hash().to_string()));
        }
        state.refs.insert(remote.path(), commit.hash());
        Ok(())
    }

    /// The working root currently recorded for a working set, if any.
    pub fn working_root(&self, r: &WorkingSetRef) -> StoreResult<Option<RootHash>> {
        let state = read_lock(&self.state)?;
        Ok(state.working_sets.get(&r.path()).copied())
    }

    /// Number of commits in the store.
    pub fn commit_count(&self) -> StoreResult<usize> {
        let state = read_lock(&self.state)?;
        Ok(state.commits.len())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionedStore for MemoryStore {
    fn resolve(&self, spec: &CommitSpec, head: Option<&HeadRef>) -> StoreResult<Commit> {
        let state = read_lock(&self.state)?;

        match spec {
            CommitSpec::Head => {
                let head = head.ok_or_else(|| StoreError::NotACommit("HEAD".to_string()))?;
                state.commit_for_ref(&head.path())
            }
            CommitSpec::Ref(name) => {
                // Try the local branch namespace first, then remote-tracking.
                let branch_path = BranchRef::new(name.clone()).path();
                match state.commit_for_ref(&branch_path) {
                    Err(StoreError::BranchNotFound(_)) => {
                        let remote = RemoteRef::from_path_str(name)
                            .map_err(|_| StoreError::BranchNotFound(name.clone()))?;
                        state
                            .commit_for_ref(&remote.path())
                            .map_err(|_| StoreError::BranchNotFound(name.clone()))
                    }
                    other => other,
                }
            }
            CommitSpec::Hash(hash) => state.commit_for_hash(*hash),
        }
    }

    fn has_ref(&self, r: &HeadRef) -> StoreResult<bool> {
        let state = read_lock(&self.state)?;
        Ok(state.refs.contains_key(&r.path()))
    }

    fn new_branch_at_commit(&self, branch: &BranchRef, commit: &Commit) -> StoreResult<()> {
        if !is_valid_branch_name(branch.name()) {
            return Err(StoreError::InvalidBranchName(branch.name().to_string()));
        }

        let mut state = write_lock(&self.state)?;
        if !state.commits.contains_key(&commit.hash()) {
            return Err(StoreError::HashNotFound(commit.hash().to_string()));
        }

        state.refs.insert(branch.path(), commit.hash());
        // A fresh branch starts with a working set at the commit root.
        state.working_sets.insert(WorkingSetRef::for_branch(branch).path(), commit.root());

        debug!(branch = %branch, commit = %commit.hash(), "created branch");
        Ok(())
    }

    fn delete_ref(&self, r: &HeadRef) -> StoreResult<()> {
        let mut state = write_lock(&self.state)?;
        let path = r.path();
        if state.refs.remove(&path).is_none() {
            return Err(StoreError::BranchNotFound(path));
        }
        debug!(r = %r, "deleted ref");
        Ok(())
    }

    fn copy_working_set(
        &self,
        from: &WorkingSetRef,
        to: &WorkingSetRef,
        force: bool,
    ) -> StoreResult<()> {
        let mut state = write_lock(&self.state)?;

        let root = *state
            .working_sets
            .get(&from.path())
            .ok_or_else(|| StoreError::WorkingSetNotFound(from.path()))?;

        if !force && state.working_sets.contains_key(&to.path()) {
            return Err(StoreError::AlreadyExists(to.path()));
        }

        state.working_sets.insert(to.path(), root);
        Ok(())
    }

    fn delete_working_set(&self, r: &WorkingSetRef) -> StoreResult<()> {
        let mut state = write_lock(&self.state)?;
        state.working_sets.remove(&r.path());
        Ok(())
    }

    fn can_fast_forward(&self, from: &Commit, to: &Commit) -> StoreResult<bool> {
        if from.hash() == to.hash() {
            return Err(StoreError::UpToDate);
        }

        let state = read_lock(&self.state)?;
        if state.is_ancestor(from.hash(), to.hash()) {
            return Ok(true);
        }
        if state.is_ancestor(to.hash(), from.hash()) {
            return Err(StoreError::IsAhead);
        }
        Ok(false)
    }
}

fn read_lock(lock: &RwLock<StoreState>) -> StoreResult<std::sync::RwLockReadGuard<'_, StoreState>> {
    lock.read().map_err(|e| StoreError::LockPoisoned(e.to_string()))
}

fn write_lock(
    lock: &RwLock<StoreState>,
) -> StoreResult<std::sync::RwLockWriteGuard<'_, StoreState>> {
    lock.write().map_err(|e| StoreError::LockPoisoned(e.to_string()))
}

/// Derive a commit hash from the tree root, parent hashes, and a
/// store-local sequence number.
fn commit_hash(root: RootHash, parents: &[RootHash], seq: u64) -> RootHash {
    let mut hasher = DefaultHasher::new();
    root.as_bytes().hash(&mut hasher);
    for parent in parents {
        parent.as_bytes().hash(&mut hasher);
    }
    seq.hash(&mut hasher);
    let h1 = hasher.finish();

    h1.hash(&mut hasher);
    let h2 = hasher.finish();

    h2.hash(&mut hasher);
    let h3 = hasher.finish();

    let mut bytes = [0u8; RootHash::LEN];
    bytes[..8].copy_from_slice(&h1.to_be_bytes());
    bytes[8..16].copy_from_slice(&h2.to_be_bytes());
    bytes[16..].copy_from_slice(&h3.to_be_bytes()[..4]);
    RootHash::new(bytes)
}
