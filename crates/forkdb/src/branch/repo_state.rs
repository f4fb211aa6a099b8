//! Access to the repository's checked-out branch.

use std::sync::RwLock;

use forkdb_core::BranchRef;

use crate::error::{Error, Result};

/// Read access to the repository's checked-out branch.
///
/// Branch mutations consult this to refuse deleting the branch a client
/// has checked out.
pub trait RepoStateReader: Send + Sync {
    /// The currently checked-out branch.
    fn head_ref(&self) -> Result<BranchRef>;
}

/// Write access to the repository's checked-out branch.
pub trait RepoStateWriter: Send + Sync {
    /// Move the checked-out branch pointer.
    fn set_head_ref(&self, branch: BranchRef) -> Result<()>;
}

/// In-memory repository state: a single checked-out branch pointer.
#[derive(Debug)]
pub struct RepoState {
    head: RwLock<BranchRef>,
}

impl RepoState {
    /// Create repository state checked out at the given branch.
    #[must_use]
    pub fn new(head: BranchRef) -> Self {
        Self { head: RwLock::new(head) }
    }
}

impl RepoStateReader for RepoState {
    fn head_ref(&self) -> Result<BranchRef> {
        self.head
            .read()
            .map(|head| head.clone())
            .map_err(|_| Error::state("repository state lock poisoned"))
    }
}

impl RepoStateWriter for RepoState {
    fn set_head_ref(&self, branch: BranchRef) -> Result<()> {
        let mut head =
            self.head.write().map_err(|_| Error::state("repository state lock poisoned"))?;
        *head = branch;
        Ok(())
    }
}
