//! Refs addressing branches, remote-tracking branches, and working sets.
//!
//! A ref is a stable name for a moving commit. Branch refs live under
//! `refs/heads/`, remote-tracking refs under `refs/remotes/`, and each
//! branch's mutable working set under `workingSets/heads/`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A local branch ref.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchRef(String);

impl BranchRef {
    /// Create a branch ref for the named branch.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The bare branch name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// The fully qualified ref path.
    #[must_use]
    pub fn path(&self) -> String {
        format!("refs/heads/{}", self.0)
    }
}

impl fmt::Display for BranchRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// A remote-tracking branch ref, e.g. `origin/main`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteRef {
    remote: String,
    branch: String,
}

impl RemoteRef {
    /// Parse a remote ref from a `<remote>/<branch>` path string.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRef`] if the string has no `/` separator
    /// or either component is empty.
    pub fn from_path_str(path: &str) -> Result<Self, CoreError> {
        match path.split_once('/') {
            Some((remote, branch)) if !remote.is_empty() && !branch.is_empty() => {
                Ok(Self { remote: remote.to_string(), branch: branch.to_string() })
            }
            _ => Err(CoreError::InvalidRef(path.to_string())),
        }
    }

    /// The remote name.
    #[must_use]
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// The branch name on the remote.
    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// The fully qualified ref path.
    #[must_use]
    pub fn path(&self) -> String {
        format!("refs/remotes/{}/{}", self.remote, self.branch)
    }
}

impl fmt::Display for RemoteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// A ref addressing the working set (staged/working roots) of a branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkingSetRef(String);

impl WorkingSetRef {
    /// The working set ref for the given branch.
    #[must_use]
    pub fn for_branch(branch: &BranchRef) -> Self {
        Self(branch.name().to_string())
    }

    /// The branch name this working set belongs to.
    #[must_use]
    pub fn branch_name(&self) -> &str {
        &self.0
    }

    /// The fully qualified ref path.
    #[must_use]
    pub fn path(&self) -> String {
        format!("workingSets/heads/{}", self.0)
    }
}

impl fmt::Display for WorkingSetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// A ref that can serve as a session head: a local branch or a
/// remote-tracking branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeadRef {
    /// A local branch.
    Branch(BranchRef),
    /// A remote-tracking branch.
    Remote(RemoteRef),
}

impl HeadRef {
    /// The fully qualified ref path, used as the session-var fingerprint
    /// string among other things.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Branch(b) => b.path(),
            Self::Remote(r) => r.path(),
        }
    }

    /// The branch ref, if this head is a local branch.
    #[must_use]
    pub fn as_branch(&self) -> Option<&BranchRef> {
        match self {
            Self::Branch(b) => Some(b),
            Self::Remote(_) => None,
        }
    }
}

impl fmt::Display for HeadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

impl From<BranchRef> for HeadRef {
    fn from(branch: BranchRef) -> Self {
        Self::Branch(branch)
    }
}

impl From<RemoteRef> for HeadRef {
    fn from(remote: RemoteRef) -> Self {
        Self::Remote(remote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_ref_paths() {
        let branch = BranchRef::new("main");
        assert_eq!(branch.name(), "main");
        assert_eq!(branch.path(), "refs/heads/main");
    }

    #[test]
    fn remote_ref_parsing() {
        let remote = RemoteRef::from_path_str("origin/feature/x").expect("valid remote ref");
        assert_eq!(remote.remote(), "origin");
        assert_eq!(remote.branch(), "feature/x");
        assert_eq!(remote.path(), "refs/remotes/origin/feature/x");

        assert!(RemoteRef::from_path_str("nobranch").is_err());
        assert!(RemoteRef::from_path_str("/main").is_err());
        assert!(RemoteRef::from_path_str("origin/").is_err());
    }

    #[test]
    fn working_set_ref_for_branch() {
        let ws = WorkingSetRef::for_branch(&BranchRef::new("main"));
        assert_eq!(ws.branch_name(), "main");
        assert_eq!(ws.path(), "workingSets/heads/main");
    }

    #[test]
    fn head_ref_paths() {
        let head = HeadRef::from(BranchRef::new("main"));
        assert_eq!(head.path(), "refs/heads/main");
        assert!(head.as_branch().is_some());

        let head = HeadRef::from(RemoteRef::from_path_str("origin/main").expect("valid"));
        assert_eq!(head.path(), "refs/remotes/origin/main");
        assert!(head.as_branch().is_none());
    }
}
