//! Versioned store traits and abstractions.

mod commit;
mod error;
mod traits;

pub use commit::Commit;
pub use error::{StoreError, StoreResult};
pub use traits::VersionedStore;

pub(crate) use traits::is_valid_branch_name;
