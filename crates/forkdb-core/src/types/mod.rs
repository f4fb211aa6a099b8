//! Value types used throughout `ForkDB`.

mod hash;
mod refs;
mod spec;


pub use hash::{DataCacheKey, RootHash};
pub use refs::{BranchRef, HeadRef, RemoteRef, WorkingSetRef};
pub use spec::CommitSpec;
