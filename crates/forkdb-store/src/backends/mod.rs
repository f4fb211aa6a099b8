//! Versioned store backend implementations.

pub mod memory;

pub use memory::MemoryStore;
