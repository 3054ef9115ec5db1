//! Response cache implementations.

pub mod memory;

pub use memory::MemoryResponseCache;
