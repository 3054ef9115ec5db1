//! Session artifact stores.
//!
//! Both stores are last-write-wins: concurrent writers for the same session
//! may clobber each other.

pub mod fs;
pub mod memory;

pub use fs::FsSiteStore;
pub use memory::MemorySiteStore;
