//! Infrastructure adapters for xcgraph.
//!
//! This crate implements the ports defined in `xcgraph-core::application::ports`
//! and reads raw project descriptions from disk.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod project_loader;

// Re-export commonly used adapters
pub use filesystem::{LocalDirectoryLister, MemoryDirectoryLister};
pub use project_loader::{DescriptionFormat, RawProjectLoader};
