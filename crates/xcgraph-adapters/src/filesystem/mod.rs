//! Directory lister adapters.

mod local;
mod memory;

pub use local::LocalDirectoryLister;
pub use memory::MemoryDirectoryLister;
