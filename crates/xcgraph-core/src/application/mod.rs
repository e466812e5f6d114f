//! Application layer for xcgraph.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (FileClassifier, TargetMapper, ProjectMapper)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All classification rules live in `crate::domain`.

pub mod error;
pub mod handle;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    Classification, ClassificationOptions, ClassifyScope, FileClassifier, ProjectMapper,
    TargetMapper,
};

// Re-export port traits (for adapter implementation)
pub use ports::{DirEntry, DirectoryLister, EntryKind};

pub use error::ApplicationError;
pub use handle::ProjectHandle;
