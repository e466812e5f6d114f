//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "classify a target" or "map a project".

pub mod file_classifier;
pub mod project_mapper;
pub mod target_mapper;

pub use file_classifier::{Classification, ClassificationOptions, ClassifyScope, FileClassifier};
pub use project_mapper::ProjectMapper;
pub use target_mapper::TargetMapper;
