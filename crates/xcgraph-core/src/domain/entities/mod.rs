pub mod common;
pub mod project_graph;
pub mod raw;
pub mod target;

pub use crate::domain::DomainError;
pub use project_graph::{ProjectGraph, TargetFailure};
pub use raw::{RawProject, RawTarget};
pub use target::Target;
