//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// The raw project was dropped while targets were still being mapped.
    #[error("The project objects instance has been released before mapping completed.")]
    ProjectObjectsReleased,

    /// A synchronized group root could not be enumerated.
    #[error("Synchronized group at {path} could not be read: {reason}")]
    SynchronizedGroupUnreadable { path: PathBuf, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A single target could not be normalized.
    #[error("Mapping target '{target}' failed: {reason}")]
    TargetMappingFailed { target: String, reason: String },

    /// The raw project description is malformed.
    #[error("Invalid project description {path}: {reason}")]
    InvalidProjectDescription { path: PathBuf, reason: String },

    /// The raw project description does not exist.
    #[error("Project description not found: {path}")]
    ProjectNotFound { path: PathBuf },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ProjectObjectsReleased => vec![
                "Keep the project loaded until mapping has finished".into(),
                "This is not retried; re-run the whole mapping pass".into(),
            ],
            Self::SynchronizedGroupUnreadable { path, .. } => vec![
                format!("Failed to list: {}", path.display()),
                "Check that the directory exists and is readable".into(),
                "Other targets are still mapped".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have read permissions".into(),
            ],
            Self::InvalidProjectDescription { path, .. } => vec![
                format!("Could not decode: {}", path.display()),
                "Project descriptions are JSON (.json) or TOML (.toml)".into(),
            ],
            Self::ProjectNotFound { path } => vec![
                format!("No file at: {}", path.display()),
                "Check the path passed to `xcgraph map`".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ProjectObjectsReleased => ErrorCategory::Structural,
            Self::SynchronizedGroupUnreadable { .. } | Self::FilesystemError { .. } => {
                ErrorCategory::Io
            }
            Self::TargetMappingFailed { .. } | Self::InvalidProjectDescription { .. } => {
                ErrorCategory::Validation
            }
            Self::ProjectNotFound { .. } => ErrorCategory::NotFound,
        }
    }
}
