// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (mapping failures are recorded per target and reported later)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Parsing Errors
    // ========================================================================
    #[error("Unknown product type: {0}")]
    UnknownProductType(String),

    #[error("Unknown platform filter: {0}")]
    UnknownPlatformFilter(String),

    #[error("Unknown package type: {0}")]
    UnknownPackageType(String),

    #[error("Unknown resource synthesizer parser: {0}")]
    UnknownParser(String),

    // ========================================================================
    // Path Errors
    // ========================================================================
    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Expected an absolute path: {path}")]
    RelativePathNotAllowed { path: String },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Path '{path}' is classified more than once: {reason}")]
    OverlappingMembership { path: String, reason: String },

    #[error("Conflicting exceptions for '{path}': {reason}")]
    ConflictingExceptions { path: String, reason: String },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Target name '{name}' is mapped more than once")]
    DuplicateTargetName { name: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownProductType(identifier) => vec![
                format!("'{}' is not a recognised product type", identifier),
                "Product types look like: com.apple.product-type.application".into(),
            ],
            Self::UnknownPlatformFilter(filter) => vec![
                format!("'{}' is not a recognised platform filter", filter),
                "Known filters: ios, macos, maccatalyst, tvos, watchos, driverkit, xros".into(),
            ],
            Self::UnknownPackageType(kind) => vec![
                format!("'{}' is not a recognised package product type", kind),
                "Known types: runtime, runtime-embedded, plugin, macro".into(),
            ],
            Self::ConflictingExceptions { path, .. } => vec![
                format!("Several exception sets disagree about '{}'", path),
                "Remove the duplicate entry from the synchronized group exceptions".into(),
                "Or disable classification.strict_exceptions to apply the tie-break rules".into(),
            ],
            Self::DuplicateTargetName { name } => vec![
                format!("Two targets in the project are named '{}'", name),
                "Rename one of them in the project description".into(),
            ],
            Self::OverlappingMembership { path, .. } => vec![
                format!("'{}' was assigned to more than one role", path),
                "This is a bug in the classifier, please report it".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownProductType(_)
            | Self::UnknownPlatformFilter(_)
            | Self::UnknownPackageType(_)
            | Self::UnknownParser(_)
            | Self::AbsolutePathNotAllowed { .. }
            | Self::RelativePathNotAllowed { .. }
            | Self::ConflictingExceptions { .. } => ErrorCategory::Validation,
            Self::MissingRequiredField { .. } | Self::DuplicateTargetName { .. } => {
                ErrorCategory::Validation
            }
            Self::OverlappingMembership { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Internal,
}
