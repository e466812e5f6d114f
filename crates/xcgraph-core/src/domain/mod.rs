//! Core domain layer for xcgraph.
//!
//! Pure data and rules: the dependency and resource synthesizer models, the
//! raw project description, extension classification, exception folding,
//! setting expansion and the normalized `Target`. Directory listing and
//! orchestration live in the application layer behind ports.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No I/O**: No filesystem, network, or external calls
//! - **No logging**: `tracing` is only used by application services
//! - **Immutable entities**: All domain objects are Clone + PartialEq

// Public API - what the world sees
pub mod classification;
pub mod dependency;
pub mod entities;
pub mod error;
pub mod exceptions;
pub mod resource_synthesizer;
pub mod settings;
pub mod value_objects;

mod validation;

// Re-exports for convenience
pub use classification::{FileRole, UnlistedHeaders};
pub use dependency::{TargetDependency, XCFrameworkSignature};
pub use entities::{
    common::{RelativePath, resolve_path},
    project_graph::{ProjectGraph, TargetFailure},
    raw::{
        BuildPhaseKind, BuildSetting, ExceptionSet, RawBuildConfiguration, RawBuildFile,
        RawBuildPhase, RawDependency, RawProject, RawTarget, RawTargetKind, SourceTree,
        SynchronizedRootGroup,
    },
    target::{
        Entitlements, Headers, InfoPlist, SourceFile, Target, TargetBuilder, UNKNOWN_BUNDLE_ID,
    },
};
pub use error::{DomainError, ErrorCategory};
pub use exceptions::{ExceptionOverrides, PathOverride};
pub use resource_synthesizer::{ParserKind, ParserOption, ResourceSynthesizer, SynthesizerTemplate};
pub use settings::{ResolvedSetting, SettingsResolver};
pub use value_objects::{
    BuildConfiguration, BuildConfigurationVariant, HeaderVisibility, LinkingStatus, PackageType,
    PlatformCondition, PlatformFilter, Product,
};

pub use validation::DomainValidator;

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    // ========================================================================
    // Value Object Tests
    // ========================================================================

    #[test]
    fn product_identifiers_map_to_products() {
        assert_eq!(
            Product::from_identifier("com.apple.product-type.application").unwrap(),
            Product::App
        );
        assert_eq!(
            Product::from_identifier("com.apple.product-type.bundle.unit-test").unwrap(),
            Product::UnitTests
        );
        assert!(matches!(
            Product::from_identifier("com.example.custom"),
            Err(DomainError::UnknownProductType(_))
        ));
    }

    #[test]
    fn linking_status_from_attributes() {
        assert_eq!(LinkingStatus::from_attributes(&["Weak"]), LinkingStatus::Optional);
        assert_eq!(
            LinkingStatus::from_attributes(&["CodeSignOnCopy"]),
            LinkingStatus::Required
        );
        assert_eq!(
            LinkingStatus::from_attributes::<&str>(&[]),
            LinkingStatus::Required
        );
    }

    #[test]
    fn platform_filters_parse_xcode_spellings() {
        assert_eq!(PlatformFilter::from_str("maccatalyst").unwrap(), PlatformFilter::Catalyst);
        assert_eq!(PlatformFilter::from_str("xros").unwrap(), PlatformFilter::Visionos);
        assert!(PlatformFilter::from_str("amiga").is_err());
    }

    #[test]
    fn empty_platform_condition_is_absent() {
        assert_eq!(PlatformCondition::parse::<&str>(&[]).unwrap(), None);
        let condition = PlatformCondition::parse(&["ios", "macos"]).unwrap().unwrap();
        assert_eq!(condition.platform_filters().len(), 2);
    }

    #[test]
    fn package_type_parses_known_tags() {
        assert_eq!(PackageType::from_str("macro").unwrap(), PackageType::Macro);
        assert_eq!(
            PackageType::from_str("runtime-embedded").unwrap(),
            PackageType::RuntimeEmbedded
        );
        assert!(PackageType::from_str("library").is_err());
    }

    #[test]
    fn configuration_variant_follows_name() {
        assert_eq!(
            BuildConfiguration::from_name("Debug-Staging").variant,
            BuildConfigurationVariant::Debug
        );
        assert_eq!(
            BuildConfiguration::from_name("AppStore").variant,
            BuildConfigurationVariant::Release
        );
    }

    #[test]
    fn header_visibility_from_build_file_attributes() {
        assert_eq!(
            HeaderVisibility::from_attributes(&["Public"]),
            Some(HeaderVisibility::Public)
        );
        assert_eq!(HeaderVisibility::from_attributes(&["Weak"]), None);
    }

    // ========================================================================
    // Validator Tests
    // ========================================================================

    #[test]
    fn graph_rejects_duplicate_target_names() {
        let target = Target::builder("App").product(Product::App).build().unwrap();
        let graph = ProjectGraph {
            path: "/p/App.xcodeproj".into(),
            source_root: "/p".into(),
            targets: vec![target.clone(), target],
            failures: vec![],
            resource_synthesizers: vec![],
        };
        assert_eq!(
            DomainValidator::validate_graph(&graph),
            Err(DomainError::DuplicateTargetName { name: "App".into() })
        );
    }

    #[test]
    fn error_suggestions_are_actionable() {
        let err = DomainError::UnknownPlatformFilter("amiga".into());
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(err.suggestions().iter().any(|s| s.contains("amiga")));
    }
}
