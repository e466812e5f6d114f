//! Target Mapper - turns one raw target into a normalized [`Target`].
//!
//! Mapping is partial: aggregate and legacy targets, and native targets
//! without a recognised product type, produce `None` rather than an error.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        handle::ProjectHandle,
        services::file_classifier::{ClassifyScope, FileClassifier},
    },
    domain::{
        Entitlements, InfoPlist, LinkingStatus, PackageType,
        PlatformCondition, Product, RawDependency, RawTarget, RawTargetKind, SettingsResolver,
        Target, TargetDependency, value_objects::BuildConfiguration, resolve_path,
    },
    error::XcGraphResult,
};

pub const BUNDLE_IDENTIFIER_SETTING: &str = "PRODUCT_BUNDLE_IDENTIFIER";
pub const PRODUCT_NAME_SETTING: &str = "PRODUCT_NAME";
pub const INFOPLIST_SETTING: &str = "INFOPLIST_FILE";
pub const GENERATE_INFOPLIST_SETTING: &str = "GENERATE_INFOPLIST_FILE";
pub const ENTITLEMENTS_SETTING: &str = "CODE_SIGN_ENTITLEMENTS";

/// Maps raw targets using a [`FileClassifier`] for membership.
pub struct TargetMapper {
    classifier: FileClassifier,
}

impl TargetMapper {
    pub fn new(classifier: FileClassifier) -> Self {
        Self { classifier }
    }

    /// Map a single raw target.
    ///
    /// Fails with `ProjectObjectsReleased` when `project` no longer points at
    /// a live project; that error is structural and never retried. Any other
    /// failure is reported as `TargetMappingFailed` for this target.
    #[instrument(skip_all, fields(target = %target.name))]
    pub fn map(&self, target: &RawTarget, project: &ProjectHandle) -> XcGraphResult<Option<Target>> {
        self.map_target(target, project).map_err(|e| {
            if e.is_fatal() {
                return e;
            }
            ApplicationError::TargetMappingFailed {
                target: target.name.clone(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn map_target(&self, target: &RawTarget, project: &ProjectHandle) -> XcGraphResult<Option<Target>> {
        let project = project.upgrade()?;

        let Some(product) = buildable_product(target) else {
            return Ok(None);
        };

        let source_root = project.source_root.as_path();
        let settings = SettingsResolver::new(target, source_root);

        let product_name = settings
            .value(PRODUCT_NAME_SETTING)
            .or_else(|| target.product_name.clone())
            .unwrap_or_else(|| target.name.clone());
        let bundle_id = settings
            .value(BUNDLE_IDENTIFIER_SETTING)
            .filter(|id| !id.is_empty());
        if bundle_id.is_none() {
            debug!("No bundle identifier, using sentinel");
        }

        let info_plist = resolve_info_plist(&settings, source_root);
        let entitlements = resolve_entitlements(&settings, source_root);

        let ignored: Vec<PathBuf> = info_plist
            .as_ref()
            .and_then(InfoPlist::path)
            .map(Path::to_path_buf)
            .into_iter()
            .collect();
        let scope = ClassifyScope::new(source_root)
            .with_packages(&project.packages)
            .with_ignored(&ignored);
        let classification = self.classifier.classify(target, &scope)?;

        let explicit = target
            .dependencies
            .iter()
            .map(|d| map_raw_dependency(d, source_root))
            .collect::<XcGraphResult<Vec<_>>>()?;

        let mut builder = Target::builder(&target.name)
            .product(product)
            .product_name(product_name)
            .bundle_id(bundle_id)
            .sources(classification.sources)
            .resources(classification.resources)
            .headers(classification.headers)
            .dependencies(classification.dependencies)
            .dependencies(explicit)
            .info_plist(info_plist)
            .entitlements(entitlements)
            .build_configurations(
                target
                    .configurations
                    .iter()
                    .map(|c| BuildConfiguration::from_name(&c.name)),
            )
            .synchronized_roots(classification.synchronized_roots);
        if let Some(identifier) = &target.product_type {
            builder = builder.product_type_identifier(identifier);
        }

        Ok(Some(builder.build()?))
    }
}

/// The product of a target that has buildable semantics.
fn buildable_product(target: &RawTarget) -> Option<Product> {
    if target.kind != RawTargetKind::Native {
        debug!(kind = ?target.kind, "Target is not buildable, skipping");
        return None;
    }

    let Some(identifier) = target.product_type.as_deref() else {
        warn!("Native target has no product type, skipping");
        return None;
    };

    match Product::from_identifier(identifier) {
        Ok(product) => Some(product),
        Err(e) => {
            warn!(error = %e, "Skipping target");
            None
        }
    }
}

fn resolve_info_plist(settings: &SettingsResolver<'_>, source_root: &Path) -> Option<InfoPlist> {
    if let Some(setting) = settings
        .lookup(INFOPLIST_SETTING)
        .filter(|s| !s.value.is_empty())
    {
        return Some(InfoPlist::File {
            path: resolve_path(source_root, &setting.value),
            configuration: setting.configuration,
        });
    }

    if settings.is_enabled(GENERATE_INFOPLIST_SETTING) {
        let configuration = settings.lookup(GENERATE_INFOPLIST_SETTING)?.configuration;
        return Some(InfoPlist::Generated { configuration });
    }

    None
}

fn resolve_entitlements(settings: &SettingsResolver<'_>, source_root: &Path) -> Option<Entitlements> {
    settings
        .lookup(ENTITLEMENTS_SETTING)
        .filter(|s| !s.value.is_empty())
        .map(|setting| Entitlements::File {
            path: resolve_path(source_root, &setting.value),
            configuration: setting.configuration,
        })
}

fn map_raw_dependency(dependency: &RawDependency, source_root: &Path) -> XcGraphResult<TargetDependency> {
    let mapped = match dependency {
        RawDependency::Target {
            name,
            platform_filters,
        } => TargetDependency::target(name)
            .with_condition(PlatformCondition::parse(platform_filters)?),
        RawDependency::Project {
            target,
            path,
            platform_filters,
        } => TargetDependency::project(target, resolve_path(source_root, path))
            .with_condition(PlatformCondition::parse(platform_filters)?),
        RawDependency::Package {
            product,
            package_type,
            platform_filters,
        } => {
            let package_type = match package_type {
                Some(tag) => tag.parse::<PackageType>()?,
                None => PackageType::default(),
            };
            TargetDependency::package(product, package_type)
                .with_condition(PlatformCondition::parse(platform_filters)?)
        }
        RawDependency::Sdk { name, optional } => {
            let status = if *optional {
                LinkingStatus::Optional
            } else {
                LinkingStatus::Required
            };
            TargetDependency::sdk(name, status)
        }
    };
    Ok(mapped)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::{
        ApplicationError,
        ports::MockDirectoryLister,
        services::file_classifier::ClassificationOptions,
    };
    use crate::domain::{RawBuildConfiguration, RawProject};
    use crate::error::XcGraphError;

    fn mapper() -> TargetMapper {
        let mut lister = MockDirectoryLister::new();
        lister.expect_list().returning(|_| Ok(vec![]));
        TargetMapper::new(FileClassifier::new(
            Box::new(lister),
            ClassificationOptions::default(),
        ))
    }

    fn project() -> Arc<RawProject> {
        Arc::new(RawProject {
            path: "/work/App.xcodeproj".into(),
            source_root: "/work".into(),
            ..RawProject::default()
        })
    }

    fn app(settings: Vec<(&str, &str)>) -> RawTarget {
        RawTarget {
            name: "App".into(),
            product_type: Some("com.apple.product-type.application".into()),
            configurations: vec![RawBuildConfiguration::new("Debug", settings)],
            ..RawTarget::default()
        }
    }

    #[test]
    fn released_project_is_a_structural_error() {
        let err = mapper()
            .map(&app(vec![]), &ProjectHandle::released())
            .unwrap_err();
        assert_eq!(
            err,
            XcGraphError::Application(ApplicationError::ProjectObjectsReleased)
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn unknown_product_type_yields_none() {
        let p = project();
        let mut target = app(vec![]);
        target.product_type = Some("com.example.custom".into());
        assert_eq!(mapper().map(&target, &ProjectHandle::new(&p)).unwrap(), None);
    }

    #[test]
    fn generated_info_plist_when_no_file_is_named() {
        let p = project();
        let target = app(vec![("GENERATE_INFOPLIST_FILE", "YES")]);
        let mapped = mapper()
            .map(&target, &ProjectHandle::new(&p))
            .unwrap()
            .unwrap();
        assert_eq!(
            mapped.info_plist(),
            Some(&InfoPlist::Generated {
                configuration: BuildConfiguration::from_name("Debug")
            })
        );
    }

    #[test]
    fn product_name_is_expanded() {
        let p = project();
        let target = app(vec![("PRODUCT_NAME", "$(TARGET_NAME)Lite")]);
        let mapped = mapper()
            .map(&target, &ProjectHandle::new(&p))
            .unwrap()
            .unwrap();
        assert_eq!(mapped.product_name(), "AppLite");
    }

    #[test]
    fn raw_dependencies_follow_classified_ones() {
        let p = project();
        let mut target = app(vec![]);
        target.dependencies = vec![
            RawDependency::Target {
                name: "Core".into(),
                platform_filters: vec!["ios".into()],
            },
            RawDependency::Package {
                product: "Logging".into(),
                package_type: None,
                platform_filters: vec![],
            },
            RawDependency::Project {
                target: "Shared".into(),
                path: "../Shared/Shared.xcodeproj".into(),
                platform_filters: vec![],
            },
            RawDependency::Sdk {
                name: "libz.tbd".into(),
                optional: true,
            },
        ];

        let mapped = mapper()
            .map(&target, &ProjectHandle::new(&p))
            .unwrap()
            .unwrap();
        assert_eq!(
            mapped.dependencies(),
            &[
                TargetDependency::target("Core").with_condition(PlatformCondition::when([
                    crate::domain::PlatformFilter::Ios
                ])),
                TargetDependency::package("Logging", PackageType::Runtime),
                TargetDependency::project("Shared", "/Shared/Shared.xcodeproj"),
                TargetDependency::sdk("libz.tbd", LinkingStatus::Optional),
            ]
        );
    }

    #[test]
    fn unknown_package_type_fails_the_target() {
        let p = project();
        let mut target = app(vec![]);
        target.dependencies = vec![RawDependency::Package {
            product: "Logging".into(),
            package_type: Some("library".into()),
            platform_filters: vec![],
        }];
        let err = mapper().map(&target, &ProjectHandle::new(&p)).unwrap_err();
        assert!(!err.is_fatal());
        match err {
            XcGraphError::Application(ApplicationError::TargetMappingFailed { target, reason }) => {
                assert_eq!(target, "App");
                assert!(reason.contains("library"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
