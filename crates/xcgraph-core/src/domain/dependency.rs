//! Typed dependency edges of a target.
//!
//! `TargetDependency` is a closed set of variants with value semantics: two
//! dependencies are equal iff every associated field is equal. Nothing here
//! validates its input; a `Package` with a nonsensical product name is the
//! caller's problem.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{LinkingStatus, PackageType, PlatformCondition};

// ── XCFrameworkSignature ──────────────────────────────────────────────────────

/// Expected code signature of a binary framework bundle.
///
/// Descriptive metadata only; nothing in this crate verifies it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum XCFrameworkSignature {
    Unsigned,
    SignedWithAppleCertificate {
        team_identifier: String,
        team_name: String,
    },
    SelfSigned {
        fingerprint: String,
    },
}

impl XCFrameworkSignature {
    /// Stable string form used by consumers for cache keys and display.
    ///
    /// The format is part of the external interface and must not change.
    pub fn signature_string(&self) -> Option<String> {
        match self {
            Self::Unsigned => None,
            Self::SelfSigned { fingerprint } => Some(format!("SelfSigned:{fingerprint}")),
            Self::SignedWithAppleCertificate {
                team_identifier,
                team_name,
            } => Some(format!(
                "AppleDeveloperProgram:{team_identifier}:{team_name}"
            )),
        }
    }
}

// ── TargetDependency ──────────────────────────────────────────────────────────

/// A dependency edge from a target to something it builds or links against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TargetDependency {
    /// Another target in the same project.
    Target {
        name: String,
        status: LinkingStatus,
        condition: Option<PlatformCondition>,
    },
    /// A target that lives in another project.
    Project {
        target: String,
        path: PathBuf,
        status: LinkingStatus,
        condition: Option<PlatformCondition>,
    },
    /// A precompiled `.framework` bundle.
    Framework {
        path: PathBuf,
        status: LinkingStatus,
        condition: Option<PlatformCondition>,
    },
    /// A precompiled `.xcframework` bundle.
    Xcframework {
        path: PathBuf,
        expected_signature: Option<XCFrameworkSignature>,
        status: LinkingStatus,
        condition: Option<PlatformCondition>,
    },
    /// A precompiled static or dynamic library.
    Library {
        path: PathBuf,
        public_headers: PathBuf,
        swift_module_map: Option<PathBuf>,
        condition: Option<PlatformCondition>,
    },
    /// A product vended by a package.
    Package {
        product: String,
        package_type: PackageType,
        condition: Option<PlatformCondition>,
    },
    /// A system framework or library shipped with the SDK.
    Sdk {
        name: String,
        status: LinkingStatus,
        condition: Option<PlatformCondition>,
    },
    /// The platform test framework.
    Xctest,
}

impl TargetDependency {
    pub fn target(name: impl Into<String>) -> Self {
        Self::Target {
            name: name.into(),
            status: LinkingStatus::Required,
            condition: None,
        }
    }

    pub fn project(target: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Project {
            target: target.into(),
            path: path.into(),
            status: LinkingStatus::Required,
            condition: None,
        }
    }

    pub fn framework(path: impl Into<PathBuf>, status: LinkingStatus) -> Self {
        Self::Framework {
            path: path.into(),
            status,
            condition: None,
        }
    }

    pub fn xcframework(path: impl Into<PathBuf>, status: LinkingStatus) -> Self {
        Self::Xcframework {
            path: path.into(),
            expected_signature: None,
            status,
            condition: None,
        }
    }

    /// A library whose public headers sit next to the binary.
    pub fn library(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let public_headers = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));
        Self::Library {
            path,
            public_headers,
            swift_module_map: None,
            condition: None,
        }
    }

    pub fn package(product: impl Into<String>, package_type: PackageType) -> Self {
        Self::Package {
            product: product.into(),
            package_type,
            condition: None,
        }
    }

    pub fn sdk(name: impl Into<String>, status: LinkingStatus) -> Self {
        Self::Sdk {
            name: name.into(),
            status,
            condition: None,
        }
    }

    /// The platform condition attached to this dependency, if any.
    pub fn condition(&self) -> Option<&PlatformCondition> {
        match self {
            Self::Target { condition, .. }
            | Self::Project { condition, .. }
            | Self::Framework { condition, .. }
            | Self::Xcframework { condition, .. }
            | Self::Library { condition, .. }
            | Self::Package { condition, .. }
            | Self::Sdk { condition, .. } => condition.as_ref(),
            Self::Xctest => None,
        }
    }

    /// Linking status, for the variants that carry one.
    pub fn status(&self) -> Option<LinkingStatus> {
        match self {
            Self::Target { status, .. }
            | Self::Project { status, .. }
            | Self::Framework { status, .. }
            | Self::Xcframework { status, .. }
            | Self::Sdk { status, .. } => Some(*status),
            Self::Library { .. } | Self::Package { .. } | Self::Xctest => None,
        }
    }

    /// Copy of this dependency with only the condition replaced.
    ///
    /// `Xctest` carries no condition and is returned unchanged.
    pub fn with_condition(&self, condition: Option<PlatformCondition>) -> Self {
        match self {
            Self::Target { name, status, .. } => Self::Target {
                name: name.clone(),
                status: *status,
                condition,
            },
            Self::Project {
                target,
                path,
                status,
                ..
            } => Self::Project {
                target: target.clone(),
                path: path.clone(),
                status: *status,
                condition,
            },
            Self::Framework { path, status, .. } => Self::Framework {
                path: path.clone(),
                status: *status,
                condition,
            },
            Self::Xcframework {
                path,
                expected_signature,
                status,
                ..
            } => Self::Xcframework {
                path: path.clone(),
                expected_signature: expected_signature.clone(),
                status: *status,
                condition,
            },
            Self::Library {
                path,
                public_headers,
                swift_module_map,
                ..
            } => Self::Library {
                path: path.clone(),
                public_headers: public_headers.clone(),
                swift_module_map: swift_module_map.clone(),
                condition,
            },
            Self::Package {
                product,
                package_type,
                ..
            } => Self::Package {
                product: product.clone(),
                package_type: *package_type,
                condition,
            },
            Self::Sdk { name, status, .. } => Self::Sdk {
                name: name.clone(),
                status: *status,
                condition,
            },
            Self::Xctest => Self::Xctest,
        }
    }
}

impl fmt::Display for TargetDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Target { name, .. } => write!(f, "target {name}")?,
            Self::Project { target, path, .. } => {
                write!(f, "project {target} ({})", path.display())?
            }
            Self::Framework { path, .. } => write!(f, "framework {}", path.display())?,
            Self::Xcframework { path, .. } => write!(f, "xcframework {}", path.display())?,
            Self::Library { path, .. } => write!(f, "library {}", path.display())?,
            Self::Package {
                product,
                package_type,
                ..
            } => write!(f, "package {product} ({package_type})")?,
            Self::Sdk { name, .. } => write!(f, "sdk {name}")?,
            Self::Xctest => f.write_str("xctest")?,
        }
        if self.status() == Some(LinkingStatus::Optional) {
            f.write_str(" [optional]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::PlatformFilter;

    fn ios() -> Option<PlatformCondition> {
        PlatformCondition::when([PlatformFilter::Ios])
    }

    #[test]
    fn display_names_kind_and_optionality() {
        assert_eq!(
            TargetDependency::framework("/p/Optional.framework", LinkingStatus::Optional)
                .to_string(),
            "framework /p/Optional.framework [optional]"
        );
        assert_eq!(TargetDependency::target("Core").to_string(), "target Core");
        assert_eq!(TargetDependency::Xctest.to_string(), "xctest");
    }

    #[test]
    fn signature_strings_are_stable() {
        assert_eq!(XCFrameworkSignature::Unsigned.signature_string(), None);
        assert_eq!(
            XCFrameworkSignature::SelfSigned {
                fingerprint: "abc".into()
            }
            .signature_string()
            .as_deref(),
            Some("SelfSigned:abc")
        );
        assert_eq!(
            XCFrameworkSignature::SignedWithAppleCertificate {
                team_identifier: "T1".into(),
                team_name: "Acme".into(),
            }
            .signature_string()
            .as_deref(),
            Some("AppleDeveloperProgram:T1:Acme")
        );
    }

    #[test]
    fn with_condition_preserves_every_other_field() {
        let deps = vec![
            TargetDependency::Target {
                name: "Core".into(),
                status: LinkingStatus::Optional,
                condition: None,
            },
            TargetDependency::Project {
                target: "Shared".into(),
                path: "/work/Shared".into(),
                status: LinkingStatus::None,
                condition: None,
            },
            TargetDependency::framework("/work/A.framework", LinkingStatus::Optional),
            TargetDependency::Xcframework {
                path: "/work/B.xcframework".into(),
                expected_signature: Some(XCFrameworkSignature::SelfSigned {
                    fingerprint: "ff".into(),
                }),
                status: LinkingStatus::Required,
                condition: None,
            },
            TargetDependency::Library {
                path: "/work/lib/libC.a".into(),
                public_headers: "/work/include".into(),
                swift_module_map: Some("/work/lib/C.swiftmodule".into()),
                condition: None,
            },
            TargetDependency::package("Logging", PackageType::Macro),
            TargetDependency::sdk("libz.tbd", LinkingStatus::None),
        ];

        for dep in deps {
            let conditioned = dep.with_condition(ios());
            assert_eq!(conditioned.condition(), ios().as_ref());
            assert_eq!(conditioned.status(), dep.status());
            // Stripping the condition again must give back the original value.
            assert_eq!(conditioned.with_condition(None), dep);
        }
    }

    #[test]
    fn xctest_ignores_conditions() {
        let dep = TargetDependency::Xctest.with_condition(ios());
        assert_eq!(dep, TargetDependency::Xctest);
        assert!(dep.condition().is_none());
    }

    #[test]
    fn equality_is_structural() {
        let a = TargetDependency::framework("/a/F.framework", LinkingStatus::Required);
        let b = TargetDependency::framework("/a/F.framework", LinkingStatus::Required);
        let c = TargetDependency::framework("/a/F.framework", LinkingStatus::Optional);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn library_headers_default_to_containing_directory() {
        let dep = TargetDependency::library("/vendor/lib/libFoo.a");
        match dep {
            TargetDependency::Library { public_headers, .. } => {
                assert_eq!(public_headers, PathBuf::from("/vendor/lib"));
            }
            other => panic!("expected library, got {other:?}"),
        }
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json =
            serde_json::to_value(TargetDependency::sdk("UIKit.framework", LinkingStatus::Required))
                .unwrap();
        assert_eq!(json["kind"], "sdk");
        assert_eq!(json["status"], "required");
    }
}
