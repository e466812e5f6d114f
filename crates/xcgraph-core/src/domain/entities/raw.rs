//! Raw project description.
//!
//! Plain data filled in by whoever parsed the project file. Nothing here is
//! validated beyond what serde enforces; the mapper decides what the values
//! mean.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

/// An already-parsed project.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawProject {
    /// Path of the project bundle itself.
    #[serde(default)]
    pub path: PathBuf,
    /// Directory that relative settings and group paths resolve against.
    #[serde(default)]
    pub source_root: PathBuf,
    #[serde(default)]
    pub targets: Vec<RawTarget>,
    /// Local package directories referenced by the project.
    #[serde(default)]
    pub packages: Vec<PathBuf>,
}

impl RawProject {
    pub fn target(&self, name: &str) -> Option<&RawTarget> {
        self.targets.iter().find(|t| t.name == name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawTargetKind {
    #[default]
    Native,
    Aggregate,
    Legacy,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawTarget {
    pub name: String,
    #[serde(default)]
    pub kind: RawTargetKind,
    /// A `com.apple.product-type.*` identifier.
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub build_phases: Vec<RawBuildPhase>,
    #[serde(default)]
    pub configurations: Vec<RawBuildConfiguration>,
    #[serde(default)]
    pub default_configuration: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<RawDependency>,
    #[serde(default)]
    pub synchronized_groups: Vec<SynchronizedRootGroup>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildPhaseKind {
    Sources,
    Resources,
    Headers,
    Frameworks,
    CopyFiles,
    ShellScript,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawBuildPhase {
    pub kind: BuildPhaseKind,
    #[serde(default)]
    pub files: Vec<RawBuildFile>,
}

/// Where a file reference is rooted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceTree {
    Absolute,
    #[default]
    Group,
    SourceRoot,
    SdkRoot,
    BuiltProductsDir,
    DeveloperDir,
}

/// One entry of a build phase.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawBuildFile {
    /// Absolute path once loaded; relative paths are resolved by the loader.
    pub path: PathBuf,
    #[serde(default)]
    pub source_tree: SourceTree,
    #[serde(default)]
    pub compiler_flags: Option<String>,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub platform_filters: Vec<String>,
}

impl RawBuildFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

/// A build setting value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BuildSetting {
    String(String),
    Array(Vec<String>),
}

impl BuildSetting {
    /// The value as a single string; arrays are joined with spaces.
    pub fn as_string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Array(items) => items.join(" "),
        }
    }
}

impl From<&str> for BuildSetting {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawBuildConfiguration {
    pub name: String,
    #[serde(default)]
    pub build_settings: BTreeMap<String, BuildSetting>,
}

impl RawBuildConfiguration {
    pub fn new<K, V>(name: impl Into<String>, settings: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<BuildSetting>,
    {
        Self {
            name: name.into(),
            build_settings: settings
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A dependency declared on the raw target.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RawDependency {
    Target {
        name: String,
        #[serde(default)]
        platform_filters: Vec<String>,
    },
    Project {
        target: String,
        path: PathBuf,
        #[serde(default)]
        platform_filters: Vec<String>,
    },
    Package {
        product: String,
        #[serde(default)]
        package_type: Option<String>,
        #[serde(default)]
        platform_filters: Vec<String>,
    },
    Sdk {
        name: String,
        #[serde(default)]
        optional: bool,
    },
}

/// A folder whose members are discovered on disk rather than listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SynchronizedRootGroup {
    /// Relative to the source root, or absolute.
    pub path: PathBuf,
    #[serde(default)]
    pub exceptions: Vec<ExceptionSet>,
}

/// Overrides for members of a synchronized group, scoped to one target.
///
/// All keys are relative to the group's root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExceptionSet {
    pub target: String,
    #[serde(default)]
    pub membership_exceptions: Vec<String>,
    #[serde(default)]
    pub public_headers: Vec<String>,
    #[serde(default)]
    pub private_headers: Vec<String>,
    #[serde(default)]
    pub additional_compiler_flags_by_relative_path: BTreeMap<String, String>,
    #[serde(default)]
    pub attributes_by_relative_path: BTreeMap<String, Vec<String>>,
}
