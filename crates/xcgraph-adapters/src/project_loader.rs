//! Filesystem-based raw project loader.
//!
//! Reads an already-parsed project description written as JSON or TOML and
//! turns it into a [`RawProject`] whose paths the mapper can use directly.
//!
//! # TOML format
//!
//! ```toml
//! path        = "App.xcodeproj"   # defaults to the description file
//! source_root = "."               # relative to the description file
//!
//! [[targets]]
//! name         = "App"
//! product_type = "com.apple.product-type.application"
//!
//! [[targets.synchronized_groups]]
//! path = "App"
//!
//! [[targets.synchronized_groups.exceptions]]
//! target                = "App"
//! membership_exceptions = ["Ignored.swift"]
//!
//! [[targets.configurations]]
//! name = "Debug"
//! build_settings = { PRODUCT_BUNDLE_IDENTIFIER = "com.example.app" }
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument};

use xcgraph_core::{
    application::ApplicationError,
    domain::{RawBuildFile, RawProject, SourceTree, resolve_path},
    error::XcGraphResult,
};

/// Serialization format of a project description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionFormat {
    Json,
    Toml,
}

impl DescriptionFormat {
    /// Format implied by the file extension; JSON unless it says `toml`.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// Loads raw project descriptions from disk.
///
/// ```no_run
/// use xcgraph_adapters::RawProjectLoader;
///
/// let project = RawProjectLoader::new().load("project.json")?;
/// println!("Loaded {} targets", project.targets.len());
/// # Ok::<(), xcgraph_core::error::XcGraphError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RawProjectLoader;

impl RawProjectLoader {
    pub fn new() -> Self {
        Self
    }

    /// Read, parse and resolve a description file.
    ///
    /// # Errors
    ///
    /// - [`ApplicationError::ProjectNotFound`] if `path` does not exist.
    /// - [`ApplicationError::FilesystemError`] if it cannot be read.
    /// - [`ApplicationError::InvalidProjectDescription`] if it does not parse.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(&self, path: impl AsRef<Path>) -> XcGraphResult<RawProject> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ApplicationError::ProjectNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        // Relative descriptions resolve against the working directory.
        let absolute = std::path::absolute(path).map_err(|e| ApplicationError::FilesystemError {
            path: path.to_path_buf(),
            reason: format!("Failed to resolve project description path: {}", e),
        })?;
        let path = absolute.as_path();

        let raw = fs::read_to_string(path).map_err(|e| ApplicationError::FilesystemError {
            path: path.to_path_buf(),
            reason: format!("Failed to read project description: {}", e),
        })?;

        let project = self.parse(&raw, DescriptionFormat::from_path(path), path)?;
        debug!(targets = project.targets.len(), "Loaded project description");
        Ok(project)
    }

    /// Parse description text as if it had been read from `origin`.
    pub fn parse(
        &self,
        raw: &str,
        format: DescriptionFormat,
        origin: &Path,
    ) -> XcGraphResult<RawProject> {
        let invalid = |reason: String| ApplicationError::InvalidProjectDescription {
            path: origin.to_path_buf(),
            reason,
        };

        let project: RawProject = match format {
            DescriptionFormat::Json => serde_json::from_str(raw).map_err(|e| invalid(e.to_string()))?,
            DescriptionFormat::Toml => toml::from_str(raw).map_err(|e| invalid(e.to_string()))?,
        };

        let base = origin
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(resolve_project(project, origin, &base))
    }
}

/// Make the paths of a freshly parsed project usable by the mapper.
fn resolve_project(mut project: RawProject, origin: &Path, base: &Path) -> RawProject {
    project.path = if project.path.as_os_str().is_empty() {
        resolve_path(base, origin.file_name().map(PathBuf::from).unwrap_or_default())
    } else {
        resolve_path(base, &project.path)
    };
    project.source_root = resolve_path(base, &project.source_root);

    let source_root = project.source_root.clone();
    for package in &mut project.packages {
        *package = resolve_path(&source_root, &*package);
    }

    for file in project
        .targets
        .iter_mut()
        .flat_map(|t| t.build_phases.iter_mut())
        .flat_map(|phase| phase.files.iter_mut())
    {
        resolve_build_file(file, &source_root);
    }

    project
}

fn resolve_build_file(file: &mut RawBuildFile, source_root: &Path) {
    match file.source_tree {
        SourceTree::Absolute | SourceTree::Group | SourceTree::SourceRoot => {
            file.path = resolve_path(source_root, &file.path);
        }
        // Named by the SDK or by the product that builds them.
        SourceTree::SdkRoot | SourceTree::DeveloperDir | SourceTree::BuiltProductsDir => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xcgraph_core::{
        domain::{BuildPhaseKind, BuildSetting, RawDependency, RawTargetKind},
        error::XcGraphError,
    };
    use tempfile::TempDir;

    const JSON_PROJECT: &str = r#"{
        "source_root": "Sources/..",
        "packages": ["Packages/Core"],
        "targets": [
            {
                "name": "App",
                "product_type": "com.apple.product-type.application",
                "build_phases": [
                    {
                        "kind": "sources",
                        "files": [
                            { "path": "App/AppDelegate.swift", "compiler_flags": "-Onone" }
                        ]
                    },
                    {
                        "kind": "frameworks",
                        "files": [
                            { "path": "UIKit.framework", "source_tree": "sdk-root" }
                        ]
                    }
                ],
                "configurations": [
                    {
                        "name": "Debug",
                        "build_settings": {
                            "PRODUCT_BUNDLE_IDENTIFIER": "com.example.app",
                            "OTHER_LDFLAGS": ["-ObjC", "-lz"]
                        }
                    }
                ],
                "dependencies": [
                    { "kind": "package", "product": "Core", "package_type": "runtime" },
                    { "kind": "sdk", "name": "libz.tbd", "optional": true }
                ]
            },
            { "name": "Lint", "kind": "aggregate" }
        ]
    }"#;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_json_and_resolves_paths() {
        let temp = TempDir::new().unwrap();
        let file = write(temp.path(), "project.json", JSON_PROJECT);

        let project = RawProjectLoader::new().load(&file).unwrap();

        assert_eq!(project.path, file);
        assert_eq!(project.source_root, temp.path());
        assert_eq!(project.packages, vec![temp.path().join("Packages/Core")]);

        let app = project.target("App").unwrap();
        let sources = &app.build_phases[0];
        assert_eq!(sources.kind, BuildPhaseKind::Sources);
        assert_eq!(
            sources.files[0].path,
            temp.path().join("App/AppDelegate.swift")
        );
        assert_eq!(sources.files[0].compiler_flags.as_deref(), Some("-Onone"));

        let frameworks = &app.build_phases[1];
        assert_eq!(frameworks.files[0].path, PathBuf::from("UIKit.framework"));

        assert_eq!(
            app.configurations[0].build_settings["OTHER_LDFLAGS"],
            BuildSetting::Array(vec!["-ObjC".into(), "-lz".into()])
        );
        assert_eq!(
            app.dependencies[1],
            RawDependency::Sdk {
                name: "libz.tbd".into(),
                optional: true
            }
        );
        assert_eq!(project.target("Lint").unwrap().kind, RawTargetKind::Aggregate);
    }

    #[test]
    fn loads_toml_by_extension() {
        let temp = TempDir::new().unwrap();
        let file = write(
            temp.path(),
            "project.toml",
            r#"
path = "App.xcodeproj"

[[targets]]
name = "App"
product_type = "com.apple.product-type.framework"

[[targets.synchronized_groups]]
path = "App"

[[targets.synchronized_groups.exceptions]]
target = "App"
membership_exceptions = ["Ignored.swift"]
attributes_by_relative_path = { "Optional.framework" = ["Weak"] }
"#,
        );

        let project = RawProjectLoader::new().load(&file).unwrap();
        assert_eq!(project.path, temp.path().join("App.xcodeproj"));
        assert_eq!(project.source_root, temp.path());

        let group = &project.targets[0].synchronized_groups[0];
        assert_eq!(group.path, PathBuf::from("App"));
        assert_eq!(group.exceptions[0].membership_exceptions, vec!["Ignored.swift"]);
        assert_eq!(
            group.exceptions[0].attributes_by_relative_path["Optional.framework"],
            vec!["Weak"]
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.json");

        let err = RawProjectLoader::new().load(&missing).unwrap_err();
        assert_eq!(
            err,
            XcGraphError::Application(ApplicationError::ProjectNotFound { path: missing })
        );
    }

    #[test]
    fn malformed_description_is_invalid() {
        let temp = TempDir::new().unwrap();
        let file = write(temp.path(), "project.json", r#"{ "targets": [ { } ] }"#);

        let err = RawProjectLoader::new().load(&file).unwrap_err();
        assert!(matches!(
            err,
            XcGraphError::Application(ApplicationError::InvalidProjectDescription { .. })
        ));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            DescriptionFormat::from_path(Path::new("a/project.TOML")),
            DescriptionFormat::Toml
        );
        assert_eq!(
            DescriptionFormat::from_path(Path::new("a/project.json")),
            DescriptionFormat::Json
        );
        assert_eq!(
            DescriptionFormat::from_path(Path::new("a/project")),
            DescriptionFormat::Json
        );
    }
}
