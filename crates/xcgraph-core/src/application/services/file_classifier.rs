//! File Classifier - resolves a target's final file membership.
//!
//! Membership comes from two places:
//! 1. Explicit build phases (paths already absolute)
//! 2. Synchronized groups, enumerated on disk through [`DirectoryLister`]
//!
//! Explicit members are recorded first, so they win when the same absolute
//! path shows up twice. Across roles sources take priority over headers and
//! headers over resources; a path ends up in exactly one list.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{DirEntry, DirectoryLister},
    },
    domain::{
        BuildPhaseKind, DomainError, ExceptionOverrides, FileRole, HeaderVisibility, Headers, LinkingStatus,
        PlatformCondition, RawBuildFile, RawBuildPhase, RawTarget, RelativePath, SourceFile,
        SourceTree, SynchronizedRootGroup, TargetDependency, UnlistedHeaders,
        classification::classify_entry, resolve_path,
    },
    error::{XcGraphError, XcGraphResult},
};

const PACKAGE_MANIFEST: &str = "Package.swift";
const XCTEST_FRAMEWORK: &str = "XCTest.framework";

/// Knobs that change how ambiguous membership is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationOptions {
    /// Bucket for headers that no exception or attribute places.
    #[serde(default)]
    pub unlisted_headers: UnlistedHeaders,
    /// Report conflicting exception overrides instead of applying tie-breaks.
    #[serde(default)]
    pub strict_exceptions: bool,
}

/// The partition of a target's files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub sources: Vec<SourceFile>,
    pub resources: Vec<PathBuf>,
    pub headers: Headers,
    /// Synchronized-group dependencies (sorted by path), then build-phase ones.
    pub dependencies: Vec<TargetDependency>,
    /// Absolute roots of the synchronized groups that were enumerated.
    pub synchronized_roots: Vec<PathBuf>,
}

/// Project context a target is classified in.
#[derive(Debug, Clone, Copy)]
pub struct ClassifyScope<'a> {
    pub source_root: &'a Path,
    /// Absolute local package directories. They are never enumerated.
    pub packages: &'a [PathBuf],
    /// Absolute paths that must never become members (the target's own
    /// Info.plist, for instance).
    pub ignored: &'a [PathBuf],
}

impl<'a> ClassifyScope<'a> {
    pub fn new(source_root: &'a Path) -> Self {
        Self {
            source_root,
            packages: &[],
            ignored: &[],
        }
    }

    pub fn with_packages(self, packages: &'a [PathBuf]) -> Self {
        Self { packages, ..self }
    }

    pub fn with_ignored(self, ignored: &'a [PathBuf]) -> Self {
        Self { ignored, ..self }
    }
}

/// Unsorted, possibly overlapping membership collected before dedupe.
#[derive(Default)]
struct Collected {
    sources: Vec<SourceFile>,
    resources: Vec<PathBuf>,
    headers: Vec<(HeaderVisibility, PathBuf)>,
    phase_dependencies: Vec<TargetDependency>,
    group_dependencies: Vec<(PathBuf, TargetDependency)>,
}

/// Classifies build-phase and synchronized-group members of a target.
pub struct FileClassifier {
    lister: Box<dyn DirectoryLister>,
    options: ClassificationOptions,
}

impl FileClassifier {
    pub fn new(lister: Box<dyn DirectoryLister>, options: ClassificationOptions) -> Self {
        Self { lister, options }
    }

    /// Classify every member of `target`.
    #[instrument(skip_all, fields(target = %target.name))]
    pub fn classify(&self, target: &RawTarget, scope: &ClassifyScope<'_>) -> XcGraphResult<Classification> {
        let mut collected = Collected::default();

        for phase in &target.build_phases {
            collect_build_phase(phase, &mut collected)?;
        }

        let mut synchronized_roots = Vec::with_capacity(target.synchronized_groups.len());
        for group in &target.synchronized_groups {
            let root = resolve_path(scope.source_root, &group.path);
            self.collect_group(group, &root, &target.name, scope, &mut collected)?;
            synchronized_roots.push(root);
        }

        let classification = finish(collected, synchronized_roots);
        debug!(
            sources = classification.sources.len(),
            resources = classification.resources.len(),
            headers = classification.headers.len(),
            dependencies = classification.dependencies.len(),
            "Classified target members"
        );
        Ok(classification)
    }

    /// Classify a bare directory as if it were a synchronized group with no
    /// exceptions.
    ///
    /// `root` must be absolute.
    pub fn classify_directory(&self, root: &Path, target: &str) -> XcGraphResult<Classification> {
        if !root.is_absolute() {
            return Err(DomainError::RelativePathNotAllowed {
                path: root.display().to_string(),
            }
            .into());
        }
        let group = SynchronizedRootGroup {
            path: root.to_path_buf(),
            exceptions: Vec::new(),
        };
        let raw = RawTarget {
            name: target.to_string(),
            synchronized_groups: vec![group],
            ..RawTarget::default()
        };
        self.classify(&raw, &ClassifyScope::new(root))
    }

    #[instrument(skip_all, fields(root = %root.display()))]
    fn collect_group(
        &self,
        group: &SynchronizedRootGroup,
        root: &Path,
        target: &str,
        scope: &ClassifyScope<'_>,
        collected: &mut Collected,
    ) -> XcGraphResult<()> {
        let overrides = ExceptionOverrides::for_target(group, target, self.options.strict_exceptions)?;
        for path in overrides.unusable_paths() {
            warn!(path = %path, "Exception path is not relative to the synchronized root, ignoring");
        }

        let mut entries = Vec::new();
        let children = self.list_group_dir(root, root)?;
        self.enumerate(root, children, scope.packages, &mut entries)?;
        // Listing order is not part of the contract.
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        let mut seen: Vec<RelativePath> = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(relative) = RelativePath::between(root, &entry.path) else {
                continue;
            };
            seen.push(relative.clone());

            if overrides.is_excluded(&relative) {
                debug!(path = %relative, "Excluded by membership exception");
                continue;
            }
            if scope.ignored.contains(&entry.path) {
                continue;
            }

            let path_override = overrides.get(&relative);
            match classify_entry(&entry.path, entry.is_bundle(), self.options.unlisted_headers) {
                FileRole::Source => collected.sources.push(SourceFile::with_flags(
                    entry.path,
                    path_override.and_then(|o| o.compiler_flags.clone()),
                )),
                FileRole::Header(default) => {
                    let visibility = path_override.and_then(|o| o.visibility).unwrap_or(default);
                    collected.headers.push((visibility, entry.path));
                }
                FileRole::Resource => collected.resources.push(entry.path),
                FileRole::Framework => {
                    let status = path_override
                        .and_then(|o| o.linking_status())
                        .unwrap_or(LinkingStatus::Required);
                    let dependency = TargetDependency::framework(entry.path.clone(), status);
                    collected.group_dependencies.push((entry.path, dependency));
                }
                FileRole::XcFramework => {
                    let status = path_override
                        .and_then(|o| o.linking_status())
                        .unwrap_or(LinkingStatus::Required);
                    let dependency = TargetDependency::xcframework(entry.path.clone(), status);
                    collected.group_dependencies.push((entry.path, dependency));
                }
                FileRole::Library => {
                    let dependency = TargetDependency::library(entry.path.clone());
                    collected.group_dependencies.push((entry.path, dependency));
                }
                FileRole::Ignored => {}
            }
        }

        for unmatched in overrides
            .mentioned_paths()
            .filter(|m| !seen.iter().any(|s| s.is_within(m)))
        {
            warn!(path = %unmatched, "Exception path matches no file in synchronized group");
        }

        Ok(())
    }

    /// Depth-first walk collecting files and bundle directories.
    ///
    /// Plain directories are recursed into unless they are one of the
    /// project's `packages` or hold a package manifest, in which case they
    /// are skipped entirely.
    fn enumerate(
        &self,
        root: &Path,
        children: Vec<DirEntry>,
        packages: &[PathBuf],
        out: &mut Vec<DirEntry>,
    ) -> XcGraphResult<()> {
        for entry in children {
            if !entry.is_directory() || entry.is_bundle() {
                out.push(entry);
                continue;
            }
            if entry.file_name().is_some_and(|n| n.starts_with('.')) {
                continue;
            }
            if packages.contains(&entry.path) {
                debug!(path = %entry.path.display(), "Skipping project package directory");
                continue;
            }

            let nested = self.list_group_dir(root, &entry.path)?;
            let is_package = nested
                .iter()
                .any(|c| !c.is_directory() && c.file_name() == Some(PACKAGE_MANIFEST));
            if is_package {
                debug!(path = %entry.path.display(), "Skipping local package directory");
                continue;
            }
            self.enumerate(root, nested, packages, out)?;
        }
        Ok(())
    }

    fn list_group_dir(&self, root: &Path, dir: &Path) -> XcGraphResult<Vec<DirEntry>> {
        self.lister.list(dir).map_err(|e| {
            XcGraphError::from(ApplicationError::SynchronizedGroupUnreadable {
                path: root.to_path_buf(),
                reason: match e {
                    XcGraphError::Application(ApplicationError::FilesystemError { path, reason }) => {
                        format!("{}: {}", path.display(), reason)
                    }
                    other => other.to_string(),
                },
            })
        })
    }
}

fn collect_build_phase(phase: &RawBuildPhase, collected: &mut Collected) -> XcGraphResult<()> {
    match phase.kind {
        BuildPhaseKind::Sources => collected.sources.extend(
            phase
                .files
                .iter()
                .map(|f| SourceFile::with_flags(f.path.clone(), f.compiler_flags.clone())),
        ),
        BuildPhaseKind::Resources => collected
            .resources
            .extend(phase.files.iter().map(|f| f.path.clone())),
        BuildPhaseKind::Headers => collected.headers.extend(phase.files.iter().map(|f| {
            let visibility =
                HeaderVisibility::from_attributes(&f.attributes).unwrap_or(HeaderVisibility::Project);
            (visibility, f.path.clone())
        })),
        BuildPhaseKind::Frameworks => {
            for file in &phase.files {
                if let Some(dependency) = framework_phase_dependency(file)? {
                    collected.phase_dependencies.push(dependency);
                }
            }
        }
        BuildPhaseKind::CopyFiles | BuildPhaseKind::ShellScript => {}
    }
    Ok(())
}

/// Dependency implied by one entry of a frameworks phase.
fn framework_phase_dependency(file: &RawBuildFile) -> XcGraphResult<Option<TargetDependency>> {
    let name = file
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let extension = file
        .path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let status = LinkingStatus::from_attributes(&file.attributes);

    let dependency = match file.source_tree {
        // Products of other targets arrive through target dependencies.
        SourceTree::BuiltProductsDir => return Ok(None),
        SourceTree::SdkRoot | SourceTree::DeveloperDir if name == XCTEST_FRAMEWORK => {
            TargetDependency::Xctest
        }
        SourceTree::SdkRoot | SourceTree::DeveloperDir => TargetDependency::sdk(name, status),
        _ => match extension.as_deref() {
            Some("framework") => TargetDependency::framework(file.path.clone(), status),
            Some("xcframework") => TargetDependency::xcframework(file.path.clone(), status),
            Some("a" | "dylib") => TargetDependency::library(file.path.clone()),
            Some("tbd") => TargetDependency::sdk(name, status),
            _ => {
                warn!(path = %file.path.display(), "Unrecognised frameworks phase entry");
                return Ok(None);
            }
        },
    };

    let condition = PlatformCondition::parse(&file.platform_filters)?;
    Ok(Some(dependency.with_condition(condition)))
}

/// Dedupe, enforce role exclusivity and sort.
fn finish(collected: Collected, synchronized_roots: Vec<PathBuf>) -> Classification {
    let mut claimed: BTreeSet<PathBuf> = BTreeSet::new();

    let mut sources: Vec<SourceFile> = Vec::new();
    for source in collected.sources {
        if claimed.insert(source.path.clone()) {
            sources.push(source);
        }
    }

    let mut headers = Headers::default();
    for (visibility, path) in collected.headers {
        if claimed.insert(path.clone()) {
            headers.push(visibility, path);
        }
    }

    let mut resources: Vec<PathBuf> = Vec::new();
    for path in collected.resources {
        if claimed.insert(path.clone()) {
            resources.push(path);
        }
    }

    sources.sort_by(|a, b| a.path.cmp(&b.path));
    resources.sort();
    headers.public.sort();
    headers.private.sort();
    headers.project.sort();

    let mut group_dependencies = collected.group_dependencies;
    group_dependencies.sort_by(|a, b| a.0.cmp(&b.0));
    let dependencies = group_dependencies
        .into_iter()
        .map(|(_, d)| d)
        .chain(collected.phase_dependencies)
        .collect();

    Classification {
        sources,
        resources,
        headers,
        dependencies,
        synchronized_roots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockDirectoryLister;
    use crate::domain::{ExceptionSet, RawBuildPhase};

    fn failing_lister() -> MockDirectoryLister {
        let mut lister = MockDirectoryLister::new();
        lister.expect_list().returning(|path| {
            Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "permission denied".into(),
            }
            .into())
        });
        lister
    }

    fn flat_lister(entries: Vec<DirEntry>) -> MockDirectoryLister {
        let mut lister = MockDirectoryLister::new();
        lister
            .expect_list()
            .returning(move |_| Ok(entries.clone()));
        lister
    }

    fn target_with_group(exceptions: Vec<ExceptionSet>) -> RawTarget {
        RawTarget {
            name: "App".into(),
            synchronized_groups: vec![SynchronizedRootGroup {
                path: "App".into(),
                exceptions,
            }],
            ..RawTarget::default()
        }
    }

    #[test]
    fn classify_directory_requires_absolute_root() {
        let classifier = FileClassifier::new(Box::new(MockDirectoryLister::new()), Default::default());
        let err = classifier
            .classify_directory(Path::new("App"), "App")
            .unwrap_err();
        assert!(matches!(
            err,
            XcGraphError::Domain(DomainError::RelativePathNotAllowed { .. })
        ));
    }

    #[test]
    fn classify_directory_uses_defaults() {
        let classifier = FileClassifier::new(
            Box::new(flat_lister(vec![
                DirEntry::file("/p/App/A.swift"),
                DirEntry::file("/p/App/A.h"),
            ])),
            Default::default(),
        );
        let result = classifier.classify_directory(Path::new("/p/App"), "App").unwrap();
        assert_eq!(result.sources, vec![SourceFile::new("/p/App/A.swift")]);
        assert_eq!(result.headers.public, vec![PathBuf::from("/p/App/A.h")]);
        assert_eq!(result.synchronized_roots, vec![PathBuf::from("/p/App")]);
    }

    #[test]
    fn unreadable_group_root_is_an_error() {
        let classifier = FileClassifier::new(Box::new(failing_lister()), Default::default());
        let err = classifier
            .classify(&target_with_group(vec![]), &ClassifyScope::new(Path::new("/p")))
            .unwrap_err();

        match err {
            XcGraphError::Application(ApplicationError::SynchronizedGroupUnreadable {
                path,
                reason,
            }) => {
                assert_eq!(path, PathBuf::from("/p/App"));
                assert!(reason.contains("permission denied"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn explicit_source_wins_over_group_resource_and_duplicate() {
        let classifier = FileClassifier::new(
            Box::new(flat_lister(vec![
                DirEntry::file("/p/App/File.swift"),
                DirEntry::file("/p/App/Notes.txt"),
            ])),
            Default::default(),
        );
        let mut target = target_with_group(vec![]);
        target.build_phases = vec![
            RawBuildPhase {
                kind: BuildPhaseKind::Sources,
                files: vec![
                    RawBuildFile {
                        compiler_flags: Some("-O".into()),
                        ..RawBuildFile::new("/p/App/File.swift")
                    },
                    RawBuildFile::new("/p/App/Notes.txt"),
                ],
            },
        ];

        let result = classifier
            .classify(&target, &ClassifyScope::new(Path::new("/p")))
            .unwrap();
        assert_eq!(
            result.sources,
            vec![
                SourceFile::with_flags("/p/App/File.swift", Some("-O".into())),
                SourceFile::new("/p/App/Notes.txt"),
            ]
        );
        assert!(result.resources.is_empty());
    }

    #[test]
    fn ignored_paths_are_dropped() {
        let classifier = FileClassifier::new(
            Box::new(flat_lister(vec![DirEntry::file("/p/App/Info.plist")])),
            Default::default(),
        );
        let ignored = [PathBuf::from("/p/App/Info.plist")];
        let scope = ClassifyScope::new(Path::new("/p")).with_ignored(&ignored);
        let result = classifier
            .classify(&target_with_group(vec![]), &scope)
            .unwrap();
        assert!(result.resources.is_empty());
    }

    #[test]
    fn strict_mode_rejects_conflicting_headers() {
        let mut set = ExceptionSet {
            target: "App".into(),
            ..ExceptionSet::default()
        };
        set.private_headers = vec!["A.h".into()];
        set.public_headers = vec!["A.h".into()];

        let classifier = FileClassifier::new(
            Box::new(flat_lister(vec![DirEntry::file("/p/App/A.h")])),
            ClassificationOptions {
                strict_exceptions: true,
                ..Default::default()
            },
        );
        let err = classifier
            .classify(&target_with_group(vec![set]), &ClassifyScope::new(Path::new("/p")))
            .unwrap_err();
        assert!(matches!(
            err,
            XcGraphError::Domain(crate::domain::DomainError::ConflictingExceptions { .. })
        ));
    }

    /// A lister over a two-level tree: `/p/App` holds `A.swift` and a
    /// `Core` directory that holds `Core.swift`.
    fn nested_lister() -> MockDirectoryLister {
        let mut lister = MockDirectoryLister::new();
        lister.expect_list().returning(|path| {
            Ok(match path.to_str() {
                Some("/p/App") => vec![
                    DirEntry::file("/p/App/A.swift"),
                    DirEntry::directory("/p/App/Core"),
                ],
                Some("/p/App/Core") => vec![DirEntry::file("/p/App/Core/Core.swift")],
                _ => vec![],
            })
        });
        lister
    }

    #[test]
    fn project_packages_are_not_enumerated() {
        let classifier = FileClassifier::new(Box::new(nested_lister()), Default::default());
        let target = target_with_group(vec![]);

        let all = classifier
            .classify(&target, &ClassifyScope::new(Path::new("/p")))
            .unwrap();
        assert_eq!(all.sources.len(), 2);

        let packages = [PathBuf::from("/p/App/Core")];
        let scope = ClassifyScope::new(Path::new("/p")).with_packages(&packages);
        let result = classifier.classify(&target, &scope).unwrap();
        assert_eq!(result.sources, vec![SourceFile::new("/p/App/A.swift")]);
    }

    #[test]
    fn absolute_exception_paths_leave_membership_alone() {
        let mut set = ExceptionSet {
            target: "App".into(),
            ..ExceptionSet::default()
        };
        set.membership_exceptions = vec!["/elsewhere/Stale.swift".into()];

        let classifier = FileClassifier::new(
            Box::new(flat_lister(vec![DirEntry::file("/p/App/A.swift")])),
            Default::default(),
        );
        let result = classifier
            .classify(&target_with_group(vec![set.clone()]), &ClassifyScope::new(Path::new("/p")))
            .unwrap();
        assert_eq!(result.sources, vec![SourceFile::new("/p/App/A.swift")]);

        let strict = FileClassifier::new(
            Box::new(flat_lister(vec![DirEntry::file("/p/App/A.swift")])),
            ClassificationOptions {
                strict_exceptions: true,
                ..Default::default()
            },
        );
        let err = strict
            .classify(&target_with_group(vec![set]), &ClassifyScope::new(Path::new("/p")))
            .unwrap_err();
        assert!(matches!(
            err,
            XcGraphError::Domain(DomainError::AbsolutePathNotAllowed { .. })
        ));
    }

    #[test]
    fn frameworks_phase_entries_become_dependencies() {
        let phase = RawBuildPhase {
            kind: BuildPhaseKind::Frameworks,
            files: vec![
                RawBuildFile {
                    attributes: vec!["Weak".into()],
                    platform_filters: vec!["ios".into()],
                    ..RawBuildFile::new("/p/Vendor/A.framework")
                },
                RawBuildFile::new("/p/Vendor/B.xcframework"),
                RawBuildFile::new("/p/lib/libC.a"),
                RawBuildFile {
                    source_tree: SourceTree::SdkRoot,
                    ..RawBuildFile::new("/sdk/System/Library/Frameworks/UIKit.framework")
                },
                RawBuildFile {
                    source_tree: SourceTree::DeveloperDir,
                    ..RawBuildFile::new("/dev/Library/Frameworks/XCTest.framework")
                },
                RawBuildFile {
                    source_tree: SourceTree::BuiltProductsDir,
                    ..RawBuildFile::new("/build/Core.framework")
                },
            ],
        };
        let mut collected = Collected::default();
        collect_build_phase(&phase, &mut collected).unwrap();

        assert_eq!(
            collected.phase_dependencies,
            vec![
                TargetDependency::framework("/p/Vendor/A.framework", LinkingStatus::Optional)
                    .with_condition(PlatformCondition::when([crate::domain::PlatformFilter::Ios])),
                TargetDependency::xcframework("/p/Vendor/B.xcframework", LinkingStatus::Required),
                TargetDependency::library("/p/lib/libC.a"),
                TargetDependency::sdk("UIKit.framework", LinkingStatus::Required),
                TargetDependency::Xctest,
            ]
        );
    }

    #[test]
    fn headers_phase_defaults_to_project_visibility() {
        let phase = RawBuildPhase {
            kind: BuildPhaseKind::Headers,
            files: vec![
                RawBuildFile {
                    attributes: vec!["Public".into()],
                    ..RawBuildFile::new("/p/A.h")
                },
                RawBuildFile::new("/p/B.h"),
            ],
        };
        let mut collected = Collected::default();
        collect_build_phase(&phase, &mut collected).unwrap();
        let result = finish(collected, vec![]);
        assert_eq!(result.headers.public, vec![PathBuf::from("/p/A.h")]);
        assert_eq!(result.headers.project, vec![PathBuf::from("/p/B.h")]);
    }
}
