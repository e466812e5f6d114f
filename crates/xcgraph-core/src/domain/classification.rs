//! Extension-based classification rules.
//!
//! Pure functions that decide which semantic role a path plays in a target,
//! looking only at its name and whether it is a directory. Anything that
//! needs to look inside a directory (local package detection) is done by the
//! application layer, which owns the directory-listing port.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::HeaderVisibility;

/// Semantic role of a file-system entry within a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileRole {
    Source,
    Resource,
    Header(HeaderVisibility),
    Framework,
    XcFramework,
    Library,
    Ignored,
}

/// What the extension table says about a suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtensionKind {
    SourceFile,
    SourceBundle,
    PublicHeader,
    PrivateHeader,
    Framework,
    XcFramework,
    Library,
    Ignored,
}

/// Maps lowercase extensions to their classification.
static EXTENSION_KINDS: LazyLock<HashMap<&'static str, ExtensionKind>> = LazyLock::new(|| {
    use ExtensionKind::*;

    let mut m = HashMap::new();
    for ext in [
        "swift", "m", "mm", "c", "cc", "cpp", "cxx", "c++", "d", "s", "metal",
        "intentdefinition", "xcmappingmodel", "mlmodel",
    ] {
        m.insert(ext, SourceFile);
    }
    for ext in ["docc", "playground", "rcproject", "mlpackage", "xcdatamodeld"] {
        m.insert(ext, SourceBundle);
    }
    m.insert("h", PublicHeader);
    m.insert("hh", PublicHeader);
    m.insert("hpp", PrivateHeader);
    m.insert("hxx", PrivateHeader);
    m.insert("framework", Framework);
    m.insert("xcframework", XcFramework);
    m.insert("a", Library);
    m.insert("dylib", Library);
    m.insert("xcconfig", Ignored);
    m.insert("entitlements", Ignored);
    m.insert("modulemap", Ignored);
    m
});

const PRIVATE_HEADER_SUFFIXES: [&str; 3] = ["_Private", "+Private", "-Private"];

/// How headers with no explicit visibility override are bucketed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnlistedHeaders {
    /// Decide from the extension and name (`.h` public, `.hpp` private).
    #[default]
    ByExtension,
    /// Every unlisted header is project-visible.
    Project,
}

fn extension_kind(path: &Path) -> Option<ExtensionKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    EXTENSION_KINDS.get(ext.as_str()).copied()
}

/// Whether a directory is an atomic bundle, i.e. its name carries a suffix.
///
/// Bundles are never recursed into during synchronized-group enumeration.
pub fn is_bundle_directory(path: &Path) -> bool {
    path.extension().is_some_and(|ext| !ext.is_empty())
}

/// Default visibility of a header file by extension and naming convention.
pub fn default_header_visibility(path: &Path) -> HeaderVisibility {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    if PRIVATE_HEADER_SUFFIXES.iter().any(|s| stem.ends_with(s)) {
        return HeaderVisibility::Private;
    }
    match extension_kind(path) {
        Some(ExtensionKind::PrivateHeader) => HeaderVisibility::Private,
        _ => HeaderVisibility::Public,
    }
}

/// Classify an entry found under a synchronized root.
///
/// `is_directory` must be true only for bundle directories; plain folders
/// are recursed into by the caller and never reach this function.
pub fn classify_entry(path: &Path, is_directory: bool, headers: UnlistedHeaders) -> FileRole {
    let is_hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'));
    if is_hidden {
        return FileRole::Ignored;
    }

    match (extension_kind(path), is_directory) {
        (Some(ExtensionKind::SourceFile), false) => FileRole::Source,
        (Some(ExtensionKind::SourceBundle), _) => FileRole::Source,
        (Some(ExtensionKind::PublicHeader | ExtensionKind::PrivateHeader), false) => {
            let visibility = match headers {
                UnlistedHeaders::ByExtension => default_header_visibility(path),
                UnlistedHeaders::Project => HeaderVisibility::Project,
            };
            FileRole::Header(visibility)
        }
        (Some(ExtensionKind::Framework), true) => FileRole::Framework,
        (Some(ExtensionKind::XcFramework), true) => FileRole::XcFramework,
        (Some(ExtensionKind::Library), false) => FileRole::Library,
        (Some(ExtensionKind::Ignored), false) => FileRole::Ignored,
        _ => FileRole::Resource,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> FileRole {
        classify_entry(Path::new(name), false, UnlistedHeaders::ByExtension)
    }

    fn bundle(name: &str) -> FileRole {
        classify_entry(Path::new(name), true, UnlistedHeaders::ByExtension)
    }

    #[test]
    fn source_files_and_bundles() {
        assert_eq!(file("/a/File.swift"), FileRole::Source);
        assert_eq!(file("/a/File.cpp"), FileRole::Source);
        assert_eq!(file("/a/File.C"), FileRole::Source);
        assert_eq!(bundle("/a/App.docc"), FileRole::Source);
        assert_eq!(bundle("/a/Model.xcdatamodeld"), FileRole::Source);
    }

    #[test]
    fn resources_cover_unknown_bundles_and_files() {
        assert_eq!(bundle("/a/App.xcassets"), FileRole::Resource);
        assert_eq!(bundle("/a/Location.geojson"), FileRole::Resource);
        assert_eq!(file("/a/Main.storyboard"), FileRole::Resource);
        assert_eq!(file("/a/Localizable.xcstrings"), FileRole::Resource);
    }

    #[test]
    fn header_visibility_defaults() {
        assert_eq!(file("/a/Public.h"), FileRole::Header(HeaderVisibility::Public));
        assert_eq!(file("/a/Impl.hpp"), FileRole::Header(HeaderVisibility::Private));
        assert_eq!(
            file("/a/Thing_Private.h"),
            FileRole::Header(HeaderVisibility::Private)
        );
        assert_eq!(
            classify_entry(Path::new("/a/Public.h"), false, UnlistedHeaders::Project),
            FileRole::Header(HeaderVisibility::Project)
        );
    }

    #[test]
    fn binary_bundles() {
        assert_eq!(bundle("/a/Framework.framework"), FileRole::Framework);
        assert_eq!(bundle("/a/Binary.xcframework"), FileRole::XcFramework);
        assert_eq!(file("/a/libz.a"), FileRole::Library);
    }

    #[test]
    fn ignored_entries() {
        assert_eq!(file("/a/.DS_Store"), FileRole::Ignored);
        assert_eq!(file("/a/App.entitlements"), FileRole::Ignored);
        assert_eq!(file("/a/Base.xcconfig"), FileRole::Ignored);
    }

    #[test]
    fn bundle_detection_requires_suffix() {
        assert!(is_bundle_directory(Path::new("/a/App.xcassets")));
        assert!(!is_bundle_directory(Path::new("/a/Nested")));
    }
}
