//! The normalized `Target` aggregate and its typestate builder.
//!
//! A `Target` is the fully-classified description of one buildable raw
//! target. It is produced once by the mapper and never mutated afterwards.
//!
//! # Typestate builder
//!
//! The builder carries the product kind in its type parameter (`NoProduct` /
//! `HasProduct`), so `build()` only exists once a product has been chosen.
//! `build()` sorts every membership list and then runs `validate` to check
//! the cross-field invariants the type system cannot express.
//!
//! # Domain purity
//!
//! This module must not import `tracing`. Observability is the responsibility
//! of the application and CLI layers, not the domain.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{
    dependency::TargetDependency,
    error::DomainError,
    value_objects::{BuildConfiguration, HeaderVisibility, Product},
};

/// Bundle identifier used when a target does not declare one.
pub const UNKNOWN_BUNDLE_ID: &str = "Unknown";

// ── Membership value types ────────────────────────────────────────────────────

/// A source file and the extra compiler flags it is built with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub compiler_flags: Option<String>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            compiler_flags: None,
        }
    }

    pub fn with_flags(path: impl Into<PathBuf>, flags: Option<String>) -> Self {
        Self {
            path: path.into(),
            compiler_flags: flags,
        }
    }
}

/// Header files split by visibility tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Headers {
    pub public: Vec<PathBuf>,
    pub private: Vec<PathBuf>,
    pub project: Vec<PathBuf>,
}

impl Headers {
    pub fn push(&mut self, visibility: HeaderVisibility, path: PathBuf) {
        match visibility {
            HeaderVisibility::Public => self.public.push(path),
            HeaderVisibility::Private => self.private.push(path),
            HeaderVisibility::Project => self.project.push(path),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.public.is_empty() && self.private.is_empty() && self.project.is_empty()
    }

    pub fn len(&self) -> usize {
        self.public.len() + self.private.len() + self.project.len()
    }

    /// Every header path paired with its visibility.
    pub fn iter(&self) -> impl Iterator<Item = (HeaderVisibility, &Path)> {
        tier(HeaderVisibility::Public, &self.public)
            .chain(tier(HeaderVisibility::Private, &self.private))
            .chain(tier(HeaderVisibility::Project, &self.project))
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.iter().any(|(_, p)| p == path)
    }

    fn sort(&mut self) {
        self.public.sort();
        self.private.sort();
        self.project.sort();
    }
}

fn tier(
    visibility: HeaderVisibility,
    paths: &[PathBuf],
) -> impl Iterator<Item = (HeaderVisibility, &Path)> {
    paths.iter().map(move |p| (visibility, p.as_path()))
}

/// Reference to the Info.plist a target is built with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InfoPlist {
    /// A plist file on disk, resolved against the source root.
    File {
        path: PathBuf,
        configuration: BuildConfiguration,
    },
    /// The build system generates the plist from build settings.
    Generated { configuration: BuildConfiguration },
}

impl InfoPlist {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Generated { .. } => None,
        }
    }

    pub fn configuration(&self) -> &BuildConfiguration {
        match self {
            Self::File { configuration, .. } | Self::Generated { configuration } => configuration,
        }
    }
}

/// Reference to an entitlements file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Entitlements {
    File {
        path: PathBuf,
        configuration: BuildConfiguration,
    },
}

impl Entitlements {
    pub fn path(&self) -> &Path {
        match self {
            Self::File { path, .. } => path,
        }
    }

    pub fn configuration(&self) -> &BuildConfiguration {
        match self {
            Self::File { configuration, .. } => configuration,
        }
    }
}

// ── Aggregate root ────────────────────────────────────────────────────────────

/// A normalized, classified target.
///
/// Guaranteed on construction:
/// - every membership list is sorted by path
/// - a path appears at most once across sources, headers and resources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    name: String,
    product: Product,
    product_type_identifier: Option<String>,
    product_name: String,
    bundle_id: String,
    sources: Vec<SourceFile>,
    resources: Vec<PathBuf>,
    headers: Option<Headers>,
    dependencies: Vec<TargetDependency>,
    entitlements: Option<Entitlements>,
    info_plist: Option<InfoPlist>,
    build_configurations: Vec<BuildConfiguration>,
    synchronized_roots: Vec<PathBuf>,
}

impl Target {
    /// Start building a new `Target`.
    pub fn builder(name: impl Into<String>) -> TargetBuilder<NoProduct> {
        TargetBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub const fn product(&self) -> Product {
        self.product
    }
    pub fn product_type_identifier(&self) -> Option<&str> {
        self.product_type_identifier.as_deref()
    }
    pub fn product_name(&self) -> &str {
        &self.product_name
    }
    pub fn bundle_id(&self) -> &str {
        &self.bundle_id
    }
    pub fn sources(&self) -> &[SourceFile] {
        &self.sources
    }
    pub fn resources(&self) -> &[PathBuf] {
        &self.resources
    }
    pub fn headers(&self) -> Option<&Headers> {
        self.headers.as_ref()
    }
    pub fn dependencies(&self) -> &[TargetDependency] {
        &self.dependencies
    }
    pub fn entitlements(&self) -> Option<&Entitlements> {
        self.entitlements.as_ref()
    }
    pub fn info_plist(&self) -> Option<&InfoPlist> {
        self.info_plist.as_ref()
    }
    pub fn build_configurations(&self) -> &[BuildConfiguration] {
        &self.build_configurations
    }
    pub fn synchronized_roots(&self) -> &[PathBuf] {
        &self.synchronized_roots
    }

    /// Validate this target's internal consistency.
    ///
    /// Called automatically by the builder. Available for re-validation after
    /// deserialization.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.is_empty() {
            return Err(DomainError::MissingRequiredField { field: "name" });
        }

        let mut seen: BTreeSet<&Path> = BTreeSet::new();
        let sources = self.sources.iter().map(|s| (s.path.as_path(), "source"));
        let headers = self
            .headers
            .iter()
            .flat_map(|h| h.iter())
            .map(|(_, p)| (p, "header"));
        let resources = self.resources.iter().map(|p| (p.as_path(), "resource"));

        for (path, role) in sources.chain(headers).chain(resources) {
            if !seen.insert(path) {
                return Err(DomainError::OverlappingMembership {
                    path: path.display().to_string(),
                    reason: format!("already claimed when adding it as a {role}"),
                });
            }
        }

        Ok(())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.product, self.bundle_id)
    }
}

// ── Typestate markers ─────────────────────────────────────────────────────────

/// Marker: product has not yet been set.
pub struct NoProduct;
/// Marker: product has been set; the target can now be built.
pub struct HasProduct(Product);

// ── Builder ───────────────────────────────────────────────────────────────────

/// Typestate builder for [`Target`].
pub struct TargetBuilder<P> {
    name: String,
    product: P,
    product_type_identifier: Option<String>,
    product_name: Option<String>,
    bundle_id: Option<String>,
    sources: Vec<SourceFile>,
    resources: Vec<PathBuf>,
    headers: Headers,
    dependencies: Vec<TargetDependency>,
    entitlements: Option<Entitlements>,
    info_plist: Option<InfoPlist>,
    build_configurations: Vec<BuildConfiguration>,
    synchronized_roots: Vec<PathBuf>,
}

impl TargetBuilder<NoProduct> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            product: NoProduct,
            product_type_identifier: None,
            product_name: None,
            bundle_id: None,
            sources: Vec::new(),
            resources: Vec::new(),
            headers: Headers::default(),
            dependencies: Vec::new(),
            entitlements: None,
            info_plist: None,
            build_configurations: Vec::new(),
            synchronized_roots: Vec::new(),
        }
    }

    /// Set the product. This transitions the builder to `HasProduct`.
    pub fn product(self, product: Product) -> TargetBuilder<HasProduct> {
        TargetBuilder {
            name: self.name,
            product: HasProduct(product),
            product_type_identifier: self.product_type_identifier,
            product_name: self.product_name,
            bundle_id: self.bundle_id,
            sources: self.sources,
            resources: self.resources,
            headers: self.headers,
            dependencies: self.dependencies,
            entitlements: self.entitlements,
            info_plist: self.info_plist,
            build_configurations: self.build_configurations,
            synchronized_roots: self.synchronized_roots,
        }
    }
}

impl<P> TargetBuilder<P> {
    pub fn product_type_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.product_type_identifier = Some(identifier.into());
        self
    }

    pub fn product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    /// Set the bundle identifier; `None` falls back to [`UNKNOWN_BUNDLE_ID`].
    pub fn bundle_id(mut self, bundle_id: Option<String>) -> Self {
        self.bundle_id = bundle_id;
        self
    }

    pub fn sources(mut self, sources: impl IntoIterator<Item = SourceFile>) -> Self {
        self.sources.extend(sources);
        self
    }

    pub fn resources(mut self, resources: impl IntoIterator<Item = PathBuf>) -> Self {
        self.resources.extend(resources);
        self
    }

    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers.public.extend(headers.public);
        self.headers.private.extend(headers.private);
        self.headers.project.extend(headers.project);
        self
    }

    pub fn dependencies(mut self, dependencies: impl IntoIterator<Item = TargetDependency>) -> Self {
        self.dependencies.extend(dependencies);
        self
    }

    pub fn entitlements(mut self, entitlements: Option<Entitlements>) -> Self {
        self.entitlements = entitlements;
        self
    }

    pub fn info_plist(mut self, info_plist: Option<InfoPlist>) -> Self {
        self.info_plist = info_plist;
        self
    }

    pub fn build_configurations(
        mut self,
        configurations: impl IntoIterator<Item = BuildConfiguration>,
    ) -> Self {
        self.build_configurations.extend(configurations);
        self
    }

    pub fn synchronized_roots(mut self, roots: impl IntoIterator<Item = PathBuf>) -> Self {
        self.synchronized_roots.extend(roots);
        self
    }
}

impl TargetBuilder<HasProduct> {
    /// Sort memberships, drop exact duplicate dependencies and validate.
    ///
    /// Dependency order is preserved; only later duplicates are removed.
    pub fn build(self) -> Result<Target, DomainError> {
        let HasProduct(product) = self.product;

        let mut sources = self.sources;
        sources.sort_by(|a, b| a.path.cmp(&b.path));
        let mut resources = self.resources;
        resources.sort();
        let mut headers = self.headers;
        headers.sort();

        let mut dependencies: Vec<TargetDependency> = Vec::with_capacity(self.dependencies.len());
        for dependency in self.dependencies {
            if !dependencies.contains(&dependency) {
                dependencies.push(dependency);
            }
        }

        let mut synchronized_roots = self.synchronized_roots;
        synchronized_roots.sort();
        synchronized_roots.dedup();

        let product_name = self.product_name.unwrap_or_else(|| self.name.clone());
        let target = Target {
            name: self.name,
            product,
            product_type_identifier: self.product_type_identifier,
            product_name,
            bundle_id: self
                .bundle_id
                .unwrap_or_else(|| UNKNOWN_BUNDLE_ID.to_string()),
            sources,
            resources,
            headers: (!headers.is_empty()).then_some(headers),
            dependencies,
            entitlements: self.entitlements,
            info_plist: self.info_plist,
            build_configurations: self.build_configurations,
            synchronized_roots,
        };

        target.validate()?;
        Ok(target)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::LinkingStatus;

    fn app() -> TargetBuilder<HasProduct> {
        Target::builder("App").product(Product::App)
    }

    #[test]
    fn missing_bundle_id_uses_sentinel() {
        let t = app().build().unwrap();
        assert_eq!(t.bundle_id(), "Unknown");
        assert_eq!(t.product_name(), "App");
        assert!(t.headers().is_none());
    }

    #[test]
    fn memberships_are_sorted() {
        let t = app()
            .sources([SourceFile::new("/p/b.swift"), SourceFile::new("/p/a.swift")])
            .resources(["/p/z.png".into(), "/p/a.png".into()])
            .build()
            .unwrap();
        let names: Vec<_> = t.sources().iter().map(|s| s.path.clone()).collect();
        assert_eq!(names, vec![PathBuf::from("/p/a.swift"), "/p/b.swift".into()]);
        assert_eq!(t.resources()[0], PathBuf::from("/p/a.png"));
    }

    #[test]
    fn duplicate_dependencies_are_removed_in_order() {
        let t = app()
            .dependencies([
                TargetDependency::target("Core"),
                TargetDependency::framework("/p/F.framework", LinkingStatus::Required),
                TargetDependency::target("Core"),
            ])
            .build()
            .unwrap();
        assert_eq!(t.dependencies().len(), 2);
        assert_eq!(t.dependencies()[0], TargetDependency::target("Core"));
    }

    #[test]
    fn overlapping_membership_is_rejected() {
        let mut headers = Headers::default();
        headers.push(HeaderVisibility::Public, "/p/A.h".into());
        let result = app()
            .headers(headers)
            .resources(["/p/A.h".into()])
            .build();
        assert!(matches!(
            result,
            Err(DomainError::OverlappingMembership { .. })
        ));
    }

    #[test]
    fn empty_name_is_rejected() {
        let result = Target::builder("").product(Product::Framework).build();
        assert_eq!(
            result,
            Err(DomainError::MissingRequiredField { field: "name" })
        );
    }

    #[test]
    fn display_includes_product_and_bundle() {
        let t = app()
            .bundle_id(Some("com.example.app".into()))
            .build()
            .unwrap();
        let s = t.to_string();
        assert!(s.contains("App"));
        assert!(s.contains("app"));
        assert!(s.contains("com.example.app"));
    }

    #[test]
    fn info_plist_serializes_with_type_tag() {
        let plist = InfoPlist::Generated {
            configuration: BuildConfiguration::from_name("Debug"),
        };
        let json = serde_json::to_value(&plist).unwrap();
        assert_eq!(json["type"], "generated");
        assert!(plist.path().is_none());
    }
}
