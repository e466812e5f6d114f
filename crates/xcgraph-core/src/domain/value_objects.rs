//! Domain value objects: products, linking status, platform conditions,
//! build configurations and header visibility.
//!
//! # Design
//!
//! These are pure value types with equality by value and no identity. This
//! file defines the types, their string representations and their `FromStr`
//! parsers. Classification rules live in `classification.rs`.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ── LinkingStatus ─────────────────────────────────────────────────────────────

/// Whether a binary dependency must link, may link weakly, or is not linked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkingStatus {
    #[default]
    Required,
    Optional,
    None,
}

impl LinkingStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::None => "none",
        }
    }

    /// Linking status implied by a build-file or exception attribute list.
    ///
    /// `Weak` downgrades the link to optional; anything else is required.
    pub fn from_attributes<S: AsRef<str>>(attributes: &[S]) -> Self {
        if attributes.iter().any(|a| a.as_ref() == "Weak") {
            Self::Optional
        } else {
            Self::Required
        }
    }
}

impl fmt::Display for LinkingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Platform conditions ───────────────────────────────────────────────────────

/// A build platform a dependency can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformFilter {
    Ios,
    Macos,
    Catalyst,
    Tvos,
    Watchos,
    Driverkit,
    Visionos,
}

impl PlatformFilter {
    /// The spelling used by `platformFilter` entries in project files.
    pub const fn xcode_value(&self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Macos => "macos",
            Self::Catalyst => "maccatalyst",
            Self::Tvos => "tvos",
            Self::Watchos => "watchos",
            Self::Driverkit => "driverkit",
            Self::Visionos => "xros",
        }
    }
}

impl fmt::Display for PlatformFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.xcode_value())
    }
}

impl FromStr for PlatformFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ios" => Ok(Self::Ios),
            "macos" => Ok(Self::Macos),
            "maccatalyst" | "catalyst" => Ok(Self::Catalyst),
            "tvos" => Ok(Self::Tvos),
            "watchos" => Ok(Self::Watchos),
            "driverkit" => Ok(Self::Driverkit),
            "xros" | "visionos" => Ok(Self::Visionos),
            other => Err(DomainError::UnknownPlatformFilter(other.to_string())),
        }
    }
}

/// A predicate restricting a dependency to a set of platforms.
///
/// Opaque to the mapper: it is only constructed, compared and carried along.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformCondition {
    platform_filters: BTreeSet<PlatformFilter>,
}

impl PlatformCondition {
    /// Build a condition from a set of filters.
    ///
    /// An empty set means "no restriction" and yields `None`.
    pub fn when(filters: impl IntoIterator<Item = PlatformFilter>) -> Option<Self> {
        let platform_filters: BTreeSet<_> = filters.into_iter().collect();
        if platform_filters.is_empty() {
            None
        } else {
            Some(Self { platform_filters })
        }
    }

    /// Parse raw `platformFilter` strings into a condition.
    pub fn parse<S: AsRef<str>>(filters: &[S]) -> Result<Option<Self>, DomainError> {
        let parsed = filters
            .iter()
            .map(|f| f.as_ref().parse::<PlatformFilter>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::when(parsed))
    }

    pub fn platform_filters(&self) -> &BTreeSet<PlatformFilter> {
        &self.platform_filters
    }
}

// ── Product ───────────────────────────────────────────────────────────────────

/// The kind of product a buildable target produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    App,
    StaticLibrary,
    DynamicLibrary,
    Framework,
    StaticFramework,
    UnitTests,
    UiTests,
    Bundle,
    CommandLineTool,
    AppExtension,
    Watch2App,
    Watch2Extension,
    TvTopShelfExtension,
    MessagesExtension,
    StickerPackExtension,
    AppClip,
    Xpc,
    SystemExtension,
    ExtensionKitExtension,
    Macro,
}

impl Product {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::App => "app",
            Self::StaticLibrary => "static_library",
            Self::DynamicLibrary => "dynamic_library",
            Self::Framework => "framework",
            Self::StaticFramework => "static_framework",
            Self::UnitTests => "unit_tests",
            Self::UiTests => "ui_tests",
            Self::Bundle => "bundle",
            Self::CommandLineTool => "command_line_tool",
            Self::AppExtension => "app_extension",
            Self::Watch2App => "watch2_app",
            Self::Watch2Extension => "watch2_extension",
            Self::TvTopShelfExtension => "tv_top_shelf_extension",
            Self::MessagesExtension => "messages_extension",
            Self::StickerPackExtension => "sticker_pack_extension",
            Self::AppClip => "app_clip",
            Self::Xpc => "xpc",
            Self::SystemExtension => "system_extension",
            Self::ExtensionKitExtension => "extension_kit_extension",
            Self::Macro => "macro",
        }
    }

    /// Map a `com.apple.product-type.*` identifier to a product.
    pub fn from_identifier(identifier: &str) -> Result<Self, DomainError> {
        let product = match identifier {
            "com.apple.product-type.application" => Self::App,
            "com.apple.product-type.library.static" => Self::StaticLibrary,
            "com.apple.product-type.library.dynamic" => Self::DynamicLibrary,
            "com.apple.product-type.framework" => Self::Framework,
            "com.apple.product-type.framework.static" => Self::StaticFramework,
            "com.apple.product-type.bundle.unit-test" => Self::UnitTests,
            "com.apple.product-type.bundle.ui-testing" => Self::UiTests,
            "com.apple.product-type.bundle" => Self::Bundle,
            "com.apple.product-type.tool" => Self::CommandLineTool,
            "com.apple.product-type.app-extension" => Self::AppExtension,
            "com.apple.product-type.application.watchapp2" => Self::Watch2App,
            "com.apple.product-type.watchkit2-extension" => Self::Watch2Extension,
            "com.apple.product-type.tv-app-extension" => Self::TvTopShelfExtension,
            "com.apple.product-type.app-extension.messages" => Self::MessagesExtension,
            "com.apple.product-type.app-extension.messages-sticker-pack" => {
                Self::StickerPackExtension
            }
            "com.apple.product-type.application.on-demand-install-capable" => Self::AppClip,
            "com.apple.product-type.xpc-service" => Self::Xpc,
            "com.apple.product-type.system-extension" => Self::SystemExtension,
            "com.apple.product-type.extensionkit-extension" => Self::ExtensionKitExtension,
            "com.apple.product-type.macro" => Self::Macro,
            other => return Err(DomainError::UnknownProductType(other.to_string())),
        };
        Ok(product)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── PackageType ───────────────────────────────────────────────────────────────

/// How a package product is consumed by a target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageType {
    #[default]
    Runtime,
    RuntimeEmbedded,
    Plugin,
    Macro,
}

impl PackageType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Runtime => "runtime",
            Self::RuntimeEmbedded => "runtime-embedded",
            Self::Plugin => "plugin",
            Self::Macro => "macro",
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "runtime" => Ok(Self::Runtime),
            "runtime-embedded" | "runtimeEmbedded" => Ok(Self::RuntimeEmbedded),
            "plugin" => Ok(Self::Plugin),
            "macro" => Ok(Self::Macro),
            other => Err(DomainError::UnknownPackageType(other.to_string())),
        }
    }
}

// ── Build configurations ──────────────────────────────────────────────────────

/// Semantic flavour of a build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildConfigurationVariant {
    Debug,
    Release,
}

/// A named build configuration together with its semantic variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildConfiguration {
    pub name: String,
    pub variant: BuildConfigurationVariant,
}

impl BuildConfiguration {
    pub fn new(name: impl Into<String>, variant: BuildConfigurationVariant) -> Self {
        Self {
            name: name.into(),
            variant,
        }
    }

    /// Infer the variant from the configuration name.
    ///
    /// Any name containing "debug" (case-insensitive) is a debug
    /// configuration; everything else is treated as release.
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let variant = if name.to_ascii_lowercase().contains("debug") {
            BuildConfigurationVariant::Debug
        } else {
            BuildConfigurationVariant::Release
        };
        Self { name, variant }
    }
}

impl fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ── HeaderVisibility ──────────────────────────────────────────────────────────

/// Visibility tier of a header file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderVisibility {
    Public,
    Private,
    Project,
}

impl HeaderVisibility {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Project => "project",
        }
    }

    /// Visibility declared by build-file attributes (`Public` / `Private`).
    pub fn from_attributes<S: AsRef<str>>(attributes: &[S]) -> Option<Self> {
        attributes.iter().find_map(|a| match a.as_ref() {
            "Public" => Some(Self::Public),
            "Private" => Some(Self::Private),
            _ => None,
        })
    }
}

impl fmt::Display for HeaderVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
