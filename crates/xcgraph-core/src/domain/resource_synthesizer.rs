//! Resource synthesizer configuration.
//!
//! A synthesizer describes how a class of resource files (selected by
//! extension) is parsed and fed into a code template. Parser options are an
//! open-ended bag of literal values; which names are meaningful depends on
//! the parser and is not checked here.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

// ── ParserKind ────────────────────────────────────────────────────────────────

/// The parser a synthesizer runs over its resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParserKind {
    Strings,
    StringsCatalog,
    Assets,
    Plists,
    Fonts,
    CoreData,
    InterfaceBuilder,
    Json,
    Yaml,
    Files,
}

impl ParserKind {
    pub const ALL: [ParserKind; 10] = [
        Self::Strings,
        Self::StringsCatalog,
        Self::Assets,
        Self::Plists,
        Self::Fonts,
        Self::CoreData,
        Self::InterfaceBuilder,
        Self::Json,
        Self::Yaml,
        Self::Files,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strings => "strings",
            Self::StringsCatalog => "stringsCatalog",
            Self::Assets => "assets",
            Self::Plists => "plists",
            Self::Fonts => "fonts",
            Self::CoreData => "coreData",
            Self::InterfaceBuilder => "interfaceBuilder",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Files => "files",
        }
    }
}

impl fmt::Display for ParserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParserKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| DomainError::UnknownParser(s.to_string()))
    }
}

// ── ParserOption ──────────────────────────────────────────────────────────────

/// A single parser option value.
///
/// Closed set of literal shapes. Integers and floats are kept apart so that a
/// value written as `1` never comes back as `1.0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParserOption {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<ParserOption>),
    Map(BTreeMap<String, ParserOption>),
}

impl ParserOption {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ParserOption]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, ParserOption>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

// Floats compare by bit pattern so that `Eq` and `Hash` stay consistent.
impl PartialEq for ParserOption {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ParserOption {}

impl Hash for ParserOption {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Bool(b) => b.hash(state),
            Self::Integer(i) => i.hash(state),
            Self::Float(f) => f.to_bits().hash(state),
            Self::String(s) => s.hash(state),
            Self::List(items) => items.hash(state),
            Self::Map(entries) => entries.hash(state),
        }
    }
}

impl From<&str> for ParserOption {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParserOption {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ParserOption {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ParserOption {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for ParserOption {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ParserOption {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<ParserOption>> for ParserOption {
    fn from(value: Vec<ParserOption>) -> Self {
        Self::List(value)
    }
}

impl From<BTreeMap<String, ParserOption>> for ParserOption {
    fn from(value: BTreeMap<String, ParserOption>) -> Self {
        Self::Map(value)
    }
}

impl<K: Into<String>> FromIterator<(K, ParserOption)> for ParserOption {
    fn from_iter<I: IntoIterator<Item = (K, ParserOption)>>(iter: I) -> Self {
        Self::Map(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl FromIterator<ParserOption> for ParserOption {
    fn from_iter<I: IntoIterator<Item = ParserOption>>(iter: I) -> Self {
        Self::List(iter.into_iter().collect())
    }
}

// ── Template ──────────────────────────────────────────────────────────────────

/// Where the code template of a synthesizer comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SynthesizerTemplate {
    /// A template file at an absolute path.
    File(PathBuf),
    /// A built-in template, by name.
    DefaultTemplate(String),
}

// ── ResourceSynthesizer ───────────────────────────────────────────────────────

/// How one class of resource files is turned into generated accessors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSynthesizer {
    pub parser: ParserKind,
    #[serde(default)]
    pub parser_options: BTreeMap<String, ParserOption>,
    pub extensions: BTreeSet<String>,
    pub template: SynthesizerTemplate,
}

impl ResourceSynthesizer {
    pub fn new(
        parser: ParserKind,
        parser_options: BTreeMap<String, ParserOption>,
        extensions: impl IntoIterator<Item = impl Into<String>>,
        template: SynthesizerTemplate,
    ) -> Self {
        Self {
            parser,
            parser_options,
            extensions: extensions.into_iter().map(Into::into).collect(),
            template,
        }
    }

    /// The synthesizers applied when a project does not configure its own.
    pub fn defaults() -> Vec<Self> {
        let builtin = |parser, extensions: &[&str], template: &str| {
            Self::new(
                parser,
                BTreeMap::new(),
                extensions.iter().copied(),
                SynthesizerTemplate::DefaultTemplate(template.to_string()),
            )
        };

        vec![
            builtin(ParserKind::Strings, &["strings", "stringsdict"], "Strings"),
            builtin(ParserKind::Assets, &["xcassets"], "Assets"),
            builtin(ParserKind::Plists, &["plist"], "Plists"),
            builtin(ParserKind::Fonts, &["otf", "ttc", "ttf", "woff"], "Fonts"),
        ]
    }

    /// Whether this synthesizer claims the given resource path.
    pub fn claims(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.contains(&ext.to_ascii_lowercase()))
    }
}
