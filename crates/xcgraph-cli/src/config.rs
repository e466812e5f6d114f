//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only sees the
//! [`ClassificationOptions`] slice of it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `XCGRAPH_MAPPING__PARALLEL=false`
//! 3. `.xcgraph.toml` in the current directory
//! 4. The user config file, or the file given with `--config`
//! 5. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use xcgraph_core::application::ClassificationOptions;

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".xcgraph.toml";

const ENV_PREFIX: &str = "XCGRAPH";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// How ambiguous membership is resolved.
    pub classification: ClassificationOptions,
    /// Project mapping settings.
    pub mapping: MappingConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Map the targets of a project concurrently.
    pub parallel: bool,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `human`, `plain` or `json`.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration, layering every source over the defaults.
    ///
    /// `config_file` is the path the user passed via `--config`; when given
    /// it must exist and replaces the user config file.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        Self::load_from(config_file, Path::new(LOCAL_CONFIG_FILE))
    }

    fn load_from(config_file: Option<&PathBuf>, local: &Path) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to build default configuration")?;

        let user_file = match config_file {
            Some(path) => File::from(path.as_path()).format(FileFormat::Toml),
            None => File::from(Self::config_path().as_path())
                .format(FileFormat::Toml)
                .required(false),
        };

        let settings = Config::builder()
            .add_source(defaults)
            .add_source(user_file)
            .add_source(File::from(local).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration sources")?;

        settings
            .try_deserialize()
            .context("Configuration has invalid values")
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.xcgraph.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "xcgraph", "xcgraph")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }
}
