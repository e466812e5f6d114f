//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use xcgraph_core::domain::UnlistedHeaders;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "xcgraph",
    bin_name = "xcgraph",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Map Xcode-style project descriptions to a normalized target graph",
    long_about = "xcgraph reads an already-parsed project description, enumerates \
                  synchronized folders on disk and prints the typed target graph.",
    after_help = "EXAMPLES:\n\
        \x20 xcgraph map project.json\n\
        \x20 xcgraph map project.toml --format json --sequential\n\
        \x20 xcgraph classify App/ --target App\n\
        \x20 xcgraph completions bash > /usr/share/bash-completion/completions/xcgraph",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Map every target of a raw project description.
    #[command(
        visible_alias = "m",
        about = "Map a raw project description to a target graph",
        after_help = "EXAMPLES:\n\
            \x20 xcgraph map project.json\n\
            \x20 xcgraph map project.json --format json > graph.json\n\
            \x20 xcgraph map project.toml --strict --unlisted-headers project"
    )]
    Map(MapArgs),

    /// Classify a directory as a synchronized group.
    #[command(
        about = "Classify the files of a directory",
        after_help = "EXAMPLES:\n\
            \x20 xcgraph classify App\n\
            \x20 xcgraph classify Sources/Core --target Core --format json"
    )]
    Classify(ClassifyArgs),

    /// Initialise an xcgraph configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 xcgraph init           # user config location\n\
            \x20 xcgraph init --local   # .xcgraph.toml in CWD\n\
            \x20 xcgraph init --force   # overwrite an existing file"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 xcgraph completions bash > ~/.local/share/bash-completion/completions/xcgraph\n\
            \x20 xcgraph completions zsh  > ~/.zfunc/_xcgraph\n\
            \x20 xcgraph completions fish > ~/.config/fish/completions/xcgraph.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the xcgraph configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 xcgraph config get mapping.parallel\n\
            \x20 xcgraph config list\n\
            \x20 xcgraph config path"
    )]
    Config(ConfigCommands),
}

// ── shared classification flags ───────────────────────────────────────────────

/// Flags overriding the `[classification]` section of the config.
#[derive(Debug, Args)]
pub struct ClassificationArgs {
    /// Bucket for headers that no exception places.
    #[arg(
        long = "unlisted-headers",
        value_name = "POLICY",
        value_enum,
        help = "Visibility of headers without an override"
    )]
    pub unlisted_headers: Option<HeaderPolicy>,

    /// Fail on conflicting exception overrides instead of resolving them.
    #[arg(long = "strict", help = "Treat conflicting exceptions as errors")]
    pub strict: bool,
}

/// CLI mirror of [`UnlistedHeaders`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HeaderPolicy {
    /// `.h` public, `.hpp` private, `*_Private.h` private.
    ByExtension,
    /// Everything project-visible.
    Project,
}

impl From<HeaderPolicy> for UnlistedHeaders {
    fn from(policy: HeaderPolicy) -> Self {
        match policy {
            HeaderPolicy::ByExtension => Self::ByExtension,
            HeaderPolicy::Project => Self::Project,
        }
    }
}

// ── map ───────────────────────────────────────────────────────────────────────

/// Arguments for `xcgraph map`.
#[derive(Debug, Args)]
pub struct MapArgs {
    /// Raw project description (`.json` or `.toml`).
    #[arg(value_name = "RAW_PROJECT", help = "Raw project description file")]
    pub project: PathBuf,

    /// Map targets one at a time.
    #[arg(long = "sequential", help = "Disable parallel target mapping")]
    pub sequential: bool,

    /// Only print these targets.
    #[arg(
        short = 't',
        long = "target",
        value_name = "NAME",
        help = "Only show the named target (repeatable)"
    )]
    pub targets: Vec<String>,

    #[command(flatten)]
    pub classification: ClassificationArgs,
}

// ── classify ──────────────────────────────────────────────────────────────────

/// Arguments for `xcgraph classify`.
#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Directory to enumerate.
    #[arg(value_name = "DIR", help = "Directory to classify")]
    pub dir: PathBuf,

    /// Target name used for exception scoping and logs.
    #[arg(
        short = 't',
        long = "target",
        value_name = "NAME",
        help = "Target name (default: directory name)"
    )]
    pub target: Option<String>,

    #[command(flatten)]
    pub classification: ClassificationArgs,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `xcgraph init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.xcgraph.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `xcgraph completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `xcgraph config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `mapping.parallel`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_map_command() {
        let cli = Cli::parse_from([
            "xcgraph",
            "map",
            "project.json",
            "--sequential",
            "--unlisted-headers",
            "project",
            "-t",
            "App",
            "-t",
            "AppTests",
        ]);
        let Commands::Map(args) = cli.command else {
            panic!("expected Map command");
        };
        assert_eq!(args.project, PathBuf::from("project.json"));
        assert!(args.sequential);
        assert!(!args.classification.strict);
        assert_eq!(
            args.classification.unlisted_headers,
            Some(HeaderPolicy::Project)
        );
        assert_eq!(args.targets, vec!["App", "AppTests"]);
    }

    #[test]
    fn format_is_global() {
        let cli = Cli::parse_from(["xcgraph", "classify", "App", "--format", "json"]);
        assert_eq!(cli.global.output_format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Classify(_)));
    }

    #[test]
    fn header_policy_converts() {
        assert_eq!(
            UnlistedHeaders::from(HeaderPolicy::ByExtension),
            UnlistedHeaders::ByExtension
        );
    }

    #[test]
    fn timings_is_global() {
        let cli = Cli::parse_from(["xcgraph", "map", "project.json", "--timings", "-vv"]);
        assert!(cli.global.timings);
        assert_eq!(cli.global.verbose, 2);
        assert!(!Cli::parse_from(["xcgraph", "map", "project.json"]).global.timings);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["xcgraph", "--quiet", "--verbose", "config", "list"]);
        assert!(result.is_err());
    }
}
