//! Flags accepted by every subcommand, flattened into [`super::Cli`].

use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Log more about the mapping pass; repeat for more detail.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        long_help = "Log more about the mapping pass:
    (none)  - warnings: stale exception paths, failed targets
    -v      - project progress and mapped/failed counts
    -vv     - per-target classification counts, skipped package directories
    -vvv    - everything, with module paths and thread ids"
    )]
    pub verbose: u8,

    /// Only report errors.
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log how long each target took to map.
    #[arg(long = "timings", global = true)]
    pub timings: bool,

    /// Disable colored output (also set by `NO_COLOR`).
    #[arg(long = "no-color", global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Read configuration from FILE instead of the usual locations.
    #[arg(short = 'c', long = "config", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// How to print graphs and classifications.
    #[arg(long = "format", global = true, value_enum, default_value = "auto")]
    pub output_format: OutputFormat,
}

/// Rendering of command output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `output.format` from the configuration.
    #[default]
    Auto,
    /// Indented target listing with colors.
    Human,
    /// Indented target listing without colors.
    Plain,
    /// The graph or classification as JSON.
    Json,
}
