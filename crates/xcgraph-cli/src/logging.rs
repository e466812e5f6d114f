//! Tracing subscriber setup for the `xcgraph` binary.
//!
//! The library crates only emit events; this module decides which of them
//! reach stderr.
//!
//! | Flag(s)     | xcgraph crates | What shows up                                   |
//! |-------------|----------------|-------------------------------------------------|
//! | `--quiet`   | ERROR          | nothing but errors                              |
//! | (none)      | WARN           | stale exception paths, failed targets           |
//! | `-v`        | INFO           | project progress, mapped/failed counts          |
//! | `-vv`       | DEBUG          | per-target classification counts, skipped dirs  |
//! | `-vvv`      | TRACE          | everything, with module paths and thread ids    |
//!
//! `--timings` additionally reports how long each target took to map.
//! `RUST_LOG` replaces the whole filter when set.

use std::io::IsTerminal as _;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::cli::GlobalArgs;

const CRATES: [&str; 3] = ["xcgraph", "xcgraph_core", "xcgraph_adapters"];

/// Module whose spans cover one target each.
const MAPPING_SERVICES: &str = "xcgraph_core::application::services";

/// Install the global subscriber. Call once, before anything is logged.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let level = level_for(args);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives(level, args.timings)));

    // Module paths and thread ids only help once the rayon pool is traced.
    let detailed = level >= LevelFilter::DEBUG;
    let span_events = if args.timings {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(detailed)
        .with_thread_ids(level == LevelFilter::TRACE)
        .with_span_events(span_events)
        .with_ansi(!args.no_color && std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))
}

/// Level for the xcgraph crates from `--quiet` and the `-v` count.
fn level_for(args: &GlobalArgs) -> LevelFilter {
    if args.quiet {
        return LevelFilter::ERROR;
    }
    match args.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// `EnvFilter` directives: every xcgraph crate at `level`, dependencies
/// at their defaults. Timings need the mapping spans enabled at INFO even
/// when the rest is quieter.
fn directives(level: LevelFilter, timings: bool) -> String {
    let mut directives: Vec<String> = CRATES.iter().map(|c| format!("{c}={level}")).collect();
    if timings && level < LevelFilter::INFO {
        directives.push(format!("{MAPPING_SERVICES}={}", LevelFilter::INFO));
    }
    directives.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(verbose: u8, quiet: bool) -> GlobalArgs {
        GlobalArgs {
            verbose,
            quiet,
            no_color: true,
            ..GlobalArgs::default()
        }
    }

    #[test]
    fn verbosity_steps_through_levels() {
        assert_eq!(level_for(&args(0, false)), LevelFilter::WARN);
        assert_eq!(level_for(&args(1, false)), LevelFilter::INFO);
        assert_eq!(level_for(&args(2, false)), LevelFilter::DEBUG);
        assert_eq!(level_for(&args(3, false)), LevelFilter::TRACE);
        assert_eq!(level_for(&args(10, false)), LevelFilter::TRACE);
    }

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(level_for(&args(0, true)), LevelFilter::ERROR);
        assert_eq!(level_for(&args(3, true)), LevelFilter::ERROR);
    }

    #[test]
    fn every_crate_gets_the_level() {
        let filter = directives(LevelFilter::DEBUG, false);
        for krate in CRATES {
            assert!(filter.contains(&format!("{krate}={}", LevelFilter::DEBUG)));
        }
        assert!(!filter.contains(MAPPING_SERVICES));
    }

    #[test]
    fn timings_enable_mapping_spans_when_quiet() {
        let filter = directives(LevelFilter::WARN, true);
        assert!(filter.ends_with(&format!("{MAPPING_SERVICES}={}", LevelFilter::INFO)));
        assert!(!directives(LevelFilter::TRACE, true).contains(MAPPING_SERVICES));
    }

    #[test]
    fn directives_parse_as_env_filter() {
        for level in [LevelFilter::ERROR, LevelFilter::WARN, LevelFilter::TRACE] {
            assert!(EnvFilter::try_new(directives(level, true)).is_ok());
        }
    }
}
