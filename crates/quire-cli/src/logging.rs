//! Tracing setup for the `quire` binary.
//!
//! The library crates only emit events: scan and build summaries at INFO,
//! one event per indexed article, rendered template and written file at
//! DEBUG, individual layout passes at TRACE. This module decides which of
//! them reach stderr.
//!
//! `RUST_LOG` wins when set. Otherwise `-q` keeps errors only, no flag shows
//! warnings (skipped dates, duplicate slugs, missing theme layers) and each
//! `-v` lowers the threshold one level.

use std::io::IsTerminal as _;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::GlobalArgs;

/// Log targets of the pipeline: the binary, core services, adapters.
const TARGETS: [&str; 3] = ["quire", "quire_core", "quire_adapters"];

/// Install the stderr subscriber. Calling it twice returns an error.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(pipeline_directives(threshold(args))));

    // stdout carries command results (listings, response bodies), so logs
    // stay on stderr
    let events = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!args.no_color && std::io::stderr().is_terminal())
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(events)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))
}

/// One directive per pipeline target, e.g. `quire=info,quire_core=info,...`.
fn pipeline_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_ascii_lowercase();
    TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn threshold(args: &GlobalArgs) -> LevelFilter {
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
