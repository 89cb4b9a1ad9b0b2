//! Flags shared by every `quire` command, flattened into [`super::Cli`].

use std::path::PathBuf;

use clap::Args;

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log more of the pipeline. Repeat for more detail.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        long_help = "Log more of the pipeline to stderr:
    (none)  skipped dates, duplicate slugs, missing theme layers
    -v      scan counts and the generation report
    -vv     every indexed article, rendered template and written file
    -vvv    individual layout passes
RUST_LOG overrides these levels when set."
    )]
    pub verbose: u8,

    /// Print command results only, no progress or status lines.
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Plain status output without ANSI colours.
    #[arg(long = "no-color", global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// quire.toml to read instead of ./quire.toml or the per-user file.
    ///
    /// Values from QUIRE_* environment variables and command flags still
    /// take precedence over the file.
    #[arg(short = 'c', long = "config", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Rendering of status lines. Listings and response bodies are unaffected.
    #[arg(long = "output-format", global = true, value_enum, default_value = "auto")]
    pub output_format: OutputFormat,
}

/// Status line rendering. `Auto` defers to `output.format`, then the terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Auto,
    /// Coloured status lines and a spinner while scanning or generating.
    Human,
    /// Uncoloured lines, no spinner. Suited to scripts and CI logs.
    Plain,
}

impl OutputFormat {
    /// Parse the `output.format` config value. Unknown values mean `Auto`.
    pub fn from_config(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "human" => Self::Human,
            "plain" => Self::Plain,
            _ => Self::Auto,
        }
    }
}
