//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "quire",
    bin_name = "quire",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Markdown blog pipeline",
    long_about = "quire indexes a directory of markdown articles, renders them \
                  through a layered theme, and publishes a static site with an \
                  Atom feed.",
    after_help = "EXAMPLES:\n\
        \x20 quire generate --content posts --output public\n\
        \x20 quire list --limit 10\n\
        \x20 quire search rust --format json\n\
        \x20 quire request /api/blog/articles\n\
        \x20 quire completions bash > /usr/share/bash-completion/completions/quire",
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
    /// Scan the content directory into the article index.
    #[command(
        about = "Index markdown articles",
        after_help = "EXAMPLES:\n\
            \x20 quire index\n\
            \x20 quire index --content posts --database blog.db"
    )]
    Index(IndexArgs),

    /// Index, then write the static site.
    #[command(
        visible_alias = "build",
        about = "Generate the static site",
        after_help = "EXAMPLES:\n\
            \x20 quire generate\n\
            \x20 quire generate --output dist --theme my-theme"
    )]
    Generate(GenerateArgs),

    /// List indexed articles, newest first.
    #[command(
        visible_alias = "ls",
        about = "List articles",
        after_help = "EXAMPLES:\n\
            \x20 quire list\n\
            \x20 quire list --offset 10 --limit 10\n\
            \x20 quire list --format json"
    )]
    List(ListArgs),

    /// Search titles, descriptions, and slugs.
    #[command(
        about = "Search articles",
        after_help = "EXAMPLES:\n\
            \x20 quire search rust\n\
            \x20 quire search \"100%\" --format json"
    )]
    Search(SearchArgs),

    /// Print one article.
    #[command(
        about = "Show an article",
        after_help = "EXAMPLES:\n\
            \x20 quire show hello-world\n\
            \x20 quire show hello-world --html"
    )]
    Show(ShowArgs),

    /// Dispatch a GET through the in-process routes.
    #[command(
        about = "Serve one request",
        after_help = "EXAMPLES:\n\
            \x20 quire request /\n\
            \x20 quire request '/api/blog/search?q=rust'\n\
            \x20 quire request /assets/css/site.css"
    )]
    Request(RequestArgs),

    /// Write a default configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 quire init            # ./quire.toml\n\
            \x20 quire init --global   # per-user config\n\
            \x20 quire init --force    # overwrite"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 quire completions bash > ~/.local/share/bash-completion/completions/quire\n\
            \x20 quire completions zsh  > ~/.zfunc/_quire\n\
            \x20 quire completions fish > ~/.config/fish/completions/quire.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the resolved configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 quire config get site.index_limit\n\
            \x20 quire config list\n\
            \x20 quire config path"
    )]
    Config(ConfigCommands),
}

// ── shared source overrides ───────────────────────────────────────────────────

/// Overrides for where content, theme, data, and the index live.
#[derive(Debug, Default, Args)]
pub struct SourceArgs {
    /// Markdown content directory.
    #[arg(long = "content", value_name = "DIR", help = "Content directory")]
    pub content: Option<PathBuf>,

    /// Live theme directory layered over the embedded theme.
    #[arg(long = "theme", value_name = "DIR", help = "Theme override directory")]
    pub theme: Option<PathBuf>,

    /// Directory holding navigation.json, themes.json, and meta.yml.
    #[arg(long = "data", value_name = "DIR", help = "Site data directory")]
    pub data: Option<PathBuf>,

    /// SQLite database file, or `:memory:`.
    #[arg(long = "database", value_name = "PATH", help = "Article index database")]
    pub database: Option<PathBuf>,
}

// ── index / generate ──────────────────────────────────────────────────────────

/// Arguments for `quire index`.
#[derive(Debug, Args)]
pub struct IndexArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Arguments for `quire generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output directory. Replaced as a whole on success.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory"
    )]
    pub output: Option<PathBuf>,
}

// ── queries ───────────────────────────────────────────────────────────────────

/// Arguments for `quire list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Skip this many articles.
    #[arg(long = "offset", default_value_t = 0, help = "Articles to skip")]
    pub offset: usize,

    /// Return at most this many articles.
    #[arg(long = "limit", value_name = "N", help = "Maximum articles (default: all)")]
    pub limit: Option<usize>,

    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Arguments for `quire search`.
#[derive(Debug, Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Literal substring; `%` and `_` are not wildcards.
    #[arg(value_name = "TERM", help = "Search term")]
    pub term: String,

    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Arguments for `quire show`.
#[derive(Debug, Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(value_name = "SLUG", help = "Article slug")]
    pub slug: String,

    /// Print the fully rendered page instead of the stored markdown.
    #[arg(long = "html", help = "Render through the theme")]
    pub html: bool,
}

/// Output format for article listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// JSON array.
    Json,
}

// ── request ───────────────────────────────────────────────────────────────────

/// Arguments for `quire request`.
#[derive(Debug, Args)]
pub struct RequestArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Path with optional query string.
    #[arg(value_name = "PATH", help = "Request path, e.g. /blog/hello/")]
    pub path: String,

    /// Print only the body.
    #[arg(long = "body-only", help = "Omit the status line and headers")]
    pub body_only: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `quire init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to the per-user config location instead of `./quire.toml`.
    #[arg(long = "global", help = "Create per-user configuration")]
    pub global: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `quire completions`.
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

/// Subcommands for `quire config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `site.index_limit`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path of the configuration file in use.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_generate_overrides() {
        let cli = Cli::parse_from([
            "quire",
            "generate",
            "--content",
            "posts",
            "--output",
            "dist",
            "--database",
            ":memory:",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(args.source.content, Some(PathBuf::from("posts")));
        assert_eq!(args.output, Some(PathBuf::from("dist")));
        assert!(args.source.theme.is_none());
    }

    #[test]
    fn build_alias() {
        let cli = Cli::parse_from(["quire", "build"]);
        assert!(matches!(cli.command, Commands::Generate(_)));
    }

    #[test]
    fn list_defaults() {
        let cli = Cli::parse_from(["quire", "ls"]);
        let Commands::List(args) = cli.command else {
            panic!("expected List command");
        };
        assert_eq!(args.offset, 0);
        assert_eq!(args.limit, None);
        assert_eq!(args.format, ListFormat::Table);
    }

    #[test]
    fn search_requires_term() {
        assert!(Cli::try_parse_from(["quire", "search"]).is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["quire", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }
}
