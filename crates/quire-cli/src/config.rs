//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only sees the values derived from it
//! ([`SiteOptions`], paths, the highlight theme).
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (applied by [`AppConfig::apply_sources`])
//! 2. `QUIRE_*` environment variables, `__` between nested keys
//!    (`QUIRE_SITE__INDEX_LIMIT=10`)
//! 3. Config file: `--config FILE`, else `./quire.toml`, else the per-user
//!    config file
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use quire_core::application::SiteOptions;

use crate::{
    cli::SourceArgs,
    error::{CliError, CliResult},
};

/// Name of the project-local config file.
pub const LOCAL_CONFIG: &str = "quire.toml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "QUIRE";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub storage: StorageConfig,
    pub site: SiteConfig,
    pub markdown: MarkdownConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Markdown articles.
    pub content: PathBuf,
    /// Static site output.
    pub output: PathBuf,
    /// Live theme directory. Missing means embedded theme only.
    pub theme: PathBuf,
    /// `navigation.json`, `themes.json`, `meta.yml`.
    pub data: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file, or `:memory:` to rebuild the index every run.
    pub database: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub index_limit: usize,
    pub feed_limit: usize,
    pub template_ext: String,
    pub max_layout_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// syntect theme for code blocks.
    pub theme: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content: "content".into(),
            output: "public".into(),
            theme: "theme".into(),
            data: "data".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: quire_adapters::repository::IN_MEMORY.into(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        let options = SiteOptions::default();
        Self {
            index_limit: options.index_limit,
            feed_limit: options.feed_limit,
            template_ext: "html".into(),
            max_layout_depth: quire_adapters::layout::DEFAULT_MAX_DEPTH,
        }
    }
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            theme: quire_adapters::markdown::DEFAULT_THEME.into(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            storage: StorageConfig::default(),
            site: SiteConfig::default(),
            markdown: MarkdownConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the config file, and the environment.
    ///
    /// `config_file` is the path passed via `--config`. An explicit file must
    /// exist; the implicit locations are optional.
    pub fn load(config_file: Option<&PathBuf>) -> CliResult<Self> {
        let defaults = Config::try_from(&Self::default()).map_err(config_error)?;
        let mut builder = Config::builder().add_source(defaults);

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path.as_path()).format(FileFormat::Toml)),
            None => {
                let path = Self::config_path();
                builder.add_source(
                    File::from(path.as_path())
                        .format(FileFormat::Toml)
                        .required(false),
                )
            }
        };

        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error)
    }

    /// The config file that [`Self::load`] reads when `--config` is absent.
    ///
    /// `./quire.toml` when it exists, otherwise the per-user file from
    /// `directories::ProjectDirs`.
    pub fn config_path() -> PathBuf {
        let local = PathBuf::from(LOCAL_CONFIG);
        if local.is_file() {
            return local;
        }
        Self::user_config_path().unwrap_or(local)
    }

    /// Per-user config file, if the platform has a config directory.
    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "quire").map(|d| d.config_dir().join("config.toml"))
    }

    /// Apply per-command path overrides.
    pub fn apply_sources(&mut self, args: &SourceArgs) {
        if let Some(content) = &args.content {
            self.paths.content.clone_from(content);
        }
        if let Some(theme) = &args.theme {
            self.paths.theme.clone_from(theme);
        }
        if let Some(data) = &args.data {
            self.paths.data.clone_from(data);
        }
        if let Some(database) = &args.database {
            self.storage.database.clone_from(database);
        }
    }

    pub fn site_options(&self) -> SiteOptions {
        SiteOptions {
            index_limit: self.site.index_limit,
            feed_limit: self.site.feed_limit,
        }
    }

    /// `true` when the index lives only as long as the process.
    pub fn in_memory_index(&self) -> bool {
        self.storage.database == Path::new(quire_adapters::repository::IN_MEMORY)
    }

    /// Look up a dotted key, e.g. `site.feed_limit`.
    pub fn get(&self, key: &str) -> CliResult<String> {
        let value = match key {
            "paths.content" => self.paths.content.display().to_string(),
            "paths.output" => self.paths.output.display().to_string(),
            "paths.theme" => self.paths.theme.display().to_string(),
            "paths.data" => self.paths.data.display().to_string(),
            "storage.database" => self.storage.database.display().to_string(),
            "site.index_limit" => self.site.index_limit.to_string(),
            "site.feed_limit" => self.site.feed_limit.to_string(),
            "site.template_ext" => self.site.template_ext.clone(),
            "site.max_layout_depth" => self.site.max_layout_depth.to_string(),
            "markdown.theme" => self.markdown.theme.clone(),
            "output.no_color" => self.output.no_color.to_string(),
            "output.format" => self.output.format.clone(),
            _ => {
                return Err(CliError::ConfigError {
                    message: format!("Unknown config key: '{key}'"),
                    source: None,
                });
            }
        };
        Ok(value)
    }

    /// Render as TOML, the format `quire init` writes.
    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::ConfigError {
            message: format!("Failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

fn config_error(e: config::ConfigError) -> CliError {
    CliError::ConfigError {
        message: e.to_string(),
        source: Some(Box::new(e)),
    }
}
