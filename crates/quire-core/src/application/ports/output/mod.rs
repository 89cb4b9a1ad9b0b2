//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `quire-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::{Article, ViewData};
use crate::error::QuireResult;

/// Port for the article index.
///
/// Implemented by:
/// - `quire_adapters::repository::SqliteRepository` (production)
/// - `quire_adapters::repository::MemoryRepository` (testing)
///
/// ## Design Notes
///
/// - Slug is the identity: `upsert` replaces the whole row
/// - `list` and `search` order by date descending, then slug ascending;
///   undated articles sort last
/// - Writes are serialized by the implementation
#[cfg_attr(test, mockall::automock)]
pub trait ArticleRepository: Send + Sync {
    /// Create the schema if it does not exist. Safe to call repeatedly.
    fn init_schema(&self) -> QuireResult<()>;

    /// Fetch one article, or `ArticleNotFound`.
    fn get_by_slug(&self, slug: &str) -> QuireResult<Article>;

    /// A page of articles, newest first.
    fn list(&self, offset: usize, limit: usize) -> QuireResult<Vec<Article>>;

    /// Case-insensitive substring match on title, description, and slug.
    fn search(&self, term: &str) -> QuireResult<Vec<Article>>;

    /// Insert or fully replace by slug. Unset timestamps are filled in.
    fn upsert(&self, article: &Article) -> QuireResult<()>;

    fn count(&self) -> QuireResult<usize>;
}

/// Port for the markdown content directory.
///
/// Implemented by:
/// - `quire_adapters::content::LocalContent` (walks a directory)
#[cfg_attr(test, mockall::automock)]
pub trait ContentSource: Send + Sync {
    /// Every markdown document, sorted, as paths the source can read back.
    fn documents(&self) -> QuireResult<Vec<PathBuf>>;

    /// Full text of one document.
    fn read(&self, path: &Path) -> QuireResult<String>;
}

/// One entry of a theme directory listing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ThemeEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Port for read-only theme files.
///
/// Names are relative and slash separated (`layouts/base.html`); `""` and
/// `"."` name the root.
///
/// Implemented by:
/// - `quire_adapters::theme::LocalTheme` (live directory)
/// - `quire_adapters::theme::MemoryTheme` (embedded default theme, tests)
/// - `quire_adapters::theme::OverlayTheme` (live over embedded)
pub trait ThemeSource: Send + Sync {
    /// Read a whole file.
    fn open(&self, name: &str) -> QuireResult<Vec<u8>>;

    /// List a directory, sorted by name.
    fn read_dir(&self, name: &str) -> QuireResult<Vec<ThemeEntry>>;

    /// File names matching a glob pattern, sorted.
    fn glob(&self, pattern: &str) -> QuireResult<Vec<String>>;
}

/// Port for template rendering with layout chaining.
///
/// Implemented by:
/// - `quire_adapters::layout::TeraLayoutRenderer`
pub trait LayoutRenderer: Send + Sync {
    /// Render `template` with `view`, wrapped in its layout chain.
    ///
    /// # Arguments
    ///
    /// * `template` - Theme-relative template name, e.g. `pages/index.html`
    /// * `view` - Page data merged over the shared site data
    fn render(&self, template: &str, view: &ViewData) -> QuireResult<String>;

    /// File extension of templates, without the dot.
    fn extension(&self) -> &str;
}

/// Port for markdown to HTML conversion. Never fails.
///
/// Implemented by:
/// - `quire_adapters::markdown::HighlightingRenderer`
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> String;
}

/// Port for writing the static site.
///
/// Implemented by:
/// - `quire_adapters::filesystem::LocalFilesystem` (production)
/// - `quire_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> QuireResult<()>;

    /// Write a whole file, replacing any previous content.
    fn write_file(&self, path: &Path, content: &[u8]) -> QuireResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> QuireResult<()>;

    /// Move a directory to a new location.
    fn rename(&self, from: &Path, to: &Path) -> QuireResult<()>;
}
