//! Application layer errors.
//!
//! These errors represent failures in orchestration, not content rules.
//! Content errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// No article is stored under this slug.
    #[error("Article not found: {slug}")]
    ArticleNotFound { slug: String },

    /// A template (page or layout) could not be loaded.
    #[error("Template not found: {name}")]
    TemplateNotFound { name: String },

    /// Neither theme layer holds this file.
    #[error("Theme file not found: {name}")]
    ThemeFileNotFound { name: String },

    /// Repository I/O failed.
    #[error("Storage error during {operation}: {reason}")]
    StorageFailed {
        operation: &'static str,
        reason: String,
    },

    /// No mounted route matches the request path.
    #[error("No route for {path}")]
    RouteNotFound { path: String },

    /// Template execution failed.
    #[error("Rendering '{template}' failed: {reason}")]
    RenderingFailed { template: String, reason: String },

    /// A layout chain revisited a template.
    #[error("Layout cycle detected: {chain}")]
    LayoutCycle { chain: String },

    /// A layout chain grew past the configured depth.
    #[error("Layout chain starting at '{template}' exceeds {max_depth} levels")]
    LayoutDepthExceeded { template: String, max_depth: usize },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Shared state access failed (lock poisoned).
    #[error("Store lock poisoned")]
    StoreLockError,

    /// A required request parameter is missing or blank.
    #[error("Missing required parameter '{parameter}'")]
    MissingParameter { parameter: &'static str },

    /// The caller cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,

    /// Rollback failed (best-effort cleanup failed).
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ArticleNotFound { slug } => vec![
                format!("No article with slug '{}'", slug),
                "Try: quire list to see indexed articles".into(),
                "Re-run: quire index after adding markdown files".into(),
            ],
            Self::TemplateNotFound { name } => vec![
                format!("Add '{}' to your theme directory", name),
                "Layouts live in layouts/<name>.html, pages in pages/".into(),
            ],
            Self::ThemeFileNotFound { name } => vec![
                format!("'{}' exists in neither the live nor the embedded theme", name),
            ],
            Self::RouteNotFound { .. } => vec![
                "Routes: /, /blog/, /blog/<slug>/, /feed.xml, /assets/<file>, /api/blog/...".into(),
            ],
            Self::StorageFailed { .. } => vec![
                "Check that the database path is writable".into(),
                "Delete the database file to rebuild the index from scratch".into(),
            ],
            Self::RenderingFailed { template, .. } => vec![
                format!("Check the template syntax in '{}'", template),
                "Run with -vv to see the full render error".into(),
            ],
            Self::LayoutCycle { .. } | Self::LayoutDepthExceeded { .. } => vec![
                "A layout must not (directly or indirectly) wrap itself".into(),
                "layouts/base.html must not declare a layout".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have read/write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::StoreLockError => vec![
                "A previous operation panicked while holding a lock".into(),
                "Restart the process".into(),
            ],
            Self::MissingParameter { parameter } => {
                vec![format!("Pass a non-empty '{}' parameter", parameter)]
            }
            Self::Cancelled => vec!["The operation was cancelled before it finished".into()],
            Self::RollbackFailed { path, .. } => vec![format!(
                "Remove the leftover directory manually: {}",
                path.display()
            )],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ArticleNotFound { .. }
            | Self::TemplateNotFound { .. }
            | Self::ThemeFileNotFound { .. }
            | Self::RouteNotFound { .. } => ErrorCategory::NotFound,
            Self::MissingParameter { .. } => ErrorCategory::Validation,
            Self::LayoutCycle { .. } | Self::LayoutDepthExceeded { .. } => {
                ErrorCategory::Configuration
            }
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::StorageFailed { .. }
            | Self::RenderingFailed { .. }
            | Self::FilesystemError { .. }
            | Self::StoreLockError
            | Self::RollbackFailed { .. } => ErrorCategory::Internal,
        }
    }
}
