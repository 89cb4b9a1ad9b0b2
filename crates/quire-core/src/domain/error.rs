// ============================================================================
// domain/error.rs - CONTENT DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (reported once per file, logged by the caller)
/// - Categorizable (for CLI display and HTTP status mapping)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Parse Errors
    // ========================================================================
    #[error("Invalid front matter in '{source_name}': {reason}")]
    InvalidFrontMatter { source_name: String, reason: String },

    #[error("Invalid slug '{slug}': {reason}")]
    InvalidSlug { slug: String, reason: String },

    // ========================================================================
    // Theme Errors
    // ========================================================================
    #[error("Invalid theme path '{path}': {reason}")]
    InvalidThemePath { path: String, reason: String },

    // ========================================================================
    // View Errors
    // ========================================================================
    #[error("View model could not be encoded: {reason}")]
    ViewEncoding { reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFrontMatter { source_name, .. } => vec![
                format!("Fix the YAML block at the top of {}", source_name),
                "Front matter must be delimited by '---' lines".into(),
                "Supported keys: title, description, ogImage, date, layout, source".into(),
            ],
            Self::InvalidSlug { slug, .. } => vec![
                format!("Rename the file that produced slug '{}'", slug),
                "Slugs come from the file name without its extension".into(),
            ],
            Self::InvalidThemePath { path, .. } => vec![
                format!("Theme paths are relative and slash separated: '{}'", path),
                "'..' components and absolute paths are rejected".into(),
            ],
            Self::ViewEncoding { .. } => vec!["This appears to be a bug in quire".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidFrontMatter { .. } | Self::InvalidSlug { .. } => {
                ErrorCategory::Validation
            }
            Self::InvalidThemePath { .. } => ErrorCategory::Validation,
            Self::ViewEncoding { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Internal,
}
