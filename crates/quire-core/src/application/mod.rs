//! Application layer for quire.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (IndexService, PageService, GeneratorService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! content rules itself. Parsing and view shaping live in `crate::domain`.

pub mod cancel;
pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    BlogHandlers, BlogModule, GenerationReport, GeneratorService, IndexService, PageService,
    ScanReport, SiteOptions,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    ArticleRepository, ContentSource, Filesystem, LayoutRenderer, MarkdownRenderer, Module,
    Request, Response, Router, ThemeEntry, ThemeSource,
};

pub use cancel::Cancellation;
pub use error::ApplicationError;
