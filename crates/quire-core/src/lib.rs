//! Quire Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the quire
//! markdown blog pipeline, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        quire-cli / hosting server       │
//! │    (Drives BlogModule, GeneratorService)│
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (IndexService, PageService, Generator)  │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Repository, Theme, Layout, Markdown)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     quire-adapters (Infrastructure)     │
//! │ (SQLite, OverlayTheme, Tera, syntect)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Article, FrontMatter, ViewData, Feed)  │
//! │         No I/O                          │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use quire_core::prelude::*;
//!
//! # fn wire(
//! #     content: Arc<dyn ContentSource>,
//! #     repository: Arc<dyn ArticleRepository>,
//! # ) -> QuireResult<()> {
//! let cancel = Cancellation::new();
//! repository.init_schema()?;
//! let report = IndexService::new(content, repository).scan(&cancel)?;
//! println!("indexed {} articles", report.indexed);
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        BlogHandlers, BlogModule, Cancellation, GenerationReport, GeneratorService, IndexService,
        PageService, ScanReport, SiteOptions,
        ports::{
            ArticleRepository, ContentSource, Filesystem, Handler, LayoutRenderer,
            MarkdownRenderer, Module, Request, Response, Router, ThemeEntry, ThemeSource,
        },
    };
    pub use crate::domain::{
        Article, FrontMatter, IndexView, PageView, PostView, RenderContext, SiteData, SiteMeta,
        ViewData, ViewModel,
    };
    pub use crate::error::{ErrorCategory, QuireError, QuireResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
