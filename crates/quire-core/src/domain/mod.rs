//! Core domain layer for quire.
//!
//! Pure content logic: articles, front matter, site data, view models, and
//! the Atom document. No I/O happens here; files and storage are reached
//! through the ports in `crate::application`.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: Callers hand in text, get values back
//! - **Immutable shared data**: `SiteData` is built once and only read

pub mod article;
pub mod error;
pub mod feed;
pub mod front_matter;
pub mod site;
pub mod view;

pub use article::{ARTICLE_URL_PREFIX, Article, DEFAULT_LAYOUT};
pub use error::{DomainError, ErrorCategory};
pub use feed::FeedEntry;
pub use front_matter::FrontMatter;
pub use site::{Author, NavItem, SiteData, SiteMeta};
pub use view::{
    ArticleSummary, IndexView, PageView, PostView, RenderContext, ViewData, ViewModel,
};
