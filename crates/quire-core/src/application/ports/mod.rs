//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `quire-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `ArticleRepository`: Article index storage
//!   - `ContentSource`: Markdown documents
//!   - `ThemeSource`: Templates and assets
//!   - `LayoutRenderer`, `MarkdownRenderer`: Rendering
//!   - `Filesystem`: Static output
//!
//! - **Driving (Input) Ports**: Called by the host, implemented by application
//!   - `Module`: Lifecycle (name, mount, start, stop)
//!   - `Router`, `Request`, `Response`: HTTP-shaped read surface

pub mod input;
pub mod output;

pub use input::{Handler, MAX_AGE_LONG, MAX_AGE_SHORT, Module, Request, Response, Router};
pub use output::{
    ArticleRepository, ContentSource, Filesystem, LayoutRenderer, MarkdownRenderer, ThemeEntry,
    ThemeSource,
};
