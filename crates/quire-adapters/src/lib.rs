//! Infrastructure adapters for quire.
//!
//! This crate implements the ports defined in `quire_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod content;
pub mod filesystem;
pub mod layout;
pub mod markdown;
pub mod repository;
pub mod routing;
pub mod site_data;
pub mod theme;

// Re-export commonly used adapters
pub use content::LocalContent;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use layout::TeraLayoutRenderer;
pub use markdown::HighlightingRenderer;
pub use repository::{MemoryRepository, SqliteRepository};
pub use routing::RouteTable;
pub use site_data::load_site_data;
pub use theme::{LocalTheme, MemoryTheme, OverlayTheme};
