//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "index the content" or "generate the site".

pub mod blog_module;
pub mod generator_service;
pub mod handlers;
pub mod index_service;
pub mod page_service;

pub use blog_module::BlogModule;
pub use generator_service::{GenerationReport, GeneratorService};
pub use handlers::{BlogHandlers, WILDCARD_PARAM, content_type};
pub use index_service::{IndexService, ScanReport};
pub use page_service::{PageService, SiteOptions};
