//! Output filesystem adapters.

mod local;
mod memory;

pub use local::LocalFilesystem;
pub(crate) use local::map_io_error;
pub use memory::MemoryFilesystem;
