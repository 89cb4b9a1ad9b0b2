//! Article repository adapters.

mod memory;
mod sqlite;

pub use memory::MemoryRepository;
pub use sqlite::SqliteRepository;

/// Database location that keeps the index in memory.
pub const IN_MEMORY: &str = ":memory:";

/// Order shared by `list` and `search`: newest first, undated last, then by
/// slug so equal dates come back in a stable order.
pub(crate) fn newest_first(a: &quire_core::domain::Article, b: &quire_core::domain::Article) -> std::cmp::Ordering {
    match (a.date, b.date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    }
    .then_with(|| a.slug().cmp(b.slug()))
}
