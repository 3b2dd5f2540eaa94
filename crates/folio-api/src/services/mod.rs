//! Service layer shared by handlers.

pub mod view_cache;

pub use view_cache::{CacheStats, ViewCache};
