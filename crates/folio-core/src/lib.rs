//! # folio-core
//!
//! Core types, traits, and presentation tables for folio.
//!
//! This crate provides the polymorphic `(kind, id)` entity address, the
//! metadata overlay, the record shapes, and the storage traits that the other
//! folio crates depend on.

pub mod cascade;
pub mod defaults;
pub mod error;
pub mod logging;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod models;
pub mod presentation;
pub mod traits;

// Re-export commonly used types at crate root
pub use cascade::{resolve_defaults, Cascade, DefaultResolution, Resolved};
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
