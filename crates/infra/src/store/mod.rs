//! Relational storage boundary.
//!
//! This module defines an infrastructure-facing abstraction for persisting the
//! storefront's records without making any storage assumptions, plus the two
//! implementations: in-memory (dev/test) and Postgres (production).

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use r#trait::{Store, StoreError};
