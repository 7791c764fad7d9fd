//! `gamevault-infra` — the storage boundary and checkout orchestration.
//!
//! The [`store::Store`] trait is the single data-access seam: an explicitly
//! constructed handle passed into services (no global client), with an
//! in-memory implementation for dev/test and a Postgres implementation for
//! production.

pub mod checkout;
pub mod store;

pub use checkout::{CheckoutError, CheckoutService};
pub use store::{InMemoryStore, PostgresStore, Store, StoreError};
