//! `gamevault-api` — HTTP surface for the storefront.
//!
//! Transport concerns only: bearer-token authentication, role-based
//! authorization, JSON mapping, and consistent error responses. Business
//! rules live in the domain crates and behind the storage boundary.

pub mod app;
pub mod authz;
pub mod context;
pub mod middleware;
