//! `gamevault-identity` — user accounts.

pub mod user;

pub use user::{NewUser, UserAccount};
