//! `gamevault-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod money;

pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, GameId, PublisherId, TransactionId, UserId, VoucherId};
pub use money::Money;
