//! `gamevault-orders` — purchase receipts and checkout rules.
//!
//! Everything here is pure: IO, atomicity, and the voucher use-count
//! increment live behind the storage boundary in `gamevault-infra`.

pub mod checkout;
pub mod transaction;

pub use checkout::{ensure_unowned, price_order, validate_game_ids};
pub use transaction::{Transaction, TransactionLine, TransactionStatus};
