use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

use gamevault_catalog::{Category, Game, GameUpdate, Publisher};
use gamevault_core::{CategoryId, GameId, PublisherId, TransactionId, UserId};
use gamevault_identity::UserAccount;
use gamevault_orders::Transaction;
use gamevault_vouchers::Voucher;

/// Store operation error.
///
/// These are **infrastructure errors** (uniqueness, referential integrity,
/// backend failures) as opposed to domain errors (validation, business
/// rules). The checkout service translates the conflict variants back into
/// domain errors; `Backend` is never shown to clients verbatim.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced row does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint was violated (email, voucher code, category name).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The `(user, game)` ownership constraint was violated — the buyer
    /// already owns the game, possibly committed by a racing request.
    #[error("ownership conflict: {0}")]
    OwnershipConflict(String),

    /// The voucher's conditional update matched no row: unknown code, expired,
    /// or exhausted at commit time.
    #[error("voucher unavailable: {0}")]
    VoucherUnavailable(String),

    /// A referenced row (publisher, category, user, game) is missing.
    #[error("referential integrity: {0}")]
    ForeignKey(String),

    /// Backend failure (connection, query, pool). Details stay in the logs.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Relational store for the storefront.
///
/// ## Design Principles
///
/// - **Explicit handle**: constructed at startup and passed in (`Arc<dyn
///   Store>`); no global client singleton.
/// - **Fully-specified result shapes**: queries return complete records, no
///   lazy relation loading.
/// - **Atomicity where it matters**: `commit_purchase` is the single
///   multi-row mutation and must be all-or-nothing. Implementations enforce
///   the ownership-uniqueness invariant themselves (unique constraint or an
///   equivalent critical section) — callers' pre-checks are best-effort only.
#[async_trait]
pub trait Store: Send + Sync {
    // ── catalog: games ───────────────────────────────────────────────

    /// Insert a game. Fails with `ForeignKey` if the publisher or any
    /// category does not exist.
    async fn insert_game(&self, game: &Game) -> Result<(), StoreError>;

    /// Apply a partial update to a game's mutable fields and return the
    /// updated record.
    async fn update_game(&self, id: GameId, update: GameUpdate) -> Result<Game, StoreError>;

    async fn get_game(&self, id: GameId) -> Result<Option<Game>, StoreError>;

    /// Fetch a batch of games. Missing ids are simply absent from the result;
    /// callers detect and report them.
    async fn get_games(&self, ids: &[GameId]) -> Result<Vec<Game>, StoreError>;

    async fn list_games(&self) -> Result<Vec<Game>, StoreError>;

    // ── catalog: publishers ──────────────────────────────────────────

    async fn insert_publisher(&self, publisher: &Publisher) -> Result<(), StoreError>;
    async fn get_publisher(&self, id: PublisherId) -> Result<Option<Publisher>, StoreError>;
    async fn list_publishers(&self) -> Result<Vec<Publisher>, StoreError>;

    // ── catalog: categories ──────────────────────────────────────────

    /// Insert a category. Fails with `Conflict` on a duplicate name.
    async fn insert_category(&self, category: &Category) -> Result<(), StoreError>;

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    /// Delete a category, detaching it from any games that reference it.
    /// Games are never deleted by this operation.
    async fn delete_category(&self, id: CategoryId) -> Result<(), StoreError>;

    // ── identity ─────────────────────────────────────────────────────

    /// Insert a user. Fails with `Conflict` on a duplicate email.
    async fn insert_user(&self, user: &UserAccount) -> Result<(), StoreError>;

    async fn get_user(&self, id: UserId) -> Result<Option<UserAccount>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError>;
    async fn list_users(&self) -> Result<Vec<UserAccount>, StoreError>;

    // ── vouchers ─────────────────────────────────────────────────────

    /// Insert a voucher. Fails with `Conflict` on a duplicate code.
    async fn insert_voucher(&self, voucher: &Voucher) -> Result<(), StoreError>;

    async fn find_voucher(&self, code: &str) -> Result<Option<Voucher>, StoreError>;
    async fn list_vouchers(&self) -> Result<Vec<Voucher>, StoreError>;

    // ── transactions / ownership ─────────────────────────────────────

    /// All completed receipts for a user, newest first.
    async fn transactions_for_user(&self, user_id: UserId) -> Result<Vec<Transaction>, StoreError>;

    async fn get_transaction(&self, id: TransactionId)
        -> Result<Option<Transaction>, StoreError>;

    /// Games the user owns, derived from completed receipts.
    async fn owned_game_ids(&self, user_id: UserId) -> Result<HashSet<GameId>, StoreError>;

    /// Commit a purchase atomically: the receipt, one ownership link per
    /// line, and — when `voucher_code` is given — exactly one voucher
    /// use-count increment.
    ///
    /// Either everything persists or nothing does:
    /// - a violated `(user, game)` ownership constraint yields
    ///   `OwnershipConflict` and no rows;
    /// - a voucher that is unknown/expired/exhausted *at commit time* yields
    ///   `VoucherUnavailable` and no rows.
    async fn commit_purchase(
        &self,
        receipt: &Transaction,
        voucher_code: Option<&str>,
    ) -> Result<(), StoreError>;
}
