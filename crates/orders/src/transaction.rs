use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gamevault_core::{GameId, Money, TransactionId, UserId};

/// Purchase receipt status.
///
/// Only `completed` receipts exist today; the enum keeps the wire shape
/// stable if refunds ever land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
}

/// One purchased game and the price charged for it at purchase time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLine {
    pub game_id: GameId,
    pub unit_price: Money,
}

/// An immutable purchase receipt.
///
/// # Invariants
/// - Never edited after creation (append-only).
/// - A user's completed receipts never reference the same game twice
///   (ownership uniqueness, enforced by the store on commit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    pub lines: Vec<TransactionLine>,
    pub total: Money,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Assemble a completed receipt. Callers are expected to have priced the
    /// order already; `total` is stored as charged, including any discount.
    pub fn completed(
        user_id: UserId,
        lines: Vec<TransactionLine>,
        total: Money,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            user_id,
            lines,
            total,
            status: TransactionStatus::Completed,
            created_at: now,
        }
    }

    pub fn game_ids(&self) -> impl Iterator<Item = GameId> + '_ {
        self.lines.iter().map(|l| l.game_id)
    }
}
