//! Checkout orchestration: load → validate → price → commit.
//!
//! The service sequences the purchase workflow against a [`Store`] handle.
//! Validation runs before any mutation; the only mutation is the store's
//! atomic `commit_purchase`. Pre-checks exist for precise error messages —
//! the ownership and voucher invariants are re-enforced inside the commit,
//! so racing requests cannot both succeed.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::instrument;

use gamevault_core::{DomainError, GameId, UserId};
use gamevault_orders::{ensure_unowned, price_order, validate_game_ids, Transaction, TransactionLine};

use crate::store::{Store, StoreError};

#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Deterministic business failure; mapped to a 4xx by the API layer.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Storage failure. Details go to the logs, not to clients.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<StoreError> for CheckoutError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::OwnershipConflict(msg) => {
                CheckoutError::Domain(DomainError::AlreadyOwned(msg))
            }
            StoreError::VoucherUnavailable(msg) => {
                CheckoutError::Domain(DomainError::InvalidVoucher(msg))
            }
            StoreError::NotFound(msg) => CheckoutError::Domain(DomainError::NotFound(msg)),
            StoreError::Conflict(msg) | StoreError::ForeignKey(msg) => {
                CheckoutError::Domain(DomainError::Conflict(msg))
            }
            StoreError::Backend(msg) => CheckoutError::Storage(msg),
        }
    }
}

/// The purchase workflow, bound to a store handle.
#[derive(Clone)]
pub struct CheckoutService {
    store: Arc<dyn Store>,
}

impl CheckoutService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Purchase a non-empty set of games for `buyer_id`, optionally applying
    /// a voucher. Returns the persisted receipt.
    #[instrument(
        skip(self, game_ids),
        fields(buyer = %buyer_id, game_count = game_ids.len(), voucher = voucher_code.unwrap_or("-")),
        err
    )]
    pub async fn purchase(
        &self,
        buyer_id: UserId,
        game_ids: &[GameId],
        voucher_code: Option<&str>,
    ) -> Result<Transaction, CheckoutError> {
        validate_game_ids(game_ids)?;

        let voucher_code = match voucher_code {
            Some(raw) => {
                let code = raw.trim().to_uppercase();
                if code.is_empty() {
                    return Err(DomainError::validation("voucher code must not be empty").into());
                }
                Some(code)
            }
            None => None,
        };

        self.store
            .get_user(buyer_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("user {buyer_id}")))?;

        let games = self.store.get_games(game_ids).await?;
        if games.len() != game_ids.len() {
            let found: std::collections::HashSet<GameId> = games.iter().map(|g| g.id).collect();
            // Report the first unresolved id; the whole request fails anyway.
            let missing = game_ids
                .iter()
                .find(|id| !found.contains(id))
                .copied()
                .unwrap_or_else(GameId::new);
            return Err(DomainError::not_found(format!("game {missing}")).into());
        }

        let lines: Vec<TransactionLine> = games
            .iter()
            .map(|g| TransactionLine {
                game_id: g.id,
                unit_price: g.price,
            })
            .collect();

        let owned = self.store.owned_game_ids(buyer_id).await?;
        ensure_unowned(&lines, &owned)?;

        let voucher = match voucher_code.as_deref() {
            Some(code) => Some(self.store.find_voucher(code).await?.ok_or_else(|| {
                DomainError::invalid_voucher(format!("unknown voucher code '{code}'"))
            })?),
            None => None,
        };

        let now = Utc::now();
        let total = price_order(&lines, voucher.as_ref(), now)?;
        let receipt = Transaction::completed(buyer_id, lines, total, now);

        self.store
            .commit_purchase(&receipt, voucher_code.as_deref())
            .await?;

        tracing::info!(
            transaction_id = %receipt.id,
            total_cents = receipt.total.cents(),
            "purchase completed"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use gamevault_auth::Role;
    use gamevault_catalog::{NewGame, Publisher};
    use gamevault_core::Money;
    use gamevault_identity::{NewUser, UserAccount};
    use gamevault_vouchers::NewVoucher;

    use crate::store::InMemoryStore;

    struct Fixture {
        store: Arc<InMemoryStore>,
        service: CheckoutService,
        buyer: UserAccount,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let service = CheckoutService::new(store.clone());
        let buyer = NewUser::new("buyer@example.com", "hash", "Buyer", Role::User)
            .unwrap()
            .into_account(Utc::now());
        store.insert_user(&buyer).await.unwrap();
        Fixture {
            store,
            service,
            buyer,
        }
    }

    async fn seed_game(store: &InMemoryStore, title: &str, cents: u64) -> GameId {
        let publisher = Publisher::new(format!("{title} Studio"), Utc::now()).unwrap();
        store.insert_publisher(&publisher).await.unwrap();
        let game = NewGame::new(title, Money::from_cents(cents), "", "", publisher.id, vec![])
            .unwrap()
            .into_game(Utc::now());
        store.insert_game(&game).await.unwrap();
        game.id
    }

    async fn seed_voucher(store: &InMemoryStore, code: &str, percent: u8, max_uses: u32) {
        let voucher = NewVoucher::new(code, percent, max_uses, Utc::now() + Duration::days(1))
            .unwrap()
            .into_voucher(Utc::now());
        store.insert_voucher(&voucher).await.unwrap();
    }

    fn domain_err(err: CheckoutError) -> DomainError {
        match err {
            CheckoutError::Domain(e) => e,
            CheckoutError::Storage(msg) => panic!("unexpected storage error: {msg}"),
        }
    }

    #[tokio::test]
    async fn total_is_sum_of_current_prices() {
        let fx = fixture().await;
        let a = seed_game(&fx.store, "Alpha", 1000).await;
        let b = seed_game(&fx.store, "Beta", 2000).await;

        let receipt = fx.service.purchase(fx.buyer.id, &[a, b], None).await.unwrap();
        assert_eq!(receipt.total, Money::from_cents(3000));
        assert_eq!(receipt.lines.len(), 2);

        let stored = fx.store.transactions_for_user(fx.buyer.id).await.unwrap();
        assert_eq!(stored, vec![receipt]);
    }

    #[tokio::test]
    async fn worked_example_half_voucher_then_repurchase() {
        // A ($10.00) + B ($20.00) with a 50% voucher charges $15.00 and
        // consumes one voucher use; buying A again is rejected as owned.
        let fx = fixture().await;
        let a = seed_game(&fx.store, "Alpha", 1000).await;
        let b = seed_game(&fx.store, "Beta", 2000).await;
        seed_voucher(&fx.store, "HALF", 50, 5).await;

        let receipt = fx
            .service
            .purchase(fx.buyer.id, &[a, b], Some("HALF"))
            .await
            .unwrap();
        assert_eq!(receipt.total, Money::from_cents(1500));
        assert_eq!(fx.store.find_voucher("HALF").await.unwrap().unwrap().uses, 1);

        let err = domain_err(fx.service.purchase(fx.buyer.id, &[a], None).await.unwrap_err());
        assert!(matches!(err, DomainError::AlreadyOwned(_)));
    }

    #[tokio::test]
    async fn empty_game_set_is_validation_error() {
        let fx = fixture().await;
        let err = domain_err(fx.service.purchase(fx.buyer.id, &[], None).await.unwrap_err());
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_ids_in_request_are_rejected() {
        let fx = fixture().await;
        let a = seed_game(&fx.store, "Alpha", 1000).await;
        let err = domain_err(
            fx.service
                .purchase(fx.buyer.id, &[a, a], None)
                .await
                .unwrap_err(),
        );
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_game_is_not_found_and_nothing_persists() {
        let fx = fixture().await;
        let a = seed_game(&fx.store, "Alpha", 1000).await;
        let ghost = GameId::new();

        let err = domain_err(
            fx.service
                .purchase(fx.buyer.id, &[a, ghost], None)
                .await
                .unwrap_err(),
        );
        assert!(matches!(err, DomainError::NotFound(_)));
        assert!(fx
            .store
            .transactions_for_user(fx.buyer.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn unknown_buyer_is_not_found() {
        let fx = fixture().await;
        let a = seed_game(&fx.store, "Alpha", 1000).await;
        let err = domain_err(
            fx.service
                .purchase(UserId::new(), &[a], None)
                .await
                .unwrap_err(),
        );
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn unknown_voucher_is_invalid_voucher() {
        let fx = fixture().await;
        let a = seed_game(&fx.store, "Alpha", 1000).await;
        let err = domain_err(
            fx.service
                .purchase(fx.buyer.id, &[a], Some("NOPE"))
                .await
                .unwrap_err(),
        );
        assert!(matches!(err, DomainError::InvalidVoucher(_)));
    }

    #[tokio::test]
    async fn expired_voucher_fails_and_count_is_unchanged() {
        let fx = fixture().await;
        let a = seed_game(&fx.store, "Alpha", 1000).await;
        let expired = NewVoucher::new("OLD", 10, 5, Utc::now() - Duration::hours(1))
            .unwrap()
            .into_voucher(Utc::now() - Duration::days(1));
        fx.store.insert_voucher(&expired).await.unwrap();

        let err = domain_err(
            fx.service
                .purchase(fx.buyer.id, &[a], Some("OLD"))
                .await
                .unwrap_err(),
        );
        assert!(matches!(err, DomainError::InvalidVoucher(_)));
        assert_eq!(fx.store.find_voucher("OLD").await.unwrap().unwrap().uses, 0);
        assert!(fx
            .store
            .transactions_for_user(fx.buyer.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn exhausted_voucher_fails_purchase() {
        let fx = fixture().await;
        let a = seed_game(&fx.store, "Alpha", 1000).await;
        seed_voucher(&fx.store, "ONCE", 10, 1).await;

        fx.service
            .purchase(fx.buyer.id, &[a], Some("ONCE"))
            .await
            .unwrap();

        let b = seed_game(&fx.store, "Beta", 2000).await;
        let err = domain_err(
            fx.service
                .purchase(fx.buyer.id, &[b], Some("ONCE"))
                .await
                .unwrap_err(),
        );
        assert!(matches!(err, DomainError::InvalidVoucher(_)));
        assert_eq!(fx.store.find_voucher("ONCE").await.unwrap().unwrap().uses, 1);
    }

    #[tokio::test]
    async fn voucher_code_is_normalized() {
        let fx = fixture().await;
        let a = seed_game(&fx.store, "Alpha", 1000).await;
        seed_voucher(&fx.store, "HALF", 50, 5).await;

        let receipt = fx
            .service
            .purchase(fx.buyer.id, &[a], Some("  half "))
            .await
            .unwrap();
        assert_eq!(receipt.total, Money::from_cents(500));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_purchases_of_same_game_have_one_winner() {
        let fx = fixture().await;
        let a = seed_game(&fx.store, "Alpha", 1000).await;

        let s1 = fx.service.clone();
        let s2 = fx.service.clone();
        let buyer = fx.buyer.id;

        let (r1, r2) = tokio::join!(
            tokio::spawn(async move { s1.purchase(buyer, &[a], None).await }),
            tokio::spawn(async move { s2.purchase(buyer, &[a], None).await }),
        );
        let results = [r1.unwrap(), r2.unwrap()];

        let wins = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(wins, 1, "exactly one concurrent purchase may succeed");

        let loser = results.into_iter().find(|r| r.is_err()).unwrap().unwrap_err();
        assert!(matches!(
            domain_err(loser),
            DomainError::AlreadyOwned(_)
        ));
        assert_eq!(fx.store.transactions_for_user(buyer).await.unwrap().len(), 1);
    }
}
