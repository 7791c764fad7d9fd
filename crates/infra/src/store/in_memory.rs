use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use gamevault_catalog::{Category, Game, GameUpdate, Publisher};
use gamevault_core::{CategoryId, GameId, PublisherId, TransactionId, UserId};
use gamevault_identity::UserAccount;
use gamevault_orders::Transaction;
use gamevault_vouchers::Voucher;

use super::r#trait::{Store, StoreError};

#[derive(Debug, Default)]
struct State {
    games: HashMap<GameId, Game>,
    publishers: HashMap<PublisherId, Publisher>,
    categories: HashMap<CategoryId, Category>,
    users: HashMap<UserId, UserAccount>,
    /// Keyed by normalized (uppercase) code.
    vouchers: HashMap<String, Voucher>,
    transactions: HashMap<TransactionId, Transaction>,
    ownership: HashSet<(UserId, GameId)>,
}

/// In-memory store.
///
/// Intended for tests/dev. `commit_purchase` runs entirely under one write
/// lock, so the atomicity and ownership-uniqueness guarantees hold under
/// concurrent use just as they do for the Postgres implementation.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_game_refs(state: &State, game: &Game) -> Result<(), StoreError> {
        if !state.publishers.contains_key(&game.publisher_id) {
            return Err(StoreError::ForeignKey(format!(
                "publisher {} does not exist",
                game.publisher_id
            )));
        }
        for cat in &game.categories {
            if !state.categories.contains_key(cat) {
                return Err(StoreError::ForeignKey(format!(
                    "category {cat} does not exist"
                )));
            }
        }
        Ok(())
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

#[async_trait]
impl Store for InMemoryStore {
    async fn insert_game(&self, game: &Game) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        Self::check_game_refs(&state, game)?;
        state.games.insert(game.id, game.clone());
        Ok(())
    }

    async fn update_game(&self, id: GameId, update: GameUpdate) -> Result<Game, StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;

        if let Some(categories) = &update.categories {
            for cat in categories {
                if !state.categories.contains_key(cat) {
                    return Err(StoreError::ForeignKey(format!(
                        "category {cat} does not exist"
                    )));
                }
            }
        }

        let game = state
            .games
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("game {id}")))?;
        update.apply(game);
        Ok(game.clone())
    }

    async fn get_game(&self, id: GameId) -> Result<Option<Game>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.games.get(&id).cloned())
    }

    async fn get_games(&self, ids: &[GameId]) -> Result<Vec<Game>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(ids
            .iter()
            .filter_map(|id| state.games.get(id).cloned())
            .collect())
    }

    async fn list_games(&self) -> Result<Vec<Game>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        let mut games: Vec<Game> = state.games.values().cloned().collect();
        games.sort_by_key(|g| g.id);
        Ok(games)
    }

    async fn insert_publisher(&self, publisher: &Publisher) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        if state.publishers.values().any(|p| p.name == publisher.name) {
            return Err(StoreError::Conflict(format!(
                "publisher name '{}' already exists",
                publisher.name
            )));
        }
        state.publishers.insert(publisher.id, publisher.clone());
        Ok(())
    }

    async fn get_publisher(&self, id: PublisherId) -> Result<Option<Publisher>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.publishers.get(&id).cloned())
    }

    async fn list_publishers(&self) -> Result<Vec<Publisher>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        let mut publishers: Vec<Publisher> = state.publishers.values().cloned().collect();
        publishers.sort_by_key(|p| p.id);
        Ok(publishers)
    }

    async fn insert_category(&self, category: &Category) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        if state.categories.values().any(|c| c.name == category.name) {
            return Err(StoreError::Conflict(format!(
                "category name '{}' already exists",
                category.name
            )));
        }
        state.categories.insert(category.id, category.clone());
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        let mut categories: Vec<Category> = state.categories.values().cloned().collect();
        categories.sort_by_key(|c| c.id);
        Ok(categories)
    }

    async fn delete_category(&self, id: CategoryId) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        if state.categories.remove(&id).is_none() {
            return Err(StoreError::NotFound(format!("category {id}")));
        }
        // Detach, never cascade into game deletion.
        for game in state.games.values_mut() {
            game.categories.retain(|c| *c != id);
        }
        Ok(())
    }

    async fn insert_user(&self, user: &UserAccount) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!(
                "email '{}' is already registered",
                user.email
            )));
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<UserAccount>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<UserAccount>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        let mut users: Vec<UserAccount> = state.users.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn insert_voucher(&self, voucher: &Voucher) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        if state.vouchers.contains_key(&voucher.code) {
            return Err(StoreError::Conflict(format!(
                "voucher code '{}' already exists",
                voucher.code
            )));
        }
        state.vouchers.insert(voucher.code.clone(), voucher.clone());
        Ok(())
    }

    async fn find_voucher(&self, code: &str) -> Result<Option<Voucher>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.vouchers.get(code).cloned())
    }

    async fn list_vouchers(&self) -> Result<Vec<Voucher>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        let mut vouchers: Vec<Voucher> = state.vouchers.values().cloned().collect();
        vouchers.sort_by_key(|v| v.id);
        Ok(vouchers)
    }

    async fn transactions_for_user(&self, user_id: UserId) -> Result<Vec<Transaction>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        let mut txs: Vec<Transaction> = state
            .transactions
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        txs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(txs)
    }

    async fn get_transaction(
        &self,
        id: TransactionId,
    ) -> Result<Option<Transaction>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.transactions.get(&id).cloned())
    }

    async fn owned_game_ids(&self, user_id: UserId) -> Result<HashSet<GameId>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state
            .ownership
            .iter()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, g)| *g)
            .collect())
    }

    async fn commit_purchase(
        &self,
        receipt: &Transaction,
        voucher_code: Option<&str>,
    ) -> Result<(), StoreError> {
        // One write lock around check-then-mutate makes the commit atomic:
        // all checks pass before the first mutation, or nothing changes.
        let mut state = self.state.write().map_err(|_| poisoned())?;

        for line in &receipt.lines {
            if state.ownership.contains(&(receipt.user_id, line.game_id)) {
                return Err(StoreError::OwnershipConflict(format!(
                    "user {} already owns game {}",
                    receipt.user_id, line.game_id
                )));
            }
        }

        if let Some(code) = voucher_code {
            let now = Utc::now();
            let usable = state
                .vouchers
                .get(code)
                .is_some_and(|v| !v.is_expired(now) && !v.is_exhausted());
            if !usable {
                return Err(StoreError::VoucherUnavailable(format!(
                    "voucher '{code}' is unknown, expired, or exhausted"
                )));
            }
        }

        for line in &receipt.lines {
            state.ownership.insert((receipt.user_id, line.game_id));
        }
        if let Some(code) = voucher_code {
            if let Some(voucher) = state.vouchers.get_mut(code) {
                voucher.uses += 1;
            }
        }
        state.transactions.insert(receipt.id, receipt.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use gamevault_auth::Role;
    use gamevault_catalog::NewGame;
    use gamevault_core::Money;
    use gamevault_identity::NewUser;
    use gamevault_orders::TransactionLine;
    use gamevault_vouchers::NewVoucher;

    async fn seeded_game(store: &InMemoryStore, title: &str, price_cents: u64) -> Game {
        let publisher = Publisher::new(format!("{title} Studio"), Utc::now()).unwrap();
        store.insert_publisher(&publisher).await.unwrap();
        let game = NewGame::new(
            title,
            Money::from_cents(price_cents),
            "",
            "",
            publisher.id,
            vec![],
        )
        .unwrap()
        .into_game(Utc::now());
        store.insert_game(&game).await.unwrap();
        game
    }

    fn buyer() -> UserAccount {
        NewUser::new("buyer@example.com", "hash", "Buyer", Role::User)
            .unwrap()
            .into_account(Utc::now())
    }

    #[tokio::test]
    async fn insert_game_requires_existing_publisher() {
        let store = InMemoryStore::new();
        let game = NewGame::new(
            "Orphaned",
            Money::from_cents(100),
            "",
            "",
            PublisherId::new(),
            vec![],
        )
        .unwrap()
        .into_game(Utc::now());

        assert!(matches!(
            store.insert_game(&game).await,
            Err(StoreError::ForeignKey(_))
        ));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = InMemoryStore::new();
        let user = buyer();
        store.insert_user(&user).await.unwrap();

        let dup = NewUser::new("buyer@example.com", "hash2", "Other", Role::User)
            .unwrap()
            .into_account(Utc::now());
        assert!(matches!(
            store.insert_user(&dup).await,
            Err(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn deleting_category_detaches_it_from_games() {
        let store = InMemoryStore::new();
        let publisher = Publisher::new("Iron Owl Games", Utc::now()).unwrap();
        store.insert_publisher(&publisher).await.unwrap();
        let category = Category::new("Roguelike", Utc::now()).unwrap();
        store.insert_category(&category).await.unwrap();

        let game = NewGame::new(
            "Frosthaven",
            Money::from_cents(100),
            "",
            "",
            publisher.id,
            vec![category.id],
        )
        .unwrap()
        .into_game(Utc::now());
        store.insert_game(&game).await.unwrap();

        store.delete_category(category.id).await.unwrap();

        let game = store.get_game(game.id).await.unwrap().unwrap();
        assert!(game.categories.is_empty());
    }

    #[tokio::test]
    async fn commit_purchase_records_ownership_and_receipt() {
        let store = InMemoryStore::new();
        let game = seeded_game(&store, "Frosthaven", 1000).await;
        let user = buyer();
        store.insert_user(&user).await.unwrap();

        let receipt = Transaction::completed(
            user.id,
            vec![TransactionLine {
                game_id: game.id,
                unit_price: game.price,
            }],
            game.price,
            Utc::now(),
        );
        store.commit_purchase(&receipt, None).await.unwrap();

        let owned = store.owned_game_ids(user.id).await.unwrap();
        assert!(owned.contains(&game.id));
        assert_eq!(store.transactions_for_user(user.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn commit_purchase_rejects_owned_game_and_leaves_no_rows() {
        let store = InMemoryStore::new();
        let game = seeded_game(&store, "Frosthaven", 1000).await;
        let other = seeded_game(&store, "Gloomline", 2000).await;
        let user = buyer();
        store.insert_user(&user).await.unwrap();

        let first = Transaction::completed(
            user.id,
            vec![TransactionLine {
                game_id: game.id,
                unit_price: game.price,
            }],
            game.price,
            Utc::now(),
        );
        store.commit_purchase(&first, None).await.unwrap();

        // Second receipt includes an owned game: whole commit must fail.
        let second = Transaction::completed(
            user.id,
            vec![
                TransactionLine {
                    game_id: other.id,
                    unit_price: other.price,
                },
                TransactionLine {
                    game_id: game.id,
                    unit_price: game.price,
                },
            ],
            Money::from_cents(3000),
            Utc::now(),
        );
        assert!(matches!(
            store.commit_purchase(&second, None).await,
            Err(StoreError::OwnershipConflict(_))
        ));

        let owned = store.owned_game_ids(user.id).await.unwrap();
        assert!(!owned.contains(&other.id), "partial purchase leaked");
        assert_eq!(store.transactions_for_user(user.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn commit_increments_voucher_once_per_purchase() {
        let store = InMemoryStore::new();
        let a = seeded_game(&store, "Frosthaven", 1000).await;
        let b = seeded_game(&store, "Gloomline", 2000).await;
        let user = buyer();
        store.insert_user(&user).await.unwrap();

        let voucher = NewVoucher::new("HALF", 50, 5, Utc::now() + Duration::days(1))
            .unwrap()
            .into_voucher(Utc::now());
        store.insert_voucher(&voucher).await.unwrap();

        let receipt = Transaction::completed(
            user.id,
            vec![
                TransactionLine {
                    game_id: a.id,
                    unit_price: a.price,
                },
                TransactionLine {
                    game_id: b.id,
                    unit_price: b.price,
                },
            ],
            Money::from_cents(1500),
            Utc::now(),
        );
        store.commit_purchase(&receipt, Some("HALF")).await.unwrap();

        let voucher = store.find_voucher("HALF").await.unwrap().unwrap();
        assert_eq!(voucher.uses, 1, "two games, still one redemption");
    }

    #[tokio::test]
    async fn unusable_voucher_fails_commit_without_side_effects() {
        let store = InMemoryStore::new();
        let game = seeded_game(&store, "Frosthaven", 1000).await;
        let user = buyer();
        store.insert_user(&user).await.unwrap();

        let expired = NewVoucher::new("OLD", 10, 5, Utc::now() - Duration::days(1))
            .unwrap()
            .into_voucher(Utc::now() - Duration::days(2));
        store.insert_voucher(&expired).await.unwrap();

        let receipt = Transaction::completed(
            user.id,
            vec![TransactionLine {
                game_id: game.id,
                unit_price: game.price,
            }],
            Money::from_cents(900),
            Utc::now(),
        );
        assert!(matches!(
            store.commit_purchase(&receipt, Some("OLD")).await,
            Err(StoreError::VoucherUnavailable(_))
        ));

        assert!(store.owned_game_ids(user.id).await.unwrap().is_empty());
        assert_eq!(store.find_voucher("OLD").await.unwrap().unwrap().uses, 0);
    }
}
