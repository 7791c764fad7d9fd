//! Postgres-backed store implementation.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | PostgreSQL error code | StoreError | Scenario |
//! |-----------------------|------------|----------|
//! | `23505` (unique)      | `Conflict` / `OwnershipConflict` | duplicate email, code, or name; racing purchase of the same (user, game) |
//! | `23503` (foreign key) | `ForeignKey` | referenced publisher/category/user/game missing |
//! | `23514` (check)       | `Backend` | out-of-range values (rejected earlier by validation) |
//! | anything else         | `Backend` | connection, pool, query failures |
//!
//! ## Concurrency
//!
//! `commit_purchase` runs in one database transaction. Correctness does not
//! rely on the service's pre-checks: the `ownerships` primary key rejects a
//! racing duplicate purchase, and the voucher increment is a conditional
//! `UPDATE` that fails the whole transaction when it matches no row.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use gamevault_auth::Role;
use gamevault_catalog::{Category, Game, GameUpdate, Publisher};
use gamevault_core::{CategoryId, GameId, Money, PublisherId, TransactionId, UserId};
use gamevault_identity::UserAccount;
use gamevault_orders::{Transaction, TransactionLine, TransactionStatus};
use gamevault_vouchers::Voucher;

use super::r#trait::{Store, StoreError};

/// Postgres-backed store.
///
/// Uses the SQLx connection pool (thread-safe, `Send + Sync`); every
/// multi-row mutation runs inside a database transaction.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Arc<PgPool>,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| StoreError::Backend(format!("connect failed: {e}")))?;
        Ok(Self::new(pool))
    }

    /// Run embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&*self.pool)
            .await
            .map_err(|e| StoreError::Backend(format!("migration failed: {e}")))
    }

    /// Load category links for a set of games and stitch them in.
    async fn attach_categories(&self, games: &mut [Game]) -> Result<(), StoreError> {
        if games.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = games.iter().map(|g| *g.id.as_uuid()).collect();
        let rows = sqlx::query(
            "SELECT game_id, category_id FROM game_categories WHERE game_id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_game_categories", e))?;

        let mut by_game: HashMap<GameId, Vec<CategoryId>> = HashMap::new();
        for row in rows {
            let game_id: Uuid = row.try_get("game_id").map_err(row_error)?;
            let category_id: Uuid = row.try_get("category_id").map_err(row_error)?;
            by_game
                .entry(GameId::from_uuid(game_id))
                .or_default()
                .push(CategoryId::from_uuid(category_id));
        }
        for game in games {
            if let Some(mut cats) = by_game.remove(&game.id) {
                cats.sort();
                game.categories = cats;
            }
        }
        Ok(())
    }

    async fn load_transactions(&self, rows: Vec<PgRow>) -> Result<Vec<Transaction>, StoreError> {
        let mut txs = Vec::with_capacity(rows.len());
        for row in rows {
            txs.push(transaction_from_row(&row)?);
        }
        if txs.is_empty() {
            return Ok(txs);
        }

        let ids: Vec<Uuid> = txs.iter().map(|t| *t.id.as_uuid()).collect();
        let line_rows = sqlx::query(
            r#"
            SELECT transaction_id, position, game_id, unit_price
            FROM transaction_lines
            WHERE transaction_id = ANY($1)
            ORDER BY transaction_id, position
            "#,
        )
        .bind(&ids)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_transaction_lines", e))?;

        let mut by_tx: HashMap<TransactionId, Vec<TransactionLine>> = HashMap::new();
        for row in line_rows {
            let tx_id: Uuid = row.try_get("transaction_id").map_err(row_error)?;
            let game_id: Uuid = row.try_get("game_id").map_err(row_error)?;
            let unit_price: i64 = row.try_get("unit_price").map_err(row_error)?;
            by_tx
                .entry(TransactionId::from_uuid(tx_id))
                .or_default()
                .push(TransactionLine {
                    game_id: GameId::from_uuid(game_id),
                    unit_price: money_from_db(unit_price)?,
                });
        }
        for tx in &mut txs {
            if let Some(lines) = by_tx.remove(&tx.id) {
                tx.lines = lines;
            }
        }
        Ok(txs)
    }
}

#[async_trait]
impl Store for PostgresStore {
    #[instrument(skip(self, game), fields(game_id = %game.id), err)]
    async fn insert_game(&self, game: &Game) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin", e))?;

        sqlx::query(
            r#"
            INSERT INTO games (id, title, price, description, image_url, publisher_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(game.id.as_uuid())
        .bind(&game.title)
        .bind(money_to_db(game.price)?)
        .bind(&game.description)
        .bind(&game.image_url)
        .bind(game.publisher_id.as_uuid())
        .bind(game.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_game", e))?;

        for category_id in &game.categories {
            sqlx::query("INSERT INTO game_categories (game_id, category_id) VALUES ($1, $2)")
                .bind(game.id.as_uuid())
                .bind(category_id.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("insert_game_category", e))?;
        }

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))
    }

    async fn update_game(&self, id: GameId, update: GameUpdate) -> Result<Game, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin", e))?;

        let row = sqlx::query("SELECT * FROM games WHERE id = $1 FOR UPDATE")
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("select_game", e))?
            .ok_or_else(|| StoreError::NotFound(format!("game {id}")))?;
        let mut game = game_from_row(&row)?;

        let new_categories = update.categories.clone();
        update.apply(&mut game);

        sqlx::query(
            "UPDATE games SET price = $2, description = $3, image_url = $4 WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(money_to_db(game.price)?)
        .bind(&game.description)
        .bind(&game.image_url)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update_game", e))?;

        if new_categories.is_some() {
            sqlx::query("DELETE FROM game_categories WHERE game_id = $1")
                .bind(id.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("detach_game_categories", e))?;
            for category_id in &game.categories {
                sqlx::query("INSERT INTO game_categories (game_id, category_id) VALUES ($1, $2)")
                    .bind(id.as_uuid())
                    .bind(category_id.as_uuid())
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| map_sqlx_error("insert_game_category", e))?;
            }
        } else {
            // Categories untouched; reload the current links for the result.
            let rows =
                sqlx::query("SELECT category_id FROM game_categories WHERE game_id = $1")
                    .bind(id.as_uuid())
                    .fetch_all(&mut *tx)
                    .await
                    .map_err(|e| map_sqlx_error("load_game_categories", e))?;
            game.categories = rows
                .iter()
                .map(|r| {
                    r.try_get::<Uuid, _>("category_id")
                        .map(CategoryId::from_uuid)
                        .map_err(row_error)
                })
                .collect::<Result<_, _>>()?;
            game.categories.sort();
        }

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))?;
        Ok(game)
    }

    async fn get_game(&self, id: GameId) -> Result<Option<Game>, StoreError> {
        let row = sqlx::query("SELECT * FROM games WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_game", e))?;

        match row {
            Some(row) => {
                let mut games = vec![game_from_row(&row)?];
                self.attach_categories(&mut games).await?;
                Ok(games.pop())
            }
            None => Ok(None),
        }
    }

    async fn get_games(&self, ids: &[GameId]) -> Result<Vec<Game>, StoreError> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows = sqlx::query("SELECT * FROM games WHERE id = ANY($1)")
            .bind(&uuids)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_games", e))?;

        let mut games = rows
            .iter()
            .map(game_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        self.attach_categories(&mut games).await?;

        // Preserve request order.
        let mut by_id: HashMap<GameId, Game> =
            games.into_iter().map(|g| (g.id, g)).collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn list_games(&self) -> Result<Vec<Game>, StoreError> {
        let rows = sqlx::query("SELECT * FROM games ORDER BY id")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_games", e))?;
        let mut games = rows
            .iter()
            .map(game_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        self.attach_categories(&mut games).await?;
        Ok(games)
    }

    async fn insert_publisher(&self, publisher: &Publisher) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO publishers (id, name, created_at) VALUES ($1, $2, $3)")
            .bind(publisher.id.as_uuid())
            .bind(&publisher.name)
            .bind(publisher.created_at)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_publisher", e))?;
        Ok(())
    }

    async fn get_publisher(&self, id: PublisherId) -> Result<Option<Publisher>, StoreError> {
        let row = sqlx::query("SELECT * FROM publishers WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_publisher", e))?;
        row.map(|r| publisher_from_row(&r)).transpose()
    }

    async fn list_publishers(&self) -> Result<Vec<Publisher>, StoreError> {
        let rows = sqlx::query("SELECT * FROM publishers ORDER BY id")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_publishers", e))?;
        rows.iter().map(publisher_from_row).collect()
    }

    async fn insert_category(&self, category: &Category) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO categories (id, name, created_at) VALUES ($1, $2, $3)")
            .bind(category.id.as_uuid())
            .bind(&category.name)
            .bind(category.created_at)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_category", e))?;
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query("SELECT * FROM categories ORDER BY id")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_categories", e))?;
        rows.iter().map(category_from_row).collect()
    }

    async fn delete_category(&self, id: CategoryId) -> Result<(), StoreError> {
        // Links detach via ON DELETE CASCADE on game_categories only.
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_category", e))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("category {id}")));
        }
        Ok(())
    }

    async fn insert_user(&self, user: &UserAccount) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, display_name, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.display_name)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_user", e))?;
        Ok(())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<UserAccount>, StoreError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_user", e))?;
        row.map(|r| user_from_row(&r)).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_user_by_email", e))?;
        row.map(|r| user_from_row(&r)).transpose()
    }

    async fn list_users(&self) -> Result<Vec<UserAccount>, StoreError> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY id")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_users", e))?;
        rows.iter().map(user_from_row).collect()
    }

    async fn insert_voucher(&self, voucher: &Voucher) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO vouchers (id, code, discount_percent, max_uses, uses, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(voucher.id.as_uuid())
        .bind(&voucher.code)
        .bind(i16::from(voucher.discount_percent))
        .bind(voucher.max_uses as i32)
        .bind(voucher.uses as i32)
        .bind(voucher.expires_at)
        .bind(voucher.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_voucher", e))?;
        Ok(())
    }

    async fn find_voucher(&self, code: &str) -> Result<Option<Voucher>, StoreError> {
        let row = sqlx::query("SELECT * FROM vouchers WHERE code = $1")
            .bind(code)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_voucher", e))?;
        row.map(|r| voucher_from_row(&r)).transpose()
    }

    async fn list_vouchers(&self) -> Result<Vec<Voucher>, StoreError> {
        let rows = sqlx::query("SELECT * FROM vouchers ORDER BY id")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_vouchers", e))?;
        rows.iter().map(voucher_from_row).collect()
    }

    async fn transactions_for_user(&self, user_id: UserId) -> Result<Vec<Transaction>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM transactions WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("transactions_for_user", e))?;
        self.load_transactions(rows).await
    }

    async fn get_transaction(
        &self,
        id: TransactionId,
    ) -> Result<Option<Transaction>, StoreError> {
        let rows = sqlx::query("SELECT * FROM transactions WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_transaction", e))?;
        Ok(self.load_transactions(rows).await?.pop())
    }

    async fn owned_game_ids(&self, user_id: UserId) -> Result<HashSet<GameId>, StoreError> {
        let rows = sqlx::query("SELECT game_id FROM ownerships WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("owned_game_ids", e))?;
        rows.iter()
            .map(|r| {
                r.try_get::<Uuid, _>("game_id")
                    .map(GameId::from_uuid)
                    .map_err(row_error)
            })
            .collect()
    }

    #[instrument(
        skip(self, receipt),
        fields(
            transaction_id = %receipt.id,
            user_id = %receipt.user_id,
            line_count = receipt.lines.len(),
            voucher = voucher_code.unwrap_or("-"),
        ),
        err
    )]
    async fn commit_purchase(
        &self,
        receipt: &Transaction,
        voucher_code: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin", e))?;

        // Conditional increment first: locks the voucher row for the rest of
        // the transaction and fails fast when the voucher is no longer usable.
        if let Some(code) = voucher_code {
            let result = sqlx::query(
                r#"
                UPDATE vouchers
                SET uses = uses + 1
                WHERE code = $1 AND uses < max_uses AND expires_at > now()
                "#,
            )
            .bind(code)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("redeem_voucher", e))?;

            if result.rows_affected() == 0 {
                return Err(StoreError::VoucherUnavailable(format!(
                    "voucher '{code}' is unknown, expired, or exhausted"
                )));
            }
        }

        sqlx::query(
            "INSERT INTO transactions (id, user_id, total, status, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(receipt.id.as_uuid())
        .bind(receipt.user_id.as_uuid())
        .bind(money_to_db(receipt.total)?)
        .bind(status_to_db(receipt.status))
        .bind(receipt.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_transaction", e))?;

        for (position, line) in receipt.lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO transaction_lines (transaction_id, position, game_id, unit_price)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(receipt.id.as_uuid())
            .bind(position as i32)
            .bind(line.game_id.as_uuid())
            .bind(money_to_db(line.unit_price)?)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_transaction_line", e))?;

            sqlx::query(
                "INSERT INTO ownerships (user_id, game_id, transaction_id) VALUES ($1, $2, $3)",
            )
            .bind(receipt.user_id.as_uuid())
            .bind(line.game_id.as_uuid())
            .bind(receipt.id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::OwnershipConflict(format!(
                        "user {} already owns game {}",
                        receipt.user_id, line.game_id
                    ))
                } else {
                    map_sqlx_error("insert_ownership", e)
                }
            })?;
        }

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))
    }
}

// ── row mapping ─────────────────────────────────────────────────────

fn row_error(e: sqlx::Error) -> StoreError {
    StoreError::Backend(format!("row decode failed: {e}"))
}

fn money_to_db(money: Money) -> Result<i64, StoreError> {
    i64::try_from(money.cents())
        .map_err(|_| StoreError::Backend("amount exceeds storage range".to_string()))
}

fn money_from_db(cents: i64) -> Result<Money, StoreError> {
    u64::try_from(cents)
        .map(Money::from_cents)
        .map_err(|_| StoreError::Backend("negative amount in storage".to_string()))
}

fn status_to_db(status: TransactionStatus) -> &'static str {
    match status {
        TransactionStatus::Completed => "completed",
    }
}

fn status_from_db(status: &str) -> Result<TransactionStatus, StoreError> {
    match status {
        "completed" => Ok(TransactionStatus::Completed),
        other => Err(StoreError::Backend(format!(
            "unknown transaction status '{other}' in storage"
        ))),
    }
}

fn game_from_row(row: &PgRow) -> Result<Game, StoreError> {
    Ok(Game {
        id: GameId::from_uuid(row.try_get("id").map_err(row_error)?),
        title: row.try_get("title").map_err(row_error)?,
        price: money_from_db(row.try_get("price").map_err(row_error)?)?,
        description: row.try_get("description").map_err(row_error)?,
        image_url: row.try_get("image_url").map_err(row_error)?,
        publisher_id: PublisherId::from_uuid(row.try_get("publisher_id").map_err(row_error)?),
        categories: Vec::new(),
        created_at: row.try_get("created_at").map_err(row_error)?,
    })
}

fn publisher_from_row(row: &PgRow) -> Result<Publisher, StoreError> {
    Ok(Publisher {
        id: PublisherId::from_uuid(row.try_get("id").map_err(row_error)?),
        name: row.try_get("name").map_err(row_error)?,
        created_at: row.try_get("created_at").map_err(row_error)?,
    })
}

fn category_from_row(row: &PgRow) -> Result<Category, StoreError> {
    Ok(Category {
        id: CategoryId::from_uuid(row.try_get("id").map_err(row_error)?),
        name: row.try_get("name").map_err(row_error)?,
        created_at: row.try_get("created_at").map_err(row_error)?,
    })
}

fn user_from_row(row: &PgRow) -> Result<UserAccount, StoreError> {
    let role: String = row.try_get("role").map_err(row_error)?;
    Ok(UserAccount {
        id: UserId::from_uuid(row.try_get("id").map_err(row_error)?),
        email: row.try_get("email").map_err(row_error)?,
        password_hash: row.try_get("password_hash").map_err(row_error)?,
        display_name: row.try_get("display_name").map_err(row_error)?,
        role: Role::from_str(&role)
            .map_err(|e| StoreError::Backend(format!("bad role in storage: {e}")))?,
        created_at: row.try_get("created_at").map_err(row_error)?,
    })
}

fn voucher_from_row(row: &PgRow) -> Result<Voucher, StoreError> {
    let discount: i16 = row.try_get("discount_percent").map_err(row_error)?;
    let max_uses: i32 = row.try_get("max_uses").map_err(row_error)?;
    let uses: i32 = row.try_get("uses").map_err(row_error)?;
    Ok(Voucher {
        id: gamevault_core::VoucherId::from_uuid(row.try_get("id").map_err(row_error)?),
        code: row.try_get("code").map_err(row_error)?,
        discount_percent: u8::try_from(discount)
            .map_err(|_| StoreError::Backend("bad discount in storage".to_string()))?,
        max_uses: u32::try_from(max_uses)
            .map_err(|_| StoreError::Backend("bad max_uses in storage".to_string()))?,
        uses: u32::try_from(uses)
            .map_err(|_| StoreError::Backend("bad uses in storage".to_string()))?,
        expires_at: row.try_get("expires_at").map_err(row_error)?,
        created_at: row.try_get("created_at").map_err(row_error)?,
    })
}

fn transaction_from_row(row: &PgRow) -> Result<Transaction, StoreError> {
    let status: String = row.try_get("status").map_err(row_error)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(row_error)?;
    Ok(Transaction {
        id: TransactionId::from_uuid(row.try_get("id").map_err(row_error)?),
        user_id: UserId::from_uuid(row.try_get("user_id").map_err(row_error)?),
        lines: Vec::new(),
        total: money_from_db(row.try_get("total").map_err(row_error)?)?,
        status: status_from_db(&status)?,
        created_at,
    })
}

// ── error mapping ───────────────────────────────────────────────────

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(msg),
                Some("23503") => StoreError::ForeignKey(msg),
                _ => StoreError::Backend(msg),
            }
        }
        other => StoreError::Backend(format!("{operation}: {other}")),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}
