//! Request DTOs and JSON mapping helpers.
//!
//! Responses are built as `serde_json::Value` so the wire shape is explicit
//! in one place. Monetary amounts travel as integer cents (`*_cents`).

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use gamevault_auth::Role;
use gamevault_catalog::{Category, Game, Publisher};
use gamevault_core::{CategoryId, GameId, Money, PublisherId};
use gamevault_identity::UserAccount;
use gamevault_orders::Transaction;
use gamevault_vouchers::Voucher;

// ── requests ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    pub title: String,
    pub price_cents: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    pub publisher_id: PublisherId,
    #[serde(default)]
    pub categories: Vec<CategoryId>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGameRequest {
    pub price_cents: Option<u64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub categories: Option<Vec<CategoryId>>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePublisherRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    /// Opaque, already-hashed credential; hashing happens upstream.
    pub password_hash: String,
    pub display_name: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct CreateVoucherRequest {
    pub code: String,
    pub discount_percent: u8,
    pub max_uses: u32,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub game_ids: Vec<GameId>,
    pub voucher_code: Option<String>,
}

// ── responses ────────────────────────────────────────────────────────

fn money_json(amount: Money) -> Value {
    json!(amount.cents())
}

pub fn game_to_json(game: &Game) -> Value {
    json!({
        "id": game.id.to_string(),
        "title": game.title,
        "price_cents": money_json(game.price),
        "description": game.description,
        "image_url": game.image_url,
        "publisher_id": game.publisher_id.to_string(),
        "categories": game.categories.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
        "created_at": game.created_at,
    })
}

pub fn publisher_to_json(publisher: &Publisher) -> Value {
    json!({
        "id": publisher.id.to_string(),
        "name": publisher.name,
        "created_at": publisher.created_at,
    })
}

pub fn category_to_json(category: &Category) -> Value {
    json!({
        "id": category.id.to_string(),
        "name": category.name,
        "created_at": category.created_at,
    })
}

/// Credential hash never leaves the service.
pub fn user_to_json(user: &UserAccount) -> Value {
    json!({
        "id": user.id.to_string(),
        "email": user.email,
        "display_name": user.display_name,
        "role": user.role.as_str(),
        "created_at": user.created_at,
    })
}

pub fn voucher_to_json(voucher: &Voucher) -> Value {
    json!({
        "id": voucher.id.to_string(),
        "code": voucher.code,
        "discount_percent": voucher.discount_percent,
        "max_uses": voucher.max_uses,
        "uses": voucher.uses,
        "expires_at": voucher.expires_at,
        "created_at": voucher.created_at,
    })
}

pub fn transaction_to_json(tx: &Transaction) -> Value {
    json!({
        "id": tx.id.to_string(),
        "user_id": tx.user_id.to_string(),
        "lines": tx.lines.iter().map(|l| json!({
            "game_id": l.game_id.to_string(),
            "unit_price_cents": money_json(l.unit_price),
        })).collect::<Vec<_>>(),
        "total_cents": money_json(tx.total),
        "status": tx.status,
        "created_at": tx.created_at,
    })
}
