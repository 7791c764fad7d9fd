use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    routing::post,
    Json, Router,
};
use chrono::Utc;

use gamevault_catalog::{GameUpdate, NewGame};
use gamevault_core::{GameId, Money};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_game).get(list_games))
        .route("/:id", get(get_game).put(update_game))
}

pub async fn create_game(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Json(body): Json<dto::CreateGameRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, "games.create") {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let new_game = match NewGame::new(
        body.title,
        Money::from_cents(body.price_cents),
        body.description,
        body.image_url,
        body.publisher_id,
        body.categories,
    ) {
        Ok(g) => g,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let game = new_game.into_game(Utc::now());
    if let Err(e) = services.store.insert_game(&game).await {
        return errors::store_error_to_response(e);
    }

    (StatusCode::CREATED, Json(dto::game_to_json(&game))).into_response()
}

pub async fn update_game(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateGameRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, "games.update") {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let id: GameId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid game id"),
    };

    let update = GameUpdate {
        price: body.price_cents.map(Money::from_cents),
        description: body.description,
        image_url: body.image_url,
        categories: body.categories,
    };
    if update.is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "no fields to update",
        );
    }

    match services.store.update_game(id, update).await {
        Ok(game) => (StatusCode::OK, Json(dto::game_to_json(&game))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_game(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: GameId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid game id"),
    };

    match services.store.get_game(id).await {
        Ok(Some(game)) => (StatusCode::OK, Json(dto::game_to_json(&game))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "game not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_games(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.store.list_games().await {
        Ok(games) => {
            let items = games.iter().map(dto::game_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
