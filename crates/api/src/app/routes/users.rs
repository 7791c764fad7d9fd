use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use gamevault_core::UserId;
use gamevault_identity::NewUser;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/:id", get(get_user))
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Json(body): Json<dto::CreateUserRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, "users.create") {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let new_user = match NewUser::new(body.email, body.password_hash, body.display_name, body.role)
    {
        Ok(u) => u,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let user = new_user.into_account(Utc::now());
    if let Err(e) = services.store.insert_user(&user).await {
        return errors::store_error_to_response(e);
    }

    (StatusCode::CREATED, Json(dto::user_to_json(&user))).into_response()
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, "users.read") {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let id: UserId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id"),
    };

    match services.store.get_user(id).await {
        Ok(Some(user)) => (StatusCode::OK, Json(dto::user_to_json(&user))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, "users.read") {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    match services.store.list_users().await {
        Ok(users) => {
            let items = users.iter().map(dto::user_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
