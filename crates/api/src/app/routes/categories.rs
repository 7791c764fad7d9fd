use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post},
    Json, Router,
};
use chrono::Utc;

use gamevault_catalog::Category;
use gamevault_core::CategoryId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_category).get(list_categories))
        .route("/:id", delete(delete_category))
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Json(body): Json<dto::CreateCategoryRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, "categories.create") {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let category = match Category::new(body.name, Utc::now()) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.store.insert_category(&category).await {
        return errors::store_error_to_response(e);
    }

    (StatusCode::CREATED, Json(dto::category_to_json(&category))).into_response()
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.store.list_categories().await {
        Ok(categories) => {
            let items = categories.iter().map(dto::category_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Deleting a category detaches it from games; games are never removed.
pub async fn delete_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, "categories.delete") {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let id: CategoryId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid category id")
        }
    };

    match services.store.delete_category(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
