use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use gamevault_catalog::Publisher;
use gamevault_core::PublisherId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_publisher).get(list_publishers))
        .route("/:id", get(get_publisher))
}

pub async fn create_publisher(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Json(body): Json<dto::CreatePublisherRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, "publishers.create") {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let publisher = match Publisher::new(body.name, Utc::now()) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.store.insert_publisher(&publisher).await {
        return errors::store_error_to_response(e);
    }

    (StatusCode::CREATED, Json(dto::publisher_to_json(&publisher))).into_response()
}

pub async fn get_publisher(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: PublisherId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid publisher id")
        }
    };

    match services.store.get_publisher(id).await {
        Ok(Some(p)) => (StatusCode::OK, Json(dto::publisher_to_json(&p))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "publisher not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_publishers(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.store.list_publishers().await {
        Ok(publishers) => {
            let items = publishers.iter().map(dto::publisher_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
