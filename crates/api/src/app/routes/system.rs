use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(
    Extension(principal): Extension<crate::context::PrincipalContext>,
) -> impl IntoResponse {
    Json(serde_json::json!({
        "user_id": principal.user_id().to_string(),
        "role": principal.role().as_str(),
    }))
}
