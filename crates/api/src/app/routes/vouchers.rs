use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::Utc;

use gamevault_vouchers::NewVoucher;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", post(create_voucher).get(list_vouchers))
}

pub async fn create_voucher(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Json(body): Json<dto::CreateVoucherRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, "vouchers.create") {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let new_voucher = match NewVoucher::new(
        body.code,
        body.discount_percent,
        body.max_uses,
        body.expires_at,
    ) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let voucher = new_voucher.into_voucher(Utc::now());
    if let Err(e) = services.store.insert_voucher(&voucher).await {
        return errors::store_error_to_response(e);
    }

    (StatusCode::CREATED, Json(dto::voucher_to_json(&voucher))).into_response()
}

pub async fn list_vouchers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, "vouchers.read") {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    match services.store.list_vouchers().await {
        Ok(vouchers) => {
            let items = vouchers.iter().map(dto::voucher_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
