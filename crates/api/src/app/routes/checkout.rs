use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// `POST /checkout`: buy a set of games for the authenticated user.
pub async fn purchase(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Json(body): Json<dto::CheckoutRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, "checkout.purchase") {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let receipt = match services
        .checkout
        .purchase(
            principal.user_id(),
            &body.game_ids,
            body.voucher_code.as_deref(),
        )
        .await
    {
        Ok(t) => t,
        Err(e) => return errors::checkout_error_to_response(e),
    };

    (StatusCode::CREATED, Json(dto::transaction_to_json(&receipt))).into_response()
}

/// `GET /me/transactions`: the authenticated user's receipts, newest first.
pub async fn my_transactions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
) -> axum::response::Response {
    match services.store.transactions_for_user(principal.user_id()).await {
        Ok(transactions) => {
            let items = transactions
                .iter()
                .map(dto::transaction_to_json)
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
