use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use gamevault_core::DomainError;
use gamevault_infra::{CheckoutError, StoreError};

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        DomainError::AlreadyOwned(msg) => json_error(StatusCode::CONFLICT, "already_owned", msg),
        DomainError::InvalidVoucher(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_voucher", msg)
        }
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn checkout_error_to_response(err: CheckoutError) -> axum::response::Response {
    match err {
        CheckoutError::Domain(e) => domain_error_to_response(e),
        CheckoutError::Storage(msg) => {
            tracing::error!("checkout storage failure: {msg}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "storage failure",
            )
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        StoreError::Conflict(msg) | StoreError::ForeignKey(msg) => {
            json_error(StatusCode::CONFLICT, "conflict", msg)
        }
        StoreError::OwnershipConflict(msg) => {
            json_error(StatusCode::CONFLICT, "already_owned", msg)
        }
        StoreError::VoucherUnavailable(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_voucher", msg)
        }
        StoreError::Backend(msg) => {
            tracing::error!("storage backend failure: {msg}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "storage failure",
            )
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
