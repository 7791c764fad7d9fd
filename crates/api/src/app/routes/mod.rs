use axum::{
    routing::{get, post},
    Router,
};

pub mod categories;
pub mod checkout;
pub mod games;
pub mod publishers;
pub mod system;
pub mod users;
pub mod vouchers;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/games", games::router())
        .nest("/publishers", publishers::router())
        .nest("/categories", categories::router())
        .nest("/users", users::router())
        .nest("/vouchers", vouchers::router())
        .route("/checkout", post(checkout::purchase))
        .route("/me/transactions", get(checkout::my_transactions))
}
