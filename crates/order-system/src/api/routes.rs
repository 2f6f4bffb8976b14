use axum::routing::{get, post};
use axum::Router;

use super::handlers;
use super::state::AppState;

/// Build the order system router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/orders", post(handlers::create_order).get(handlers::list_orders))
        .route("/api/orders/{id}", get(handlers::get_order))
        .route("/api/orders/{id}/status", get(handlers::order_status))
        .route("/api/orders/{id}/check-payment", post(handlers::check_payment))
        .with_state(state)
}
