pub mod health;
pub mod session;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::errors::LOGIN_PATH;
use crate::payments::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Checkout
        .route("/api/checkout", get(handlers::handle_get_checkout))
        .route("/api/checkout/method", put(handlers::handle_select_method))
        .route("/checkout/initiate", post(handlers::handle_initiate))
        .route(
            "/api/payments/status/:payment_id",
            get(handlers::handle_payment_status),
        )
        // Session
        .route("/api/session", put(session::handle_set_session))
        .route(LOGIN_PATH, get(session::handle_login_page))
        .with_state(state)
}
