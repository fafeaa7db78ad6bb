//! Axum route handlers for the checkout surface.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::payments::controller::Dispatch;
use crate::payments::error::PaymentError;
use crate::payments::models::{CheckoutSnapshot, PaymentMethod};
use crate::session::SessionProvider;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SelectMethodRequest {
    pub payment_method: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/checkout
///
/// Status surface: selected method, pay label, fee, attempt state and last error.
pub async fn handle_get_checkout(State(state): State<AppState>) -> Json<CheckoutSnapshot> {
    Json(state.controller.snapshot())
}

/// PUT /api/checkout/method
pub async fn handle_select_method(
    State(state): State<AppState>,
    Json(request): Json<SelectMethodRequest>,
) -> Result<Json<CheckoutSnapshot>, AppError> {
    let method: PaymentMethod = request.payment_method.parse()?;
    state.controller.select_method(method);
    Ok(Json(state.controller.snapshot()))
}

/// POST /checkout/initiate
///
/// PayFast answers with an HTML page that auto-posts the signed fields to the
/// hosted payment page. EFT answers with the backend's transfer instructions.
pub async fn handle_initiate(State(state): State<AppState>) -> Result<Response, AppError> {
    match state.controller.initiate().await? {
        Dispatch::Redirect(form) => Ok(Html(form.render_html().into_string()).into_response()),
        Dispatch::Instructions(instructions) => Ok(Json(instructions).into_response()),
    }
}

/// GET /api/payments/status/:payment_id
///
/// Looks up a payment record on the backend with the current session.
pub async fn handle_payment_status(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let payment_id = Uuid::parse_str(&payment_id)
        .map_err(|_| AppError::Validation(format!("'{payment_id}' is not a valid payment id")))?;
    let token = state.session.token().ok_or(PaymentError::Unauthenticated)?;

    let record = state
        .backend
        .status(&token, payment_id)
        .await
        .map_err(|e| match e {
            PaymentError::Server { status: 404, .. } => {
                AppError::NotFound(format!("Payment {payment_id} not found"))
            }
            other => AppError::Payment(other),
        })?;
    Ok(Json(record))
}
