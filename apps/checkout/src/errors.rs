use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::payments::error::PaymentError;

pub const LOGIN_PATH: &str = "/login";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Payment(e) if e.needs_sign_in() => {
                // Session layer takes over: send the user to sign in again.
                return Redirect::to(LOGIN_PATH).into_response();
            }
            AppError::Payment(e) => match e {
                PaymentError::Busy => {
                    (StatusCode::CONFLICT, "PAYMENT_IN_PROGRESS", e.user_message())
                }
                PaymentError::UnknownMethod(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.user_message())
                }
                _ => {
                    tracing::error!("Payment error: {e}");
                    (StatusCode::BAD_GATEWAY, "PAYMENT_FAILED", e.user_message())
                }
            },
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
