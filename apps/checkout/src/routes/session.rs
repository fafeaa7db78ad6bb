use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SetSessionRequest {
    pub token: String,
}

/// PUT /api/session
/// Stores the bearer token issued by the backend's login endpoint.
pub async fn handle_set_session(
    State(state): State<AppState>,
    Json(req): Json<SetSessionRequest>,
) -> Result<StatusCode, AppError> {
    if req.token.trim().is_empty() {
        return Err(AppError::Validation("token cannot be empty".to_string()));
    }
    state.session.set_token(req.token);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /login
/// Landing page after the session expired or was never established.
pub async fn handle_login_page() -> impl IntoResponse {
    (
        StatusCode::UNAUTHORIZED,
        Html(concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"en\">\n",
            "  <head><meta charset=\"utf-8\"><title>Sign in</title></head>\n",
            "  <body><p>Your session has expired. Please sign in again.</p></body>\n",
            "</html>\n"
        )),
    )
}
