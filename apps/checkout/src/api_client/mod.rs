//! Backend API client: the single point of entry for calls to the JobApp backend.
//!
//! Every request goes through `execute`, which plays the role of the shared
//! request/response interceptor: it attaches the bearer credential and JSON
//! headers, and on `401` fires the session layer's expiry hook before
//! reporting the failure.
//!
//! No automatic retries: every initiate call creates a payment record.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::session::SessionProvider;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Credential rejected by backend")]
    CredentialExpired,
}

/// Flask-style error body: `{"error": "..."}`.
#[derive(Debug, Deserialize)]
struct BackendError {
    error: String,
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<dyn SessionProvider>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session: Arc<dyn SessionProvider>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POSTs a JSON body and returns the decoded JSON response.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        auth_token: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let request = self.client.post(self.url(path)).json(body);
        self.execute(request, auth_token).await
    }

    pub async fn get_json(&self, path: &str, auth_token: &str) -> Result<Value, ApiError> {
        let request = self.client.get(self.url(path));
        self.execute(request, auth_token).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute(&self, request: RequestBuilder, auth_token: &str) -> Result<Value, ApiError> {
        let response = request
            .bearer_auth(auth_token)
            .header("content-type", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            warn!("Backend rejected credential (401)");
            self.session.expire();
            return Err(ApiError::CredentialExpired);
        }

        if !status.is_success() {
            let message = serde_json::from_str::<BackendError>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            warn!("Backend returned {}: {}", status, message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Backend call succeeded: status={}, bytes={}", status, body.len());

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_stub, unused_base_url, RecordingSession};
    use axum::{
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;

    fn client_for(base_url: String, session: Arc<RecordingSession>) -> ApiClient {
        ApiClient::new(base_url, Duration::from_secs(5), session).unwrap()
    }

    #[tokio::test]
    async fn test_post_json_sends_bearer_and_body() {
        let app = Router::new().route(
            "/echo",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                Json(json!({
                    "authorization": headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok()),
                    "content_type": headers
                        .get("content-type")
                        .and_then(|v| v.to_str().ok()),
                    "body": body,
                }))
            }),
        );
        let base = spawn_stub(app).await;
        let session = Arc::new(RecordingSession::signed_in("tok-123"));
        let client = client_for(base, session.clone());

        let echoed = client
            .post_json("/echo", "tok-123", &json!({ "payment_method": "eft" }))
            .await
            .unwrap();

        assert_eq!(echoed["authorization"], "Bearer tok-123");
        assert_eq!(echoed["content_type"], "application/json");
        assert_eq!(echoed["body"], json!({ "payment_method": "eft" }));
        assert_eq!(session.expired_count(), 0);
    }

    #[tokio::test]
    async fn test_401_fires_expiry_hook() {
        let app = Router::new().route(
            "/private",
            get(|| async {
                (
                    AxumStatus::UNAUTHORIZED,
                    Json(json!({ "msg": "Token has expired" })),
                )
            }),
        );
        let base = spawn_stub(app).await;
        let session = Arc::new(RecordingSession::signed_in("old"));
        let client = client_for(base, session.clone());

        let err = client.get_json("/private", "old").await.unwrap_err();

        assert!(matches!(err, ApiError::CredentialExpired));
        assert_eq!(session.expired_count(), 1);
    }

    #[tokio::test]
    async fn test_error_body_message_is_extracted() {
        let app = Router::new().route(
            "/bad",
            post(|| async {
                (
                    AxumStatus::BAD_REQUEST,
                    Json(json!({ "error": "Invalid payment method" })),
                )
            }),
        );
        let base = spawn_stub(app).await;
        let client = client_for(base, Arc::new(RecordingSession::signed_in("t")));

        let err = client.post_json("/bad", "t", &json!({})).await.unwrap_err();

        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid payment method");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_success_is_parse_error() {
        let app = Router::new().route("/html", get(|| async { "<html>maintenance</html>" }));
        let base = spawn_stub(app).await;
        let client = client_for(base, Arc::new(RecordingSession::signed_in("t")));

        let err = client.get_json("/html", "t").await.unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_http_error() {
        let client = client_for(
            unused_base_url().await,
            Arc::new(RecordingSession::signed_in("t")),
        );
        let err = client.get_json("/anything", "t").await.unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
    }
}
