use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::api_client::ApiClient;
use crate::payments::error::PaymentError;
use crate::payments::models::InitiationRequest;

const INITIATE_PATH: &str = "/api/payments/initiate";

/// The payment endpoints of the JobApp backend.
///
/// Carried by the controller as `Arc<dyn PaymentsBackend>` so tests can swap in
/// a scripted double.
#[async_trait]
pub trait PaymentsBackend: Send + Sync {
    /// `POST /api/payments/initiate`. Returns the raw success body.
    async fn initiate(&self, request: &InitiationRequest) -> Result<Value, PaymentError>;

    /// `GET /api/payments/status/{payment_id}`.
    async fn status(&self, auth_token: &str, payment_id: Uuid) -> Result<Value, PaymentError>;
}

#[async_trait]
impl PaymentsBackend for ApiClient {
    async fn initiate(&self, request: &InitiationRequest) -> Result<Value, PaymentError> {
        Ok(self
            .post_json(INITIATE_PATH, &request.auth_token, &request.body())
            .await?)
    }

    async fn status(&self, auth_token: &str, payment_id: Uuid) -> Result<Value, PaymentError> {
        Ok(self
            .get_json(&format!("/api/payments/status/{payment_id}"), auth_token)
            .await?)
    }
}
