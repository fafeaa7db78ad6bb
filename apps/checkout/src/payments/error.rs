use thiserror::Error;

use crate::api_client::ApiError;

pub const RETRY_MESSAGE: &str = "Payment initiation failed. Please try again.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";
pub const BUSY_MESSAGE: &str = "A payment is already being processed.";
pub const SIGNED_OUT_MESSAGE: &str = "Please sign in to continue.";

/// Failure of a payment initiation attempt.
///
/// `Busy`, `Unauthenticated` and `UnknownMethod` are raised before anything is
/// sent, so they never change controller state.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("network failure: {0}")]
    Network(String),

    #[error("backend returned status {status}: {message}")]
    Server { status: u16, message: String },

    #[error("malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("credential expired")]
    CredentialExpired,

    #[error("payment initiation already in progress")]
    Busy,

    #[error("no session credential available")]
    Unauthenticated,

    #[error("unknown payment method: {0}")]
    UnknownMethod(String),
}

impl PaymentError {
    /// Message suitable for showing to the user. Never contains raw error detail.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) | Self::Server { .. } | Self::MalformedResponse(_) => {
                RETRY_MESSAGE.to_string()
            }
            Self::CredentialExpired => SESSION_EXPIRED_MESSAGE.to_string(),
            Self::Busy => BUSY_MESSAGE.to_string(),
            Self::Unauthenticated => SIGNED_OUT_MESSAGE.to_string(),
            Self::UnknownMethod(method) => format!("Unsupported payment method '{method}'."),
        }
    }

    /// True when the session layer, not the user, has to act next.
    pub fn needs_sign_in(&self) -> bool {
        matches!(self, Self::CredentialExpired | Self::Unauthenticated)
    }
}

impl From<ApiError> for PaymentError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Http(e) => Self::Network(e.to_string()),
            ApiError::Status { status, message } => Self::Server { status, message },
            ApiError::Parse(e) => Self::MalformedResponse(e.to_string()),
            ApiError::CredentialExpired => Self::CredentialExpired,
        }
    }
}
