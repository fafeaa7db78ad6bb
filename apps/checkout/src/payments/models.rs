use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::payments::error::PaymentError;
use crate::payments::redirect_form::RedirectForm;

/// Flat service fee charged for access to the application service.
pub const SERVICE_FEE: &str = "499.00";
pub const CURRENCY: &str = "ZAR";

/// How the user wants to settle the service fee.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Hosted-redirect flow: the browser is posted to PayFast's payment page.
    #[default]
    Payfast,
    /// Manual-transfer flow: bank details are shown for a direct EFT.
    Eft,
}

impl PaymentMethod {
    /// Wire value sent to the backend as `payment_method`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payfast => "payfast",
            Self::Eft => "eft",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Payfast => "PayFast",
            Self::Eft => "EFT",
        }
    }

    /// Label for the pay button, e.g. "Pay R499.00 with PayFast".
    pub fn pay_label(&self) -> String {
        format!("Pay R{SERVICE_FEE} with {}", self.display_name())
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "payfast" => Ok(Self::Payfast),
            "eft" => Ok(Self::Eft),
            other => Err(PaymentError::UnknownMethod(other.to_string())),
        }
    }
}

/// One initiation attempt. Built fresh per call and dropped afterwards.
pub struct InitiationRequest {
    pub method: PaymentMethod,
    pub auth_token: String,
}

impl InitiationRequest {
    pub fn body(&self) -> InitiateBody {
        InitiateBody {
            payment_method: self.method,
        }
    }
}

// Token stays out of logs.
impl fmt::Debug for InitiationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitiationRequest")
            .field("method", &self.method)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

/// JSON body of `POST /api/payments/initiate`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InitiateBody {
    pub payment_method: PaymentMethod,
}

/// Backend answer to an initiation, already validated for its method.
#[derive(Debug, Clone, PartialEq)]
pub enum InitiationResult {
    HostedRedirect(RedirectForm),
    /// Raw response body, passed through untouched.
    ManualTransfer(Value),
}

impl InitiationResult {
    /// Validates a successful response body against the shape the method requires.
    pub fn from_response(method: PaymentMethod, body: Value) -> Result<Self, PaymentError> {
        match method {
            PaymentMethod::Payfast => {
                let target_url = body
                    .get("payment_url")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        PaymentError::MalformedResponse("missing payment_url".to_string())
                    })?;
                let fields = body
                    .get("payment_data")
                    .and_then(Value::as_object)
                    .ok_or_else(|| {
                        PaymentError::MalformedResponse("missing payment_data".to_string())
                    })?;
                Ok(Self::HostedRedirect(RedirectForm::new(target_url, fields)?))
            }
            PaymentMethod::Eft => match &body {
                Value::Object(map) if !map.is_empty() => Ok(Self::ManualTransfer(body)),
                _ => Err(PaymentError::MalformedResponse(
                    "missing transfer instructions".to_string(),
                )),
            },
        }
    }
}

/// Lifecycle of the controller's most recent attempt.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum RequestState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed(String),
}

impl RequestState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// What the status surface renders.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSnapshot {
    pub payment_method: PaymentMethod,
    pub pay_label: String,
    pub amount: &'static str,
    pub currency: &'static str,
    #[serde(flatten)]
    pub state: RequestState,
    pub busy: bool,
    pub updated_at: DateTime<Utc>,
}
