//! Hosted-redirect dispatch: an auto-submitting POST form.
//!
//! PayFast validates the exact field set it signed, so field names, values
//! and their order are copied from the backend response untouched and the
//! action URL always comes from the response, never from configuration.

use maud::{html, Markup, PreEscaped, DOCTYPE};
use reqwest::Url;
use serde_json::{Map, Value};

use crate::payments::error::PaymentError;

const AUTOSUBMIT_SCRIPT: &str =
    r#"<script>document.getElementById("payment-redirect").submit();</script>"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenField {
    pub name: String,
    pub value: String,
}

/// Single-use form that carries the signed payment fields to the hosted page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectForm {
    pub action: String,
    pub method: &'static str,
    pub fields: Vec<HiddenField>,
}

impl RedirectForm {
    pub fn new(action: &str, payment_data: &Map<String, Value>) -> Result<Self, PaymentError> {
        let url = Url::parse(action).map_err(|e| {
            PaymentError::MalformedResponse(format!("payment_url is not a valid URL: {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(PaymentError::MalformedResponse(format!(
                "payment_url has unsupported scheme '{}'",
                url.scheme()
            )));
        }

        let fields = payment_data
            .iter()
            .map(|(name, value)| HiddenField {
                name: name.clone(),
                value: field_value(value),
            })
            .collect();

        Ok(Self {
            action: action.to_string(),
            method: "POST",
            fields,
        })
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Renders a complete HTML document that submits itself on load.
    ///
    /// A `<noscript>` button keeps the flow usable with scripting disabled.
    pub fn render_html(&self) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    title { "Redirecting to payment" }
                }
                body {
                    form id="payment-redirect" method=(self.method) action=(self.action) {
                        @for field in &self.fields {
                            input type="hidden" name=(field.name) value=(field.value);
                        }
                        noscript {
                            button type="submit" { "Continue to payment" }
                        }
                    }
                    (PreEscaped(AUTOSUBMIT_SCRIPT))
                }
            }
        }
    }
}

/// Coerces a JSON value to the string a form input would carry.
fn field_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
