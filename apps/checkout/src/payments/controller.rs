//! Payment Initiation Controller.
//!
//! Owns the selected method and the `RequestState` of the latest attempt.
//! `initiate` drives: guard → InFlight → backend call → dispatch by method →
//! Succeeded | Failed. The state mutex is never held across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::payments::backend::PaymentsBackend;
use crate::payments::error::PaymentError;
use crate::payments::models::{
    CheckoutSnapshot, InitiationRequest, InitiationResult, PaymentMethod, RequestState, CURRENCY,
    SERVICE_FEE,
};
use crate::payments::redirect_form::RedirectForm;
use crate::session::SessionProvider;

/// What the caller must do with a successful attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Hand the browser an auto-submitting form; control leaves this client.
    Redirect(RedirectForm),
    /// Manual-transfer instructions, exactly as the backend sent them.
    Instructions(Value),
}

struct Inner {
    method: PaymentMethod,
    state: RequestState,
    updated_at: DateTime<Utc>,
}

impl Inner {
    fn transition(&mut self, state: RequestState) {
        self.state = state;
        self.updated_at = Utc::now();
    }
}

pub struct PaymentController {
    backend: Arc<dyn PaymentsBackend>,
    session: Arc<dyn SessionProvider>,
    inner: Mutex<Inner>,
}

impl PaymentController {
    pub fn new(backend: Arc<dyn PaymentsBackend>, session: Arc<dyn SessionProvider>) -> Self {
        Self {
            backend,
            session,
            inner: Mutex::new(Inner {
                method: PaymentMethod::default(),
                state: RequestState::Idle,
                updated_at: Utc::now(),
            }),
        }
    }

    /// Records the user's choice. Applies to the next attempt; an attempt
    /// already in flight keeps the method it started with.
    pub fn select_method(&self, method: PaymentMethod) {
        let mut inner = self.lock();
        if inner.state.is_in_flight() {
            debug!(%method, "Method changed while a payment is in flight");
        }
        inner.method = method;
    }

    pub fn method(&self) -> PaymentMethod {
        self.lock().method
    }

    pub fn state(&self) -> RequestState {
        self.lock().state.clone()
    }

    pub fn snapshot(&self) -> CheckoutSnapshot {
        let inner = self.lock();
        CheckoutSnapshot {
            payment_method: inner.method,
            pay_label: inner.method.pay_label(),
            amount: SERVICE_FEE,
            currency: CURRENCY,
            busy: inner.state.is_in_flight(),
            state: inner.state.clone(),
            updated_at: inner.updated_at,
        }
    }

    /// Runs one initiation attempt with the currently selected method.
    ///
    /// Rejected without side effects when an attempt is already in flight
    /// (`Busy`) or no credential is available (`Unauthenticated`). Otherwise
    /// exactly one of: `Ok(Redirect)`, `Ok(Instructions)`, or `Err` with the
    /// controller left in `Failed`.
    pub async fn initiate(&self) -> Result<Dispatch, PaymentError> {
        let request = self.begin()?;
        let method = request.method;
        let attempt = InFlightGuard::new(self);

        info!(%method, "Initiating payment");

        let outcome = match self.backend.initiate(&request).await {
            Ok(body) => InitiationResult::from_response(method, body),
            Err(e) => Err(e),
        };
        drop(request);

        match outcome {
            Ok(result) => {
                attempt.settle(RequestState::Succeeded);
                Ok(match result {
                    InitiationResult::HostedRedirect(form) => {
                        info!(
                            %method,
                            fields = form.fields.len(),
                            "Payment initiated; redirecting to hosted payment page"
                        );
                        Dispatch::Redirect(form)
                    }
                    InitiationResult::ManualTransfer(instructions) => {
                        info!(%method, "Payment initiated; transfer instructions issued");
                        Dispatch::Instructions(instructions)
                    }
                })
            }
            Err(e) => {
                error!(%method, "Payment initiation failed: {e}");
                attempt.settle(RequestState::Failed(e.user_message()));
                Err(e)
            }
        }
    }

    /// Entry guard. Checks and the InFlight transition happen under one lock.
    fn begin(&self) -> Result<InitiationRequest, PaymentError> {
        let mut inner = self.lock();
        if inner.state.is_in_flight() {
            warn!("Rejected payment initiation: another attempt is in flight");
            return Err(PaymentError::Busy);
        }
        let auth_token = self.session.token().ok_or(PaymentError::Unauthenticated)?;
        inner.transition(RequestState::InFlight);
        Ok(InitiationRequest {
            method: inner.method,
            auth_token,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns the controller to `Idle` if the `initiate` future is dropped
/// before it settles (e.g. the HTTP client went away mid-request).
struct InFlightGuard<'a> {
    controller: &'a PaymentController,
    settled: bool,
}

impl<'a> InFlightGuard<'a> {
    fn new(controller: &'a PaymentController) -> Self {
        Self {
            controller,
            settled: false,
        }
    }

    fn settle(mut self, state: RequestState) {
        self.controller.lock().transition(state);
        self.settled = true;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Payment initiation abandoned before the backend answered");
            self.controller.lock().transition(RequestState::Idle);
        }
    }
}
