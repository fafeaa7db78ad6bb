//! Shared fakes for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::payments::backend::PaymentsBackend;
use crate::payments::error::PaymentError;
use crate::payments::models::{InitiationRequest, PaymentMethod};
use crate::session::SessionProvider;

/// Serves `app` on an ephemeral loopback port and returns its base URL.
pub async fn spawn_stub(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Base URL of a loopback port nothing listens on.
pub async fn unused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Session double that counts expiry-hook invocations.
#[derive(Default)]
pub struct RecordingSession {
    token: Mutex<Option<String>>,
    expired: AtomicUsize,
}

impl RecordingSession {
    pub fn signed_in(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
            expired: AtomicUsize::new(0),
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn expired_count(&self) -> usize {
        self.expired.load(Ordering::SeqCst)
    }
}

impl SessionProvider for RecordingSession {
    fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn expire(&self) {
        self.expired.fetch_add(1, Ordering::SeqCst);
        *self.token.lock().unwrap() = None;
    }
}

/// Canned backend outcome.
pub enum Scripted {
    Body(Value),
    Status(u16),
    Network,
}

/// Backend double replaying scripted outcomes in order.
///
/// With `gated()`, each call signals `entered` and then waits for `release`
/// before answering, which holds the controller in flight.
#[derive(Default)]
pub struct FakeBackend {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<(PaymentMethod, String)>>,
    status_calls: Mutex<Vec<Uuid>>,
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl FakeBackend {
    pub fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            ..Default::default()
        }
    }

    pub fn gated(script: impl IntoIterator<Item = Scripted>) -> (Self, Arc<Notify>, Arc<Notify>) {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let backend = Self {
            gate: Some((entered.clone(), release.clone())),
            ..Self::new(script)
        };
        (backend, entered, release)
    }

    pub fn calls(&self) -> Vec<(PaymentMethod, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn status_calls(&self) -> Vec<Uuid> {
        self.status_calls.lock().unwrap().clone()
    }

    fn next(&self) -> Result<Value, PaymentError> {
        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Body(body)) => Ok(body),
            Some(Scripted::Status(status)) => Err(PaymentError::Server {
                status,
                message: "scripted failure".to_string(),
            }),
            Some(Scripted::Network) | None => {
                Err(PaymentError::Network("connection refused".to_string()))
            }
        }
    }
}

#[async_trait]
impl PaymentsBackend for FakeBackend {
    async fn initiate(&self, request: &InitiationRequest) -> Result<Value, PaymentError> {
        self.calls
            .lock()
            .unwrap()
            .push((request.method, request.auth_token.clone()));
        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }
        self.next()
    }

    async fn status(&self, _auth_token: &str, payment_id: Uuid) -> Result<Value, PaymentError> {
        self.status_calls.lock().unwrap().push(payment_id);
        self.next()
    }
}
