use std::sync::Arc;

use crate::config::Config;
use crate::payments::backend::PaymentsBackend;
use crate::payments::controller::PaymentController;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one payment controller of this client; its in-flight guard spans all requests.
    pub controller: Arc<PaymentController>,
    pub backend: Arc<dyn PaymentsBackend>,
    pub session: Arc<SessionStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        backend: Arc<dyn PaymentsBackend>,
        session: Arc<SessionStore>,
        config: Config,
    ) -> Self {
        let controller = Arc::new(PaymentController::new(backend.clone(), session.clone()));
        Self {
            controller,
            backend,
            session,
            config,
        }
    }
}
