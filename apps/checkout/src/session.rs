//! Session layer: the process-wide bearer token store.
//!
//! The payment controller only reads the token and, through the backend
//! client, reports credential expiry. Writing a token is the login surface's job.

use std::sync::{PoisonError, RwLock};

use tracing::{info, warn};

/// Read access to the current credential plus the expiry hook.
///
/// Injected into the controller and the backend client instead of being read
/// from ambient global state.
pub trait SessionProvider: Send + Sync {
    /// Current bearer token, if the user is signed in.
    fn token(&self) -> Option<String>;

    /// Called when the backend rejects the token with `401`.
    fn expire(&self);
}

/// In-memory token store shared by the whole process.
#[derive(Default)]
pub struct SessionStore {
    token: RwLock<Option<String>>,
}

impl SessionStore {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token),
        }
    }

    /// Replaces the stored token. Blank tokens clear the session.
    pub fn set_token(&self, token: String) {
        let token = Some(token).filter(|t| !t.trim().is_empty());
        let signed_in = token.is_some();
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
        info!(signed_in, "Session token replaced");
    }

    pub fn is_signed_in(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl SessionProvider for SessionStore {
    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn expire(&self) {
        warn!("Session credential rejected by backend; clearing token");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
