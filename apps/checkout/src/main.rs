mod api_client;
mod config;
mod errors;
mod payments;
mod routes;
mod session;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api_client::ApiClient;
use crate::config::Config;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobApp checkout v{}", env!("CARGO_PKG_VERSION"));

    // Session store (seeded from AUTH_TOKEN when present)
    let session = Arc::new(SessionStore::new(config.auth_token.clone()));
    info!("Session store initialized (signed in: {})", session.is_signed_in());

    // Backend client
    let api = ApiClient::new(
        config.api_base_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
        session.clone(),
    )?;
    info!(
        "Backend client initialized (base: {}, timeout: {}s)",
        api.base_url(),
        config.request_timeout_secs
    );

    let state = AppState::new(Arc::new(api), session, config.clone());

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("127.0.0.1:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
