//! # brewzzle-server
//!
//! HTTP server for the brewzzle place-search gateway.
//!
//! This binary provides:
//! - REST API for text, type, open-status, details and nearby search
//! - OpenAPI document at `/openapi.json`
//! - Structured logging to file and stdout
//!
//! ## Running
//!
//! ```bash
//! # Development
//! GOOGLE_MAPS_API_KEY=... cargo run --package brewzzle-server
//!
//! # Production
//! BREWZZLE__SERVER__PRODUCTION=true ./brewzzle-server
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use brewzzle_core::Config;
use brewzzle_server::api::create_router;
use brewzzle_server::logging;
use brewzzle_server::state::AppState;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    logging::init(&config.logging, config.server.production)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        production = config.server.production,
        "Starting brewzzle-server"
    );

    let addr = config.server.socket_addr()?;
    let state = AppState::new(config)?;
    info!(
        base_url = %state.config().provider.base_url,
        timeout_secs = state.config().provider.timeout_secs,
        details_concurrency = state.config().provider.details_concurrency,
        "Places provider configured"
    );
    let app = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM (Ctrl+C elsewhere).
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigint, mut sigterm) = match (
            signal(SignalKind::interrupt()),
            signal(SignalKind::terminate()),
        ) {
            (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "Could not install signal handlers, falling back to Ctrl+C");
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Received Ctrl+C, initiating shutdown...");
                }
                return;
            }
        };

        tokio::select! {
            _ = sigint.recv() => {
                info!("Received SIGINT, initiating shutdown...");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, initiating shutdown...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Ctrl+C handler failed");
        }
        info!("Received Ctrl+C, initiating shutdown...");
    }
}
