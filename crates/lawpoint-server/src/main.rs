//! # lawpoint-server
//!
//! HTTP gateway of the Lawpoint marketplace.
//!
//! The handlers carry no business logic: request bodies are passed through
//! to the document store (clients, lawyers, cases, chats, requests, posts)
//! and every failure is reported as `500 {"error": ...}`. Optionally serves
//! the built frontend from `STATIC_DIR`.

mod api;
mod config;
mod error;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lawpoint_store::Database;

use crate::api::AppState;
use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is not an error.
    let _ = dotenvy::dotenv();

    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("info,lawpoint_server=debug,lawpoint_store=info")
            }),
        )
        .init();

    info!("Starting Lawpoint gateway v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 3. Open the document store. Failure here halts startup.
    // -----------------------------------------------------------------------
    let db = Database::open_at(&config.database_path).with_context(|| {
        format!(
            "failed to open document store at {}",
            config.database_path.display()
        )
    })?;

    let http_addr = config.http_addr;
    let state = AppState::new(db, config);

    // -----------------------------------------------------------------------
    // 4. Run the HTTP API server until Ctrl+C / SIGTERM
    // -----------------------------------------------------------------------
    if let Err(e) = api::serve(state, http_addr, shutdown_signal()).await {
        tracing::error!(error = %e, "HTTP server failed");
        return Err(e);
    }

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
