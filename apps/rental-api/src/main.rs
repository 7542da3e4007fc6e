//! # Rental API
//!
//! HTTP server for the vehicle rental backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Rental API Server                                │
//! │                                                                         │
//! │  Client ───► HTTP (3000) ───► Services ───► SQLite (WAL)               │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │            JWT identity                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use rental_api::services::UserService;
use rental_api::{build_router, AppConfig, AppState};
use rental_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (RUST_LOG overrides the default)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Rental API server...");

    // Load configuration
    let config = AppConfig::load()?;
    info!(
        port = config.port,
        database = %config.database_path.display(),
        env = ?config.app_env,
        "Configuration loaded"
    );

    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Connect to database (migrations run on connect)
    let db = Database::new(config.db_config()).await?;
    info!("Database ready");

    // Create the admin account if configured
    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        match UserService::new(db.clone()).bootstrap_admin(email, password).await {
            Ok(true) => info!(email = %email, "Admin account created"),
            Ok(false) => info!(email = %email, "Admin account already exists"),
            Err(e) => warn!(email = %email, error = %e, "Failed to create admin account"),
        }
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(db.clone(), config);
    let app = build_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Starting HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
