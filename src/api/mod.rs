//! JSON HTTP server over the ledger query surface.

mod handlers;
pub mod routes;
mod state;


use std::net::IpAddr;

use miette::Diagnostic;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::db::{Database, DbError, Storage};

pub use handlers::ErrorResponse;
pub use state::AppState;

/// API server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 3000,
        }
    }
}

#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("Storage error: {0}")]
    #[diagnostic(code(driver_ledger::api::storage))]
    Storage(#[from] DbError),

    #[error("Failed to bind {addr}: {source}")]
    #[diagnostic(
        code(driver_ledger::api::bind),
        help("Is another process already listening on this port? Try --port.")
    )]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    #[diagnostic(code(driver_ledger::api::serve))]
    Serve(#[source] std::io::Error),
}

/// Open the storage, serve until Ctrl-C, then close the storage.
pub async fn run<D: Database>(config: Config, storage: Storage<D>) -> Result<(), ApiError> {
    let db = storage.open().await?;
    let app = routes::create_router(AppState::new(db)).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ApiError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ApiError::Serve)?;

    info!("shutting down");
    storage.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
