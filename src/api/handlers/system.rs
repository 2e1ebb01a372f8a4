//! System health handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::api::AppState;
use crate::db::Database;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
    /// Storage backend name
    pub backend: &'static str,
    /// True when data lives in a volatile fallback store
    pub degraded: bool,
}

/// Health check endpoint
#[instrument(skip(state))]
pub async fn health<D: Database>(State(state): State<AppState<D>>) -> Json<HealthResponse> {
    let db = state.db();
    Json(HealthResponse {
        status: if db.is_degraded() { "degraded" } else { "ok" },
        backend: db.backend(),
        degraded: db.is_degraded(),
    })
}
