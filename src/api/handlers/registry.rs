//! Driver registry handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use crate::api::AppState;
use crate::db::{Database, Driver, DriverId, DriverRepository};

use super::{DeletedResponse, HandlerResult, db_error, error_response};

/// Create or rename request DTO
#[derive(Debug, Deserialize)]
pub struct DriverNameRequest {
    pub name: String,
}

/// Bulk delete request DTO
#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<DriverId>,
}

#[instrument(skip(state))]
pub async fn list_registered_drivers<D: Database>(
    State(state): State<AppState<D>>,
) -> HandlerResult<Json<Vec<Driver>>> {
    let drivers = state.drivers().list().await.map_err(db_error)?;
    Ok(Json(drivers))
}

#[instrument(skip(state))]
pub async fn create_driver<D: Database>(
    State(state): State<AppState<D>>,
    Json(req): Json<DriverNameRequest>,
) -> HandlerResult<(StatusCode, Json<Driver>)> {
    let driver = state.drivers().create(&req.name).await.map_err(db_error)?;
    Ok((StatusCode::CREATED, Json(driver)))
}

#[instrument(skip(state))]
pub async fn update_driver<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<DriverId>,
    Json(req): Json<DriverNameRequest>,
) -> HandlerResult<Json<Driver>> {
    state
        .drivers()
        .update(id, &req.name)
        .await
        .map_err(db_error)?
        .map(Json)
        .ok_or_else(|| {
            error_response(StatusCode::NOT_FOUND, format!("Driver {} not found", id))
        })
}

#[instrument(skip(state))]
pub async fn delete_driver<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<DriverId>,
) -> HandlerResult<Json<DeletedResponse>> {
    let deleted = state.drivers().delete(id).await.map_err(db_error)?;
    Ok(Json(DeletedResponse { deleted }))
}

#[instrument(skip(state))]
pub async fn bulk_delete_drivers<D: Database>(
    State(state): State<AppState<D>>,
    Json(req): Json<BulkDeleteRequest>,
) -> HandlerResult<Json<DeletedResponse>> {
    if req.ids.is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "No drivers selected"));
    }
    let deleted = state
        .drivers()
        .delete_many(&req.ids)
        .await
        .map_err(db_error)?;
    Ok(Json(DeletedResponse { deleted }))
}
