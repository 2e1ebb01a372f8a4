//! Entry handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::api::AppState;
use crate::db::{Database, Entry, Month, NewEntry};

use super::{DeletedResponse, HandlerResult, db_error};

/// Every entry, ordered by month then driver.
#[instrument(skip(state))]
pub async fn list_entries<D: Database>(State(state): State<AppState<D>>) -> Json<Vec<Entry>> {
    Json(state.entries().all_entries().await)
}

/// Entries of one driver, ordered by month.
#[instrument(skip(state))]
pub async fn driver_entries<D: Database>(
    State(state): State<AppState<D>>,
    Path(driver): Path<String>,
) -> Json<Vec<Entry>> {
    Json(state.entries().entries_by_driver(&driver).await)
}

/// Insert or replace the entry for (driver, month).
#[instrument(skip(state, input), fields(driver = %input.driver, month = %input.month))]
pub async fn upsert_entry<D: Database>(
    State(state): State<AppState<D>>,
    Json(input): Json<NewEntry>,
) -> HandlerResult<Json<Entry>> {
    let entry = state.entries().upsert_entry(input).await.map_err(db_error)?;
    Ok(Json(entry))
}

/// Delete the entry for (driver, month). `month` may be any date in it.
#[instrument(skip(state))]
pub async fn delete_entry<D: Database>(
    State(state): State<AppState<D>>,
    Path((driver, month)): Path<(String, String)>,
) -> HandlerResult<Json<DeletedResponse>> {
    let month: Month = month.parse().map_err(db_error)?;
    let deleted = state
        .entries()
        .delete_entry(&driver, month)
        .await
        .map_err(db_error)?;
    Ok(Json(DeletedResponse { deleted }))
}

/// Delete every entry of a driver.
#[instrument(skip(state))]
pub async fn delete_driver_entries<D: Database>(
    State(state): State<AppState<D>>,
    Path(driver): Path<String>,
) -> HandlerResult<Json<DeletedResponse>> {
    let deleted = state
        .entries()
        .delete_driver(&driver)
        .await
        .map_err(db_error)?;
    Ok(Json(DeletedResponse { deleted }))
}
