//! Read-only dashboard queries.
//!
//! These endpoints never fail on storage errors: the repository degrades
//! reads to empty results and logs the cause.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Serialize;
use tracing::instrument;

use crate::api::AppState;
use crate::db::{Database, Entry, MonthlyTotal};

/// Drivers preselected by the totals view when the request names none.
pub const DEFAULT_SELECTION: usize = 5;

/// Response of `GET /api/data`, shaped by the query string.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DataResponse {
    Driver {
        entries: Vec<Entry>,
    },
    Totals {
        totals: Vec<MonthlyTotal>,
    },
    Overview {
        drivers: Vec<String>,
        entries: Vec<Entry>,
    },
}

#[derive(Debug, Serialize)]
pub struct TotalsResponse {
    pub selected: Vec<String>,
    pub totals: Vec<MonthlyTotal>,
}

/// Values of every occurrence of `key`, in request order.
fn all_values(params: &[(String, String)], key: &str) -> Vec<String> {
    params
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .collect()
}

/// `?driver=X` → entries of X; `?drivers=A&drivers=B` → monthly totals;
/// otherwise every driver and entry.
#[instrument(skip(state))]
pub async fn get_data<D: Database>(
    State(state): State<AppState<D>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<DataResponse> {
    let repo = state.entries();

    let driver = all_values(&params, "driver")
        .into_iter()
        .find(|d| !d.is_empty());
    if let Some(driver) = driver {
        return Json(DataResponse::Driver {
            entries: repo.entries_by_driver(&driver).await,
        });
    }

    let drivers = all_values(&params, "drivers");
    if !drivers.is_empty() {
        return Json(DataResponse::Totals {
            totals: repo.monthly_totals_for_drivers(&drivers).await,
        });
    }

    Json(DataResponse::Overview {
        drivers: repo.list_drivers().await,
        entries: repo.all_entries().await,
    })
}

/// Distinct driver names that have entries.
#[instrument(skip(state))]
pub async fn list_drivers<D: Database>(State(state): State<AppState<D>>) -> Json<Vec<String>> {
    Json(state.entries().list_drivers().await)
}

/// Monthly totals for `?drivers=...`, defaulting to the first few drivers.
#[instrument(skip(state))]
pub async fn get_totals<D: Database>(
    State(state): State<AppState<D>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<TotalsResponse> {
    let repo = state.entries();

    let mut selected = all_values(&params, "drivers");
    if selected.is_empty() {
        selected = repo
            .list_drivers()
            .await
            .into_iter()
            .take(DEFAULT_SELECTION)
            .collect();
    }

    let totals = repo.monthly_totals_for_drivers(&selected).await;
    Json(TotalsResponse { selected, totals })
}
