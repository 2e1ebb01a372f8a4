//! Integration tests for entry endpoints.

use axum::http::StatusCode;
use serde_json::json;

use super::test_support::*;
use crate::db::Database;

// =============================================================================
// GET /api/entries
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn list_entries_initially_empty() {
    let (app, _db) = test_app().await;

    let response = send(&app, get("/api/entries")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test(flavor = "multi_thread")]
async fn driver_entries_sorted_by_month() {
    let (app, _db) = seeded_app().await;

    let body = json_body(send(&app, get("/api/entries/KRYVAK")).await).await;

    let months: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["month"].as_str().unwrap())
        .collect();
    assert_eq!(months, ["2024-09-01", "2024-10-01", "2024-11-01"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn driver_entries_unknown_driver_is_empty() {
    let (app, _db) = seeded_app().await;

    let response = send(&app, get("/api/entries/NOBODY")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
}

// =============================================================================
// PUT /api/entries
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn upsert_creates_then_replaces() {
    let (app, _db) = test_app().await;

    let created = json_body(
        send(
            &app,
            with_json(
                "PUT",
                "/api/entries",
                json!({
                    "driver": "KRYVAK",
                    "month": "2024-10-01",
                    "frachty": 11892.95,
                    "paliwo": 1758.26,
                    "razem": 13651.21,
                    "wynagr": 12508.98,
                    "wynik_mc": 1142.23,
                    "wynik_narast": 787.95
                }),
            ),
        )
        .await,
    )
    .await;
    assert_eq!(created["month"], "2024-10-01");
    assert_eq!(created["frachty"], 11892.95);

    let response = send(
        &app,
        with_json(
            "PUT",
            "/api/entries",
            json!({ "driver": "KRYVAK", "month": "2024-10-17", "frachty": 1.0 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let replaced = json_body(response).await;

    assert_eq!(replaced["id"], created["id"]);
    assert_eq!(replaced["frachty"], 1.0);
    assert_eq!(replaced["paliwo"], 0.0);

    let all = json_body(send(&app, get("/api/entries")).await).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn upsert_blank_driver_is_bad_request() {
    let (app, _db) = test_app().await;

    let response = send(
        &app,
        with_json(
            "PUT",
            "/api/entries",
            json!({ "driver": "  ", "month": "2024-10-01" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("driver"));
}

#[tokio::test(flavor = "multi_thread")]
async fn upsert_invalid_month_is_rejected() {
    let (app, _db) = test_app().await;

    let response = send(
        &app,
        with_json(
            "PUT",
            "/api/entries",
            json!({ "driver": "KRYVAK", "month": "October" }),
        ),
    )
    .await;

    assert!(response.status().is_client_error());
}

#[tokio::test(flavor = "multi_thread")]
async fn upsert_on_closed_pool_is_unavailable() {
    let (app, db) = test_app().await;
    db.close().await;

    let response = send(
        &app,
        with_json(
            "PUT",
            "/api/entries",
            json!({ "driver": "KRYVAK", "month": "2024-10-01" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// =============================================================================
// DELETE /api/entries/{driver}[/{month}]
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn delete_entry_by_any_day_of_month() {
    let (app, _db) = seeded_app().await;

    let response = send(&app, delete("/api/entries/KRYVAK/2024-10-20")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "deleted": 1 }));

    let again = json_body(send(&app, delete("/api/entries/KRYVAK/2024-10")).await).await;
    assert_eq!(again, json!({ "deleted": 0 }));

    let remaining = json_body(send(&app, get("/api/entries/KRYVAK")).await).await;
    assert_eq!(remaining.as_array().unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_entry_bad_month_is_bad_request() {
    let (app, _db) = seeded_app().await;

    let response = send(&app, delete("/api/entries/KRYVAK/someday")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_driver_entries_leaves_others() {
    let (app, _db) = seeded_app().await;

    let body = json_body(send(&app, delete("/api/entries/KOPANIARZ")).await).await;
    assert_eq!(body, json!({ "deleted": 3 }));

    let drivers = json_body(send(&app, get("/api/drivers")).await).await;
    assert_eq!(drivers, json!(["KRYVAK", "KUBYSHKIN"]));
}
