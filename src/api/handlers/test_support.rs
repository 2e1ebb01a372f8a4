//! Shared helpers for handler tests.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crate::api::{AppState, routes};
use crate::db::{Database, EntryRepository, SqliteDatabase};

/// Create a test app with an in-memory database
pub async fn test_app() -> (Router, Arc<SqliteDatabase>) {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create test database");
    db.migrate().await.expect("Failed to run migrations");
    let db = Arc::new(db);
    let app = routes::create_router(AppState::new(Arc::clone(&db)));
    (app, db)
}

/// Test app pre-filled with the sample dataset
pub async fn seeded_app() -> (Router, Arc<SqliteDatabase>) {
    let (app, db) = test_app().await;
    crate::import::seed(&EntryRepository::new(db.entry_store()))
        .await
        .expect("Failed to seed");
    (app, db)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn with_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

/// Helper to parse JSON response body
pub async fn json_body(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
