//! Tests for the SQLite driver registry.

use crate::db::{Database, DbError, DriverRepository, SqliteDatabase, SqliteDriverRepository};

async fn setup_repo() -> SqliteDriverRepository {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    db.drivers()
}

#[tokio::test(flavor = "multi_thread")]
async fn create_trims_name_and_sets_timestamps() {
    let repo = setup_repo().await;

    let driver = repo
        .create("  Kopaniarz  ")
        .await
        .expect("Create should succeed");

    assert!(driver.id > 0);
    assert_eq!(driver.name, "Kopaniarz");
    assert_eq!(driver.created_at, driver.updated_at);
}

#[tokio::test(flavor = "multi_thread")]
async fn create_rejects_blank_name() {
    let repo = setup_repo().await;

    let result = repo.create("   ").await;

    assert!(matches!(result, Err(DbError::Validation { .. })));
    assert!(repo.list().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn list_orders_by_name() {
    let repo = setup_repo().await;
    for name in ["Kubyshkin", "Kopaniarz", "Kryvak"] {
        repo.create(name).await.unwrap();
    }

    let names: Vec<String> = repo
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, ["Kopaniarz", "Kryvak", "Kubyshkin"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_names_are_allowed() {
    let repo = setup_repo().await;
    let a = repo.create("Kryvak").await.unwrap();
    let b = repo.create("Kryvak").await.unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(repo.list().await.unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn update_renames_and_refreshes_updated_at() {
    let repo = setup_repo().await;
    let created = repo.create("Kryvak").await.unwrap();

    let updated = repo
        .update(created.id, " Kryvak Ivan ")
        .await
        .unwrap()
        .expect("driver should exist");

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Kryvak Ivan");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test(flavor = "multi_thread")]
async fn update_unknown_id_returns_none() {
    let repo = setup_repo().await;
    assert!(repo.update(999, "Nobody").await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn update_rejects_blank_name() {
    let repo = setup_repo().await;
    let created = repo.create("Kryvak").await.unwrap();

    assert!(matches!(
        repo.update(created.id, "").await,
        Err(DbError::Validation { .. })
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_reports_rows_removed() {
    let repo = setup_repo().await;
    let created = repo.create("Kryvak").await.unwrap();

    assert_eq!(repo.delete(created.id).await.unwrap(), 1);
    assert_eq!(repo.delete(created.id).await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_many_removes_only_listed_ids() {
    let repo = setup_repo().await;
    let a = repo.create("A").await.unwrap();
    let b = repo.create("B").await.unwrap();
    let c = repo.create("C").await.unwrap();

    let removed = repo.delete_many(&[a.id, c.id, 12345]).await.unwrap();

    assert_eq!(removed, 2);
    let remaining = repo.list().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, b.id);
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_many_empty_list_is_zero() {
    let repo = setup_repo().await;
    repo.create("A").await.unwrap();

    assert_eq!(repo.delete_many(&[]).await.unwrap(), 0);
    assert_eq!(repo.list().await.unwrap().len(), 1);
}
