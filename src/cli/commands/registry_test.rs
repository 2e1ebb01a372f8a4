use serde_json::Value;

use crate::cli::commands::registry::*;
use crate::cli::error::CliError;
use crate::db::{DbError, SqliteDatabase, SqliteOptions, Storage};

fn storage() -> Storage<SqliteDatabase> {
    Storage::new(SqliteOptions::in_memory())
}

async fn registered(storage: &Storage<SqliteDatabase>) -> Vec<Value> {
    serde_json::from_str(&list(storage, "json").await.unwrap()).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_registry_lifecycle() {
    let storage = storage();

    let output = add(&storage, " Kryvak ").await.unwrap();
    assert!(output.starts_with("Registered driver: Kryvak ("));
    add(&storage, "Kopaniarz").await.unwrap();

    let drivers = registered(&storage).await;
    assert_eq!(drivers.len(), 2);
    assert_eq!(drivers[0]["name"], "Kopaniarz");
    let kryvak_id = drivers[1]["id"].as_i64().unwrap();

    let renamed = rename(&storage, kryvak_id, "Kryvak Ivan").await.unwrap();
    assert_eq!(renamed, format!("Renamed driver {} to Kryvak Ivan", kryvak_id));

    let table = list(&storage, "table").await.unwrap();
    assert!(table.contains("Kryvak Ivan"));
    assert!(table.contains("Name"));

    let ids: Vec<i64> = registered(&storage)
        .await
        .iter()
        .map(|d| d["id"].as_i64().unwrap())
        .collect();
    assert_eq!(remove(&storage, &ids).await.unwrap(), "Removed 2 drivers");
    assert_eq!(
        list(&storage, "table").await.unwrap(),
        "No drivers registered."
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_blank_name_is_validation_error() {
    let storage = storage();
    assert!(matches!(
        add(&storage, "  ").await,
        Err(CliError::Database(DbError::Validation { .. }))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rename_unknown_driver() {
    let storage = storage();
    assert!(matches!(
        rename(&storage, 77, "Nobody").await,
        Err(CliError::DriverNotFound { id: 77 })
    ));
}
