use serde_json::Value;

use crate::cli::commands::entries::*;
use crate::cli::commands::import::seed_sample;
use crate::cli::error::CliError;
use crate::db::{DbError, SqliteDatabase, SqliteOptions, Storage};

async fn seeded_storage() -> Storage<SqliteDatabase> {
    let storage = Storage::new(SqliteOptions::in_memory());
    seed_sample(&storage).await.expect("Failed to seed");
    storage
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_drivers_table_and_json() {
    let storage = seeded_storage().await;

    let plain = list_drivers(&storage, "table").await.unwrap();
    assert_eq!(plain, "KOPANIARZ\nKRYVAK\nKUBYSHKIN");

    let json: Vec<String> =
        serde_json::from_str(&list_drivers(&storage, "json").await.unwrap()).unwrap();
    assert_eq!(json, ["KOPANIARZ", "KRYVAK", "KUBYSHKIN"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_drivers_empty() {
    let storage: Storage<SqliteDatabase> = Storage::new(SqliteOptions::in_memory());
    assert_eq!(
        list_drivers(&storage, "table").await.unwrap(),
        "No drivers found."
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_entries_table_uses_decimal_comma() {
    let storage = seeded_storage().await;

    let table = list_entries(&storage, Some("KOPANIARZ"), "table")
        .await
        .unwrap();

    assert!(table.contains("Frachty"));
    assert!(table.contains("3128,87"));
    assert!(table.contains("-1443,33"));
    assert!(table.contains("2025-06-01"));
    assert!(!table.contains("KRYVAK"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_entries_json() {
    let storage = seeded_storage().await;

    let output = list_entries(&storage, None, "json").await.unwrap();
    let entries: Vec<Value> = serde_json::from_str(&output).unwrap();

    assert_eq!(entries.len(), 8);
    assert_eq!(entries[0]["driver"], "KRYVAK");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_totals_table_labels_rows_total() {
    let storage = seeded_storage().await;

    let table = totals(
        &storage,
        &["KRYVAK".to_string(), "KUBYSHKIN".to_string()],
        "table",
    )
    .await
    .unwrap();

    assert!(table.contains("TOTAL"));
    assert!(table.contains("2024-11-01"));
    assert!(!table.contains("KRYVAK"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_totals_unknown_driver() {
    let storage = seeded_storage().await;
    let output = totals(&storage, &["NOBODY".to_string()], "table")
        .await
        .unwrap();
    assert_eq!(output, "No totals for the selected drivers.");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upsert_parses_polish_amounts() {
    let storage: Storage<SqliteDatabase> = Storage::new(SqliteOptions::in_memory());
    let measures = MeasureArgs {
        frachty: "12 491,26".to_string(),
        paliwo: "433,44 zł".to_string(),
        wynik_mc: "-3784,26".to_string(),
        ..MeasureArgs::default()
    };

    let output = upsert(&storage, "KOPANIARZ", "2025-07", &measures, "json")
        .await
        .unwrap();
    let entry: Value = serde_json::from_str(&output).unwrap();

    assert_eq!(entry["month"], "2025-07-01");
    assert_eq!(entry["frachty"], 12491.26);
    assert_eq!(entry["paliwo"], 433.44);
    assert_eq!(entry["wynik_mc"], -3784.26);
    assert_eq!(entry["razem"], 0.0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upsert_rejects_bad_month() {
    let storage: Storage<SqliteDatabase> = Storage::new(SqliteOptions::in_memory());

    let result = upsert(
        &storage,
        "KOPANIARZ",
        "lipiec",
        &MeasureArgs::default(),
        "table",
    )
    .await;

    assert!(matches!(
        result,
        Err(CliError::Database(DbError::Validation { .. }))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upsert_rejects_mistyped_amount_and_keeps_stored_row() {
    let storage = seeded_storage().await;
    let before = list_entries(&storage, Some("KRYVAK"), "json").await.unwrap();
    let measures = MeasureArgs {
        frachty: "1O00".to_string(),
        paliwo: "12x4".to_string(),
        ..MeasureArgs::default()
    };

    let result = upsert(&storage, "KRYVAK", "2024-10", &measures, "json").await;

    match result {
        Err(CliError::Database(DbError::Validation { message })) => {
            assert!(message.contains("frachty"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(
        list_entries(&storage, Some("KRYVAK"), "json").await.unwrap(),
        before
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_month_then_driver() {
    let storage = seeded_storage().await;

    let one = delete(&storage, "KRYVAK", Some("2024-10-05"), "table")
        .await
        .unwrap();
    assert_eq!(one, "Deleted 1 entries for KRYVAK");

    let rest: Value =
        serde_json::from_str(&delete(&storage, "KRYVAK", None, "json").await.unwrap()).unwrap();
    assert_eq!(rest["deleted"], 2);
}
