use serde_json::Value;

use crate::cli::commands::entries::list_drivers;
use crate::cli::commands::import::*;
use crate::db::{SqliteDatabase, SqliteOptions, Storage};

#[tokio::test(flavor = "multi_thread")]
async fn test_import_file_reports_counts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("full_dataset.csv");
    std::fs::write(
        &path,
        "driver,month,frachty,paliwo,razem,wynagr,wynik_mc,wynik_narast\n\
         KRYVAK,2024-09-01,\"23081,65\",\"775,52\",\"23857,17\",\"25317,67\",\"-1460,5\",\"-1128,07\"\n\
         KRYVAK,2024-10-01\n",
    )
    .unwrap();
    let storage: Storage<SqliteDatabase> = Storage::new(SqliteOptions::in_memory());

    let output = import_file(&storage, &path, "table").await.unwrap();
    assert!(output.starts_with("Imported 1 rows"));
    assert!(output.contains("1 skipped, 0 failed"));

    let json: Value =
        serde_json::from_str(&import_file(&storage, &path, "json").await.unwrap()).unwrap();
    assert_eq!(json["imported"], 1);
    assert_eq!(json["skipped"], 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_import_missing_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.csv");
    let storage: Storage<SqliteDatabase> = Storage::new(SqliteOptions::in_memory());

    let output = import_file(&storage, &path, "table").await.unwrap();

    assert!(output.starts_with("Nothing imported"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_seed_sample_persists_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join(".data").join("transport.sqlite");

    let storage: Storage<SqliteDatabase> = Storage::new(SqliteOptions::file(&db_path));
    assert_eq!(seed_sample(&storage).await.unwrap(), "Seeded 8 rows");
    storage.close().await;

    let reopened: Storage<SqliteDatabase> = Storage::new(SqliteOptions::file(&db_path));
    assert_eq!(
        list_drivers(&reopened, "table").await.unwrap(),
        "KOPANIARZ\nKRYVAK\nKUBYSHKIN"
    );
}
