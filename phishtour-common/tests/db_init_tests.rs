//! Integration tests for database initialization
//!
//! Covers automatic database creation on first run, reopening an existing
//! database, and schema availability immediately after init.

use phishtour_common::db::{init_database, load_show, save_show, Show};
use tempfile::tempdir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("phishtour.db");

    let result = init_database(&db_path).await;
    assert!(
        result.is_ok(),
        "Database initialization failed: {:?}",
        result.err()
    );

    // Verify database file was created
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("phishtour.db");

    let pool1 = init_database(&db_path).await.expect("first init");
    pool1.close().await;

    let pool2 = init_database(&db_path).await;
    assert!(
        pool2.is_ok(),
        "Failed to open existing database: {:?}",
        pool2.err()
    );
}

#[tokio::test]
async fn test_database_creates_parent_directories() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("nested").join("deeper").join("phishtour.db");

    init_database(&db_path).await.expect("init with missing parents");
    assert!(db_path.exists());
}

#[tokio::test]
async fn test_shows_table_usable_after_init() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("phishtour.db");

    let pool = init_database(&db_path).await.unwrap();

    let show = Show::from_date(
        320,
        "1994-06-18",
        "UIC Pavilion".to_string(),
        "Chicago, IL".to_string(),
    )
    .unwrap();

    save_show(&pool, &show).await.expect("save after init");
    let loaded = load_show(&pool, 320).await.unwrap();
    assert_eq!(loaded, Some(show));
}

#[tokio::test]
async fn test_shows_survive_reopen() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("phishtour.db");

    let pool = init_database(&db_path).await.unwrap();
    let show = Show::from_date(
        1324,
        "1998-07-29",
        "Riverport Amphitheatre".to_string(),
        "Maryland Heights, MO".to_string(),
    )
    .unwrap();
    save_show(&pool, &show).await.unwrap();
    pool.close().await;

    let pool = init_database(&db_path).await.unwrap();
    let loaded = load_show(&pool, 1324).await.unwrap();
    assert_eq!(loaded, Some(show));
}
