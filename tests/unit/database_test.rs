//! Unit tests for the Markshelf database layer (connection + migrations).

use markshelf::database::migrations::{get_schema_version, run_all, CURRENT_SCHEMA_VERSION};
use markshelf::database::Database;

fn table_exists(db: &Database, table: &str) -> bool {
    db.connection()
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
            [table],
            |row| row.get(0),
        )
        .unwrap_or(false)
}

#[test]
fn test_open_in_memory_succeeds() {
    assert!(Database::open_in_memory().is_ok());
}

#[test]
fn test_migrations_create_all_tables() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    for table in ["folders", "tags", "bookmarks", "schema_version"] {
        assert!(table_exists(&db, table), "Table '{}' should exist after migrations", table);
    }
}

#[test]
fn test_migrations_create_indexes() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    for index in ["idx_bookmarks_folder", "idx_folders_parent"] {
        let exists: bool = db
            .connection()
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='index' AND name=?1",
                [index],
                |row| row.get(0),
            )
            .unwrap_or(false);
        assert!(exists, "Index '{}' should exist after migrations", index);
    }
}

#[test]
fn test_root_folder_is_seeded() {
    let db = Database::open_in_memory().unwrap();
    let (name, parent): (String, Option<String>) = db
        .connection()
        .query_row("SELECT name, parent_id FROM folders WHERE id = 'all'", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .unwrap();
    assert_eq!(name, "My Bookmarks");
    assert!(parent.is_none());
}

#[test]
fn test_schema_version_is_current() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);
    assert_eq!(db.schema_version(), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_transaction_rolls_back_when_dropped() {
    let mut db = Database::open_in_memory().unwrap();
    {
        let tx = db.transaction().unwrap();
        tx.execute("DELETE FROM folders", []).unwrap();
    }
    let folders: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM folders", [], |row| row.get(0))
        .unwrap();
    assert_eq!(folders, 1);
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::open_in_memory().unwrap();
    run_all(db.connection()).expect("second run should be a no-op");
    run_all(db.connection()).expect("third run should be a no-op");

    let roots: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM folders WHERE id = 'all'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(roots, 1);
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_bookmarks_have_content_column() {
    let db = Database::open_in_memory().unwrap();
    db.connection()
        .execute(
            "INSERT INTO bookmarks (id, title, url, folder_id, created_at_timestamp, content)
             VALUES ('b1', 'T', 'https://t.dev', 'all', 0, '# notes')",
            [],
        )
        .expect("content column should exist");
}

#[test]
fn test_open_file_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shelf.db");
    {
        let db = Database::open(&path).unwrap();
        db.connection()
            .execute(
                "INSERT INTO tags (id, name, color, position) VALUES ('t1', 'Dev', 'blue', 0)",
                [],
            )
            .unwrap();
    }
    let db = Database::open(&path).unwrap();
    let name: String = db
        .connection()
        .query_row("SELECT name FROM tags WHERE id = 't1'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(name, "Dev");
}
