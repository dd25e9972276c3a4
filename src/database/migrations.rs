//! Schema migrations for the Markshelf SQLite database.
//!
//! Uses a `schema_version` table to track which migrations have been applied.
//! Each migration runs exactly once and is recorded with a timestamp.

use rusqlite::Connection;

/// Current schema version. Bump this when adding a new migration.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Returns the current schema version from the database (0 if table doesn't exist).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

/// Runs all pending schema migrations against the provided connection.
///
/// Safe to call on every startup.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn run_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at INTEGER NOT NULL,
             description TEXT NOT NULL
         );",
    )?;

    let current = get_schema_version(conn);

    if current < 1 {
        migration_v1(conn)?;
        record_version(conn, 1, "Initial schema: folders, tags, bookmarks, root folder")?;
    }

    if current < 2 {
        migration_v2(conn)?;
        record_version(conn, 2, "Add note content to bookmarks")?;
    }

    Ok(())
}

fn record_version(conn: &Connection, version: i32, description: &str) -> Result<(), rusqlite::Error> {
    let now = chrono::Utc::now().timestamp();
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        rusqlite::params![version, now, description],
    )?;
    Ok(())
}

/// V1: core tables. Folder parents are not foreign keys; the tree is
/// validated by the organizer before any move reaches storage.
fn migration_v1(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS folders (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            icon TEXT NOT NULL DEFAULT 'folder',
            color TEXT,
            parent_id TEXT,
            position INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS tags (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            color TEXT NOT NULL,
            position INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS bookmarks (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            url TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            folder_id TEXT NOT NULL,
            tags TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL DEFAULT '',
            created_at_timestamp INTEGER NOT NULL,
            favicon TEXT,
            visit_count INTEGER NOT NULL DEFAULT 0,
            last_visited INTEGER NOT NULL DEFAULT 0,
            seq INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_bookmarks_folder ON bookmarks(folder_id);
        CREATE INDEX IF NOT EXISTS idx_folders_parent ON folders(parent_id);

        INSERT OR IGNORE INTO folders (id, name, icon, color, parent_id, position)
        VALUES ('all', 'My Bookmarks', 'folder_open', NULL, NULL, 0);
        ",
    )
}

/// V2: markdown notes attached to bookmarks.
fn migration_v2(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch("ALTER TABLE bookmarks ADD COLUMN content TEXT;")
}
