//! SQLite connection wrapper for the local backend.
//!
//! Every connection, file or in-memory, is migrated to
//! [`migrations::CURRENT_SCHEMA_VERSION`] before it is handed out.

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, Transaction};

use super::migrations;

/// How long a statement waits on a locked database file before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) the database file at `path`.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the file cannot be opened or a migration fails.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        Self::prepare(Connection::open(path)?)
    }

    /// Throwaway database that lives as long as the value.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::prepare(Connection::open_in_memory()?)
    }

    fn prepare(conn: Connection) -> Result<Self, rusqlite::Error> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        migrations::run_all(&conn)?;
        Ok(Self { conn })
    }

    pub fn schema_version(&self) -> i32 {
        migrations::get_schema_version(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Starts a transaction; tag reordering rewrites every position inside one.
    pub fn transaction(&mut self) -> Result<Transaction<'_>, rusqlite::Error> {
        self.conn.transaction()
    }
}
