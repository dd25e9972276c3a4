//! Markshelf database layer: the SQLite connection and its versioned schema.
//!
//! ```no_run
//! use markshelf::database::Database;
//!
//! let db = Database::open("markshelf.db").expect("failed to open database");
//! assert_eq!(db.schema_version(), markshelf::database::migrations::CURRENT_SCHEMA_VERSION);
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
