//! Local backend persisting the collections in SQLite via `rusqlite`.
//!
//! Bookmarks are returned newest-insert first, folders and tags by position.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use super::backend::{Backend, BackendResult};
use super::memory_backend::local_user;
use crate::database::Database;
use crate::types::api::{
    ApiResponse, BookmarkPatch, BookmarkQueryParams, FolderPatch, LoginRequest, LoginResponse,
};
use crate::types::bookmark::{Bookmark, Folder, Tag};
use crate::types::errors::BackendError;

const BOOKMARK_COLUMNS: &str = "id, title, url, description, folder_id, tags, created_at, \
     created_at_timestamp, favicon, visit_count, last_visited, content";

/// Backend backed by a single SQLite connection.
pub struct SqliteBackend {
    db: Mutex<Database>,
}

impl SqliteBackend {
    /// Opens the database at `path`, creating parent directories as needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BackendError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| BackendError::Database(format!("Failed to create data directory: {}", e)))?;
            }
        }
        Ok(Self::from_database(Database::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self, BackendError> {
        Ok(Self::from_database(Database::open_in_memory()?))
    }

    pub fn from_database(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    fn db(&self) -> MutexGuard<'_, Database> {
        self.db.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn row_to_bookmark(row: &rusqlite::Row) -> rusqlite::Result<Bookmark> {
        let tags_json: String = row.get(5)?;
        let tags: Vec<String> = serde_json::from_str(&tags_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;
        Ok(Bookmark {
            id: row.get(0)?,
            title: row.get(1)?,
            url: row.get(2)?,
            description: row.get(3)?,
            folder_id: row.get(4)?,
            tags,
            created_at: row.get(6)?,
            created_at_timestamp: row.get(7)?,
            favicon: row.get(8)?,
            visit_count: row.get(9)?,
            last_visited: row.get(10)?,
            content: row.get(11)?,
        })
    }

    fn row_to_folder(row: &rusqlite::Row) -> rusqlite::Result<Folder> {
        Ok(Folder {
            id: row.get(0)?,
            name: row.get(1)?,
            icon: row.get(2)?,
            color: row.get(3)?,
            parent_id: row.get(4)?,
        })
    }

    fn row_to_tag(row: &rusqlite::Row) -> rusqlite::Result<Tag> {
        Ok(Tag {
            id: row.get(0)?,
            name: row.get(1)?,
            color: row.get(2)?,
        })
    }

    fn find_bookmark(db: &Database, id: &str) -> Result<Option<Bookmark>, BackendError> {
        let sql = format!("SELECT {} FROM bookmarks WHERE id = ?1", BOOKMARK_COLUMNS);
        Ok(db
            .connection()
            .query_row(&sql, params![id], Self::row_to_bookmark)
            .optional()?)
    }

    fn find_folder(db: &Database, id: &str) -> Result<Option<Folder>, BackendError> {
        Ok(db
            .connection()
            .query_row(
                "SELECT id, name, icon, color, parent_id FROM folders WHERE id = ?1",
                params![id],
                Self::row_to_folder,
            )
            .optional()?)
    }

    fn next_position(db: &Database, table: &str) -> Result<i64, BackendError> {
        let sql = format!("SELECT COALESCE(MAX(position), -1) + 1 FROM {}", table);
        Ok(db.connection().query_row(&sql, [], |row| row.get(0))?)
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    async fn login(&self, request: &LoginRequest) -> BackendResult<LoginResponse> {
        if request.email.trim().is_empty() || request.password.is_empty() {
            return Ok(ApiResponse::failed(Some("Email and password are required")));
        }
        Ok(ApiResponse::ok(LoginResponse {
            token: Uuid::new_v4().to_string(),
            user: local_user(&request.email),
        }))
    }

    async fn logout(&self) -> BackendResult<()> {
        Ok(ApiResponse::done())
    }

    async fn get_bookmarks(&self, _params: Option<&BookmarkQueryParams>) -> BackendResult<Vec<Bookmark>> {
        let db = self.db();
        let sql = format!("SELECT {} FROM bookmarks ORDER BY seq DESC", BOOKMARK_COLUMNS);
        let mut stmt = db.connection().prepare(&sql)?;
        let rows = stmt.query_map([], Self::row_to_bookmark)?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(ApiResponse::ok(results))
    }

    async fn create_bookmark(&self, bookmark: &Bookmark) -> BackendResult<Bookmark> {
        let db = self.db();
        let tags = serde_json::to_string(&bookmark.tags)?;
        let seq: i64 = db
            .connection()
            .query_row("SELECT COALESCE(MAX(seq), 0) + 1 FROM bookmarks", [], |row| row.get(0))?;
        db.connection().execute(
            "INSERT INTO bookmarks (id, title, url, description, folder_id, tags, created_at, \
             created_at_timestamp, favicon, visit_count, last_visited, content, seq) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                bookmark.id,
                bookmark.title,
                bookmark.url,
                bookmark.description,
                bookmark.folder_id,
                tags,
                bookmark.created_at,
                bookmark.created_at_timestamp,
                bookmark.favicon,
                bookmark.visit_count,
                bookmark.last_visited,
                bookmark.content,
                seq
            ],
        )?;
        Ok(ApiResponse::ok(bookmark.clone()))
    }

    async fn update_bookmark(&self, id: &str, patch: &BookmarkPatch) -> BackendResult<Bookmark> {
        let db = self.db();
        let Some(mut bookmark) = Self::find_bookmark(&db, id)? else {
            return Ok(ApiResponse::failed(Some("Not found")));
        };
        patch.apply_to(&mut bookmark);
        let tags = serde_json::to_string(&bookmark.tags)?;
        db.connection().execute(
            "UPDATE bookmarks SET title = ?1, url = ?2, description = ?3, folder_id = ?4, \
             tags = ?5, content = ?6 WHERE id = ?7",
            params![
                bookmark.title,
                bookmark.url,
                bookmark.description,
                bookmark.folder_id,
                tags,
                bookmark.content,
                id
            ],
        )?;
        Ok(ApiResponse::ok(bookmark))
    }

    async fn delete_bookmark(&self, id: &str) -> BackendResult<String> {
        self.db()
            .connection()
            .execute("DELETE FROM bookmarks WHERE id = ?1", params![id])?;
        Ok(ApiResponse::ok(id.to_string()))
    }

    async fn increment_visit(&self, id: &str) -> BackendResult<()> {
        let now = Utc::now().timestamp_millis();
        self.db().connection().execute(
            "UPDATE bookmarks SET visit_count = visit_count + 1, last_visited = ?1 WHERE id = ?2",
            params![now, id],
        )?;
        Ok(ApiResponse::done())
    }

    async fn get_folders(&self) -> BackendResult<Vec<Folder>> {
        let db = self.db();
        let mut stmt = db.connection().prepare(
            "SELECT id, name, icon, color, parent_id FROM folders ORDER BY position, rowid",
        )?;
        let rows = stmt.query_map([], Self::row_to_folder)?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(ApiResponse::ok(results))
    }

    async fn create_folder(&self, folder: &Folder) -> BackendResult<Folder> {
        let db = self.db();
        let position = Self::next_position(&db, "folders")?;
        db.connection().execute(
            "INSERT INTO folders (id, name, icon, color, parent_id, position) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![folder.id, folder.name, folder.icon, folder.color, folder.parent_id, position],
        )?;
        Ok(ApiResponse::ok(folder.clone()))
    }

    async fn update_folder(&self, id: &str, patch: &FolderPatch) -> BackendResult<Folder> {
        let db = self.db();
        let Some(mut folder) = Self::find_folder(&db, id)? else {
            return Ok(ApiResponse::failed(Some("Not found")));
        };
        patch.apply_to(&mut folder);
        db.connection().execute(
            "UPDATE folders SET name = ?1, icon = ?2, color = ?3 WHERE id = ?4",
            params![folder.name, folder.icon, folder.color, id],
        )?;
        Ok(ApiResponse::ok(folder))
    }

    async fn move_folder(&self, id: &str, new_parent_id: &str) -> BackendResult<()> {
        let affected = self.db().connection().execute(
            "UPDATE folders SET parent_id = ?1 WHERE id = ?2",
            params![new_parent_id, id],
        )?;
        if affected == 0 {
            return Ok(ApiResponse::failed(Some("Not found")));
        }
        Ok(ApiResponse::done())
    }

    async fn get_tags(&self) -> BackendResult<Vec<Tag>> {
        let db = self.db();
        let mut stmt = db
            .connection()
            .prepare("SELECT id, name, color FROM tags ORDER BY position, rowid")?;
        let rows = stmt.query_map([], Self::row_to_tag)?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(ApiResponse::ok(results))
    }

    async fn create_tag(&self, tag: &Tag) -> BackendResult<Tag> {
        let db = self.db();
        let position = Self::next_position(&db, "tags")?;
        db.connection().execute(
            "INSERT INTO tags (id, name, color, position) VALUES (?1, ?2, ?3, ?4)",
            params![tag.id, tag.name, tag.color, position],
        )?;
        Ok(ApiResponse::ok(tag.clone()))
    }

    async fn reorder_tags(&self, tags: &[Tag]) -> BackendResult<()> {
        let mut db = self.db();
        let tx = db.transaction()?;
        tx.execute("DELETE FROM tags", [])?;
        for (position, tag) in tags.iter().enumerate() {
            tx.execute(
                "INSERT INTO tags (id, name, color, position) VALUES (?1, ?2, ?3, ?4)",
                params![tag.id, tag.name, tag.color, position as i64],
            )?;
        }
        tx.commit()?;
        Ok(ApiResponse::done())
    }
}
