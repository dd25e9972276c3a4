//! In-memory backend.
//!
//! Behaves like a remote service holding its own copy of the collections.
//! Failures and latency can be injected per operation so the organizer's
//! consistency rules can be exercised deterministically.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use super::backend::{Backend, BackendResult};
use crate::types::api::{
    ApiResponse, BookmarkPatch, BookmarkQueryParams, FolderPatch, LoginRequest, LoginResponse, User,
};
use crate::types::bookmark::{Bookmark, Folder, Tag, ROOT_FOLDER_ID};
use crate::types::errors::BackendError;

/// Names each backend call, for fault injection and call accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    Logout,
    GetBookmarks,
    CreateBookmark,
    UpdateBookmark,
    DeleteBookmark,
    IncrementVisit,
    GetFolders,
    CreateFolder,
    UpdateFolder,
    MoveFolder,
    GetTags,
    CreateTag,
    ReorderTags,
}

#[derive(Debug, Clone, Copy)]
enum Fault {
    Reject,
    Transport,
}

#[derive(Debug, Default, Clone)]
struct MockDb {
    folders: Vec<Folder>,
    tags: Vec<Tag>,
    bookmarks: Vec<Bookmark>,
}

pub struct MemoryBackend {
    db: Mutex<MockDb>,
    faults: Mutex<HashMap<Operation, Vec<Fault>>>,
    calls: Mutex<Vec<Operation>>,
    latency: Duration,
}

impl MemoryBackend {
    /// Empty backend holding only the root folder.
    pub fn new() -> Self {
        Self::from_parts(vec![root_folder()], Vec::new(), Vec::new())
    }

    pub fn from_parts(folders: Vec<Folder>, tags: Vec<Tag>, bookmarks: Vec<Bookmark>) -> Self {
        Self {
            db: Mutex::new(MockDb {
                folders,
                tags,
                bookmarks,
            }),
            faults: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            latency: Duration::ZERO,
        }
    }

    /// Backend pre-filled with a small demo library.
    pub fn seeded() -> Self {
        let (folders, tags, bookmarks) = demo_library(Utc::now().timestamp_millis());
        Self::from_parts(folders, tags, bookmarks)
    }

    /// Delays every call by `latency` before it takes effect.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// The next `times` calls of `op` answer `success: false`.
    pub fn fail_next(&self, op: Operation, times: usize) {
        self.push_faults(op, Fault::Reject, times);
    }

    /// The next `times` calls of `op` fail at the transport level.
    pub fn break_transport(&self, op: Operation, times: usize) {
        self.push_faults(op, Fault::Transport, times);
    }

    pub fn calls(&self) -> Vec<Operation> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self, op: Operation) -> usize {
        lock(&self.calls).iter().filter(|c| **c == op).count()
    }

    pub fn folders(&self) -> Vec<Folder> {
        lock(&self.db).folders.clone()
    }

    pub fn tags(&self) -> Vec<Tag> {
        lock(&self.db).tags.clone()
    }

    pub fn bookmarks(&self) -> Vec<Bookmark> {
        lock(&self.db).bookmarks.clone()
    }

    fn push_faults(&self, op: Operation, fault: Fault, times: usize) {
        let mut faults = lock(&self.faults);
        let queue = faults.entry(op).or_default();
        queue.extend(std::iter::repeat(fault).take(times));
    }

    /// Records the call, waits out the latency and pops any pending fault.
    async fn enter(&self, op: Operation) -> Result<Option<Fault>, BackendError> {
        lock(&self.calls).push(op);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let fault = {
            let mut faults = lock(&self.faults);
            faults
                .get_mut(&op)
                .filter(|q| !q.is_empty())
                .map(|q| q.remove(0))
        };
        match fault {
            Some(Fault::Transport) => {
                debug!(?op, "injected transport failure");
                Err(BackendError::Network(format!("{:?} unreachable", op)))
            }
            other => Ok(other),
        }
    }

    async fn run<T>(&self, op: Operation, f: impl FnOnce(&mut MockDb) -> ApiResponse<T>) -> BackendResult<T> {
        if let Some(Fault::Reject) = self.enter(op).await? {
            debug!(?op, "injected rejection");
            return Ok(ApiResponse::failed(None));
        }
        let mut db = lock(&self.db);
        Ok(f(&mut *db))
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn login(&self, request: &LoginRequest) -> BackendResult<LoginResponse> {
        let email = request.email.clone();
        let has_password = !request.password.is_empty();
        self.run(Operation::Login, move |_| {
            if email.trim().is_empty() || !has_password {
                return ApiResponse::failed(Some("Email and password are required"));
            }
            ApiResponse::ok(LoginResponse {
                token: Uuid::new_v4().to_string(),
                user: local_user(&email),
            })
        })
        .await
    }

    async fn logout(&self) -> BackendResult<()> {
        self.run(Operation::Logout, |_| ApiResponse::done()).await
    }

    async fn get_bookmarks(&self, _params: Option<&BookmarkQueryParams>) -> BackendResult<Vec<Bookmark>> {
        // Filtering happens client-side; the full collection is returned.
        self.run(Operation::GetBookmarks, |db| ApiResponse::ok(db.bookmarks.clone()))
            .await
    }

    async fn create_bookmark(&self, bookmark: &Bookmark) -> BackendResult<Bookmark> {
        let bookmark = bookmark.clone();
        self.run(Operation::CreateBookmark, move |db| {
            db.bookmarks.insert(0, bookmark.clone());
            ApiResponse::ok(bookmark)
        })
        .await
    }

    async fn update_bookmark(&self, id: &str, patch: &BookmarkPatch) -> BackendResult<Bookmark> {
        self.run(Operation::UpdateBookmark, |db| {
            match db.bookmarks.iter_mut().find(|b| b.id == id) {
                Some(b) => {
                    patch.apply_to(b);
                    ApiResponse::ok(b.clone())
                }
                None => ApiResponse::failed(Some("Not found")),
            }
        })
        .await
    }

    async fn delete_bookmark(&self, id: &str) -> BackendResult<String> {
        self.run(Operation::DeleteBookmark, |db| {
            db.bookmarks.retain(|b| b.id != id);
            ApiResponse::ok(id.to_string())
        })
        .await
    }

    async fn increment_visit(&self, id: &str) -> BackendResult<()> {
        self.run(Operation::IncrementVisit, |db| {
            if let Some(b) = db.bookmarks.iter_mut().find(|b| b.id == id) {
                b.visit_count += 1;
                b.last_visited = Utc::now().timestamp_millis();
            }
            ApiResponse::done()
        })
        .await
    }

    async fn get_folders(&self) -> BackendResult<Vec<Folder>> {
        self.run(Operation::GetFolders, |db| ApiResponse::ok(db.folders.clone()))
            .await
    }

    async fn create_folder(&self, folder: &Folder) -> BackendResult<Folder> {
        let folder = folder.clone();
        self.run(Operation::CreateFolder, move |db| {
            db.folders.push(folder.clone());
            ApiResponse::ok(folder)
        })
        .await
    }

    async fn update_folder(&self, id: &str, patch: &FolderPatch) -> BackendResult<Folder> {
        self.run(Operation::UpdateFolder, |db| {
            match db.folders.iter_mut().find(|f| f.id == id) {
                Some(f) => {
                    patch.apply_to(f);
                    ApiResponse::ok(f.clone())
                }
                None => ApiResponse::failed(None),
            }
        })
        .await
    }

    async fn move_folder(&self, id: &str, new_parent_id: &str) -> BackendResult<()> {
        self.run(Operation::MoveFolder, |db| {
            if let Some(f) = db.folders.iter_mut().find(|f| f.id == id) {
                f.parent_id = Some(new_parent_id.to_string());
            }
            ApiResponse::done()
        })
        .await
    }

    async fn get_tags(&self) -> BackendResult<Vec<Tag>> {
        self.run(Operation::GetTags, |db| ApiResponse::ok(db.tags.clone()))
            .await
    }

    async fn create_tag(&self, tag: &Tag) -> BackendResult<Tag> {
        let tag = tag.clone();
        self.run(Operation::CreateTag, move |db| {
            db.tags.push(tag.clone());
            ApiResponse::ok(tag)
        })
        .await
    }

    async fn reorder_tags(&self, tags: &[Tag]) -> BackendResult<()> {
        let tags = tags.to_vec();
        self.run(Operation::ReorderTags, move |db| {
            db.tags = tags;
            ApiResponse::done()
        })
        .await
    }
}

/// Single-user identity derived from an email address.
pub fn local_user(email: &str) -> User {
    let name = email.split('@').next().unwrap_or(email).to_string();
    let avatar: String = name.chars().take(2).collect::<String>().to_uppercase();
    User {
        id: "u1".to_string(),
        name,
        email: email.to_string(),
        avatar,
    }
}

pub fn root_folder() -> Folder {
    Folder {
        id: ROOT_FOLDER_ID.to_string(),
        name: "My Bookmarks".to_string(),
        icon: "folder_open".to_string(),
        color: None,
        parent_id: None,
    }
}

/// Demo folders, tags and bookmarks relative to `now_ms`.
pub fn demo_library(now_ms: i64) -> (Vec<Folder>, Vec<Tag>, Vec<Bookmark>) {
    const HOUR: i64 = 60 * 60 * 1000;
    const DAY: i64 = 24 * HOUR;

    let folder = |id: &str, name: &str, icon: &str| Folder {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        color: None,
        parent_id: Some(ROOT_FOLDER_ID.to_string()),
    };
    let folders = vec![
        root_folder(),
        folder("work", "Work Projects", "work"),
        folder("tech", "Tech Docs", "code"),
        folder("reading", "Reading List", "menu_book"),
        folder("course", "Online Courses", "school"),
    ];

    let tags = [
        ("1", "Dev", "blue"),
        ("2", "Design", "purple"),
        ("3", "CSS", "cyan"),
        ("4", "JavaScript", "amber"),
        ("5", "TS", "blue"),
        ("6", "Tools", "slate"),
        ("7", "Resources", "green"),
        ("8", "UI Kits", "pink"),
        ("9", "To Read", "indigo"),
        ("10", "Productivity", "orange"),
    ]
    .iter()
    .map(|(id, name, color)| Tag {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
    })
    .collect();

    let bookmark = |id: &str,
                    title: &str,
                    url: &str,
                    folder_id: &str,
                    tags: &[&str],
                    created_at: &str,
                    age: i64,
                    visits: u32,
                    last_visit_age: i64| Bookmark {
        id: id.to_string(),
        title: title.to_string(),
        url: url.to_string(),
        description: String::new(),
        folder_id: folder_id.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        created_at: created_at.to_string(),
        created_at_timestamp: now_ms - age,
        favicon: None,
        visit_count: visits,
        last_visited: now_ms - last_visit_age,
        content: None,
    };
    let bookmarks = vec![
        bookmark("b1", "Tailwind CSS Documentation", "https://tailwindcss.com", "tech", &["Dev", "CSS"], "2 hours ago", 2 * HOUR, 15, 10_000),
        bookmark("b2", "React Documentation", "https://react.dev", "tech", &["Dev", "JavaScript"], "yesterday", DAY, 42, 5_000),
        bookmark("b3", "Coolors.co", "https://coolors.co", "reading", &["Design", "Tools"], "3 days ago", 3 * DAY, 5, 5 * DAY),
        bookmark("b4", "A Complete Guide to Flexbox", "https://css-tricks.com/snippets/css/a-guide-to-flexbox/", "tech", &["Dev", "CSS"], "1 week ago", 7 * DAY, 8, 2 * DAY),
        bookmark("b5", "TypeScript Handbook", "https://www.typescriptlang.org/docs/handbook/intro.html", "tech", &["Dev", "TS"], "2 weeks ago", 14 * DAY, 20, DAY),
        bookmark("b6", "Figma", "https://figma.com", "reading", &["Design", "Resources"], "1 month ago", 30 * DAY, 3, 20 * DAY),
    ];

    (folders, tags, bookmarks)
}
