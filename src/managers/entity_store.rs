//! Canonical in-memory collections: folders, tags and bookmarks.
//!
//! Everything outside the crate reads the store; only the organizer and its
//! mutation commands write to it.

use crate::types::api::{BookmarkPatch, FolderPatch};
use crate::types::bookmark::{Bookmark, Folder, Tag};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityStore {
    folders: Vec<Folder>,
    tags: Vec<Tag>,
    bookmarks: Vec<Bookmark>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(folders: Vec<Folder>, tags: Vec<Tag>, bookmarks: Vec<Bookmark>) -> Self {
        Self {
            folders,
            tags,
            bookmarks,
        }
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn bookmark(&self, id: &str) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| b.id == id)
    }

    pub fn tag_position(&self, id: &str) -> Option<usize> {
        self.tags.iter().position(|t| t.id == id)
    }

    pub fn has_tag_named(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.tags.is_empty() && self.bookmarks.is_empty()
    }

    pub(crate) fn replace_folders(&mut self, folders: Vec<Folder>) {
        self.folders = folders;
    }

    pub(crate) fn replace_tags(&mut self, tags: Vec<Tag>) {
        self.tags = tags;
    }

    pub(crate) fn replace_bookmarks(&mut self, bookmarks: Vec<Bookmark>) {
        self.bookmarks = bookmarks;
    }

    pub(crate) fn push_folder(&mut self, folder: Folder) {
        self.folders.push(folder);
    }

    pub(crate) fn push_tags(&mut self, tags: impl IntoIterator<Item = Tag>) {
        self.tags.extend(tags);
    }

    pub(crate) fn prepend_bookmark(&mut self, bookmark: Bookmark) {
        self.bookmarks.insert(0, bookmark);
    }

    pub(crate) fn remove_bookmark(&mut self, id: &str) {
        self.bookmarks.retain(|b| b.id != id);
    }

    pub(crate) fn patch_bookmark(&mut self, id: &str, patch: &BookmarkPatch) {
        if let Some(b) = self.bookmarks.iter_mut().find(|b| b.id == id) {
            patch.apply_to(b);
        }
    }

    pub(crate) fn patch_folder(&mut self, id: &str, patch: &FolderPatch) {
        if let Some(f) = self.folders.iter_mut().find(|f| f.id == id) {
            patch.apply_to(f);
        }
    }

    pub(crate) fn set_folder_parent(&mut self, id: &str, parent_id: &str) {
        if let Some(f) = self.folders.iter_mut().find(|f| f.id == id) {
            f.parent_id = Some(parent_id.to_string());
        }
    }

    /// Increments the visit counter and stamps the visit time.
    pub(crate) fn record_visit(&mut self, id: &str, at_ms: i64) -> Option<&Bookmark> {
        let b = self.bookmarks.iter_mut().find(|b| b.id == id)?;
        b.visit_count = b.visit_count.saturating_add(1);
        b.last_visited = at_ms;
        Some(b)
    }

    pub(crate) fn clear(&mut self) {
        self.folders.clear();
        self.tags.clear();
        self.bookmarks.clear();
    }
}
