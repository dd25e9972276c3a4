//! Backend collaborator contract.
//!
//! Every call resolves to the uniform `ApiResponse` envelope. A transport
//! failure surfaces as `Err(BackendError)`; a refused operation surfaces as
//! `Ok` with `success == false`. The organizer treats both the same way.

use async_trait::async_trait;
use tracing::warn;

use crate::types::api::{
    ApiResponse, BookmarkPatch, BookmarkQueryParams, FolderPatch, LoginRequest, LoginResponse,
};
use crate::types::bookmark::{Bookmark, Folder, Tag};
use crate::types::errors::{BackendError, OrganizerError};

pub type BackendResult<T> = Result<ApiResponse<T>, BackendError>;

/// Persistence/service layer consumed by the organizer.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> BackendResult<LoginResponse>;
    async fn logout(&self) -> BackendResult<()>;

    async fn get_bookmarks(&self, params: Option<&BookmarkQueryParams>) -> BackendResult<Vec<Bookmark>>;
    async fn create_bookmark(&self, bookmark: &Bookmark) -> BackendResult<Bookmark>;
    async fn update_bookmark(&self, id: &str, patch: &BookmarkPatch) -> BackendResult<Bookmark>;
    async fn delete_bookmark(&self, id: &str) -> BackendResult<String>;
    async fn increment_visit(&self, id: &str) -> BackendResult<()>;

    async fn get_folders(&self) -> BackendResult<Vec<Folder>>;
    async fn create_folder(&self, folder: &Folder) -> BackendResult<Folder>;
    async fn update_folder(&self, id: &str, patch: &FolderPatch) -> BackendResult<Folder>;
    async fn move_folder(&self, id: &str, new_parent_id: &str) -> BackendResult<()>;

    async fn get_tags(&self) -> BackendResult<Vec<Tag>>;
    async fn create_tag(&self, tag: &Tag) -> BackendResult<Tag>;
    /// Replaces the whole ordered tag collection.
    async fn reorder_tags(&self, tags: &[Tag]) -> BackendResult<()>;
}

/// Collapses a backend result into the confirmed payload, logging any failure.
///
/// `Ok(None)` means the backend confirmed without sending data.
pub fn confirm<T>(op: &str, result: BackendResult<T>) -> Result<Option<T>, OrganizerError> {
    match result {
        Ok(response) if response.success => Ok(response.data),
        Ok(response) => {
            warn!(op, message = ?response.message, "backend rejected operation");
            Err(OrganizerError::Rejected(response.message))
        }
        Err(err) => {
            warn!(op, error = %err, "backend call failed");
            Err(OrganizerError::from(err))
        }
    }
}

/// Like [`confirm`] but requires a payload.
pub fn confirm_data<T>(op: &str, result: BackendResult<T>) -> Result<T, OrganizerError> {
    confirm(op, result)?.ok_or_else(|| OrganizerError::MissingData(op.to_string()))
}
