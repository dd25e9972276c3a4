//! Organizer: the single controller owning the entity store and view state.
//!
//! Reads go through accessor methods that return owned copies. Writes happen
//! only through the mutation operations below, each following one of three
//! consistency strategies:
//!
//! - confirm-then-apply: create/delete/update bookmark, folder create/rename/move,
//!   tag create. The store changes only after the backend confirms.
//! - optimistic with rollback: tag reorder. Tag creates and reorders run
//!   one at a time, so a reorder never sends or restores a stale list.
//! - optimistic without rollback: bookmark visit. The backend is notified in a
//!   detached task.
//!
//! Logout bumps a session epoch. Any confirmation that arrives for an older
//! epoch is discarded with [`OrganizerError::SessionExpired`].

use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Datelike, Local, TimeZone, Utc};
use futures::future::join_all;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::managers::entity_store::EntityStore;
use crate::managers::folder_tree;
use crate::managers::mutation::{OptimisticCommand, RecordVisit, ReorderTags};
use crate::managers::view_state::ViewState;
use crate::services::backend::{confirm, confirm_data, Backend};
use crate::services::facet_counter;
use crate::services::filter_pipeline;
use crate::services::tag_palette::TagPalette;
use crate::types::api::{BookmarkPatch, FolderPatch, LoginRequest, User};
use crate::types::bookmark::{
    Bookmark, Counted, Folder, NewBookmark, NewFolder, NewTag, Tag, ROOT_FOLDER_ID,
};
use crate::types::errors::OrganizerError;
use crate::types::filter::{DateRange, FilterCriteria, SortOption, SortOrder};

#[derive(Debug, Default)]
struct State {
    store: EntityStore,
    view: ViewState,
    epoch: u64,
    user: Option<User>,
    loading: bool,
}

pub struct Organizer {
    backend: Arc<dyn Backend>,
    state: Mutex<State>,
    /// Serializes writes to the tag collection: creates and reorders.
    tag_slot: tokio::sync::Mutex<()>,
    palette: TagPalette,
}

impl Organizer {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self::with_sort(backend, SortOption::default(), SortOrder::default())
    }

    pub fn with_sort(backend: Arc<dyn Backend>, option: SortOption, order: SortOrder) -> Self {
        Self {
            backend,
            state: Mutex::new(State {
                view: ViewState::new(option, order),
                ..State::default()
            }),
            tag_slot: tokio::sync::Mutex::new(()),
            palette: TagPalette::new(),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn epoch(&self) -> u64 {
        self.state().epoch
    }

    /// Runs `f` against the state only if the session has not changed since `epoch`.
    fn commit<R>(&self, epoch: u64, op: &str, f: impl FnOnce(&mut State) -> R) -> Result<R, OrganizerError> {
        let mut state = self.state();
        if state.epoch != epoch {
            debug!(op, "discarding response from an ended session");
            return Err(OrganizerError::SessionExpired);
        }
        Ok(f(&mut state))
    }

    fn now_ms() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ─── Session ───

    /// Authenticates and starts a fresh session. The backend's message is surfaced on failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, OrganizerError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = confirm_data("auth.login", self.backend.login(&request).await)?;
        let mut state = self.state();
        state.epoch += 1;
        state.store.clear();
        state.view.reset();
        state.loading = false;
        state.user = Some(response.user.clone());
        info!(user = %response.user.id, "session started");
        Ok(response.user)
    }

    /// Ends the session locally right away, then tells the backend.
    pub async fn logout(&self) {
        {
            let mut state = self.state();
            state.epoch += 1;
            state.store.clear();
            state.view.reset();
            state.user = None;
            state.loading = false;
        }
        if let Err(err) = confirm("auth.logout", self.backend.logout().await) {
            warn!(error = %err, "logout was not acknowledged");
        }
    }

    pub fn current_user(&self) -> Option<User> {
        self.state().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    /// Fetches folders, tags and bookmarks concurrently.
    ///
    /// Each collection that loads replaces its local copy; the others are left
    /// untouched. The first failure is returned after all three settle.
    pub async fn load_all(&self) -> Result<(), OrganizerError> {
        let epoch = {
            let mut state = self.state();
            state.loading = true;
            state.epoch
        };

        let (folders, tags, bookmarks) = futures::join!(
            self.backend.get_folders(),
            self.backend.get_tags(),
            self.backend.get_bookmarks(None),
        );
        let folders = confirm_data("folders.getAll", folders);
        let tags = confirm_data("tags.getAll", tags);
        let bookmarks = confirm_data("bookmarks.getAll", bookmarks);

        let mut first_error = None;
        let applied = self.commit(epoch, "load_all", |state| {
            match folders {
                Ok(f) => state.store.replace_folders(f),
                Err(e) => first_error = first_error.take().or(Some(e)),
            }
            match tags {
                Ok(t) => state.store.replace_tags(t),
                Err(e) => first_error = first_error.take().or(Some(e)),
            }
            match bookmarks {
                Ok(b) => state.store.replace_bookmarks(b),
                Err(e) => first_error = first_error.take().or(Some(e)),
            }
            state.loading = false;
        });
        applied?;

        match first_error {
            Some(err) => Err(err),
            None => {
                debug!("initial load complete");
                Ok(())
            }
        }
    }

    // ─── Bookmarks ───

    /// Creates any missing tags, then the bookmark itself.
    ///
    /// Unknown tag names become new tags with a random palette colour. Tag
    /// creation failures are logged and skipped; the bookmark is still created.
    pub async fn create_bookmark(&self, draft: NewBookmark) -> Result<Bookmark, OrganizerError> {
        if draft.url.trim().is_empty() || draft.title.trim().is_empty() {
            return Err(OrganizerError::InvalidInput("url and title are required".to_string()));
        }

        let (epoch, folder_id) = {
            let state = self.state();
            let folder_id = state
                .view
                .default_folder(draft.folder_id.as_deref())
                .or_else(|| folder_tree::root_folders(state.store.folders()).first().map(|f| f.id.clone()))
                .unwrap_or_else(|| ROOT_FOLDER_ID.to_string());
            (state.epoch, folder_id)
        };

        if !draft.tags.is_empty() {
            let _slot = self.tag_slot.lock().await;
            let missing: Vec<String> = {
                let state = self.state();
                let mut seen = HashSet::new();
                draft
                    .tags
                    .iter()
                    .filter(|name| !state.store.has_tag_named(name) && seen.insert(name.as_str()))
                    .cloned()
                    .collect()
            };
            if !missing.is_empty() {
                let new_tags: Vec<Tag> = missing
                    .into_iter()
                    .map(|name| Tag {
                        id: Uuid::new_v4().to_string(),
                        name,
                        color: self.palette.random_color().to_string(),
                    })
                    .collect();
                let results = join_all(new_tags.iter().map(|t| self.backend.create_tag(t))).await;
                let created: Vec<Tag> = results
                    .into_iter()
                    .filter_map(|r| confirm_data("tags.create", r).ok())
                    .collect();
                info!(count = created.len(), "created tags for new bookmark");
                self.commit(epoch, "tags.create", |state| state.store.push_tags(created))?;
            }
        }

        let bookmark = draft.into_bookmark(Uuid::new_v4().to_string(), folder_id, Self::now_ms());
        let echoed = confirm("bookmarks.create", self.backend.create_bookmark(&bookmark).await)?;
        let saved = echoed.unwrap_or(bookmark);
        self.commit(epoch, "bookmarks.create", |state| {
            state.store.prepend_bookmark(saved.clone())
        })?;
        Ok(saved)
    }

    pub async fn delete_bookmark(&self, id: &str) -> Result<(), OrganizerError> {
        let epoch = self.epoch();
        confirm("bookmarks.delete", self.backend.delete_bookmark(id).await)?;
        self.commit(epoch, "bookmarks.delete", |state| state.store.remove_bookmark(id))
    }

    /// Applies `patch` locally once the backend accepts it.
    pub async fn update_bookmark(&self, id: &str, patch: BookmarkPatch) -> Result<Bookmark, OrganizerError> {
        let epoch = {
            let state = self.state();
            if state.store.bookmark(id).is_none() {
                return Err(OrganizerError::NotFound(id.to_string()));
            }
            state.epoch
        };
        confirm("bookmarks.update", self.backend.update_bookmark(id, &patch).await)?;
        self.commit(epoch, "bookmarks.update", |state| {
            state.store.patch_bookmark(id, &patch);
            state.store.bookmark(id).cloned()
        })?
        .ok_or_else(|| OrganizerError::NotFound(id.to_string()))
    }

    /// Saves the markdown note attached to a bookmark.
    pub async fn update_bookmark_content(&self, id: &str, content: &str) -> Result<Bookmark, OrganizerError> {
        self.update_bookmark(id, BookmarkPatch::content(content)).await
    }

    /// Counts a visit immediately; the backend is notified without waiting.
    pub async fn visit_bookmark(&self, id: &str) -> Result<Bookmark, OrganizerError> {
        let command = RecordVisit {
            bookmark_id: id.to_string(),
            at_ms: Self::now_ms(),
        };
        let visited = {
            let mut state = self.state();
            command.snapshot(&state.store);
            command.apply(&mut state.store)?
        };

        let backend = Arc::clone(&self.backend);
        let id = id.to_string();
        tokio::spawn(async move {
            if let Err(err) = confirm("bookmarks.incrementVisit", backend.increment_visit(&id).await) {
                debug!(bookmark = %id, error = %err, "visit not recorded remotely");
            }
        });
        Ok(visited)
    }

    // ─── Folders ───

    /// Creates a folder under `parent_id`, or under the root when none is given.
    pub async fn create_folder(&self, draft: NewFolder, parent_id: Option<&str>) -> Result<Folder, OrganizerError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(OrganizerError::InvalidInput("folder name is required".to_string()));
        }
        let parent = parent_id.unwrap_or(ROOT_FOLDER_ID);
        let epoch = {
            let state = self.state();
            if parent != ROOT_FOLDER_ID && state.store.folder(parent).is_none() {
                return Err(OrganizerError::NotFound(parent.to_string()));
            }
            state.epoch
        };

        let folder = Folder {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            icon: draft.icon,
            color: draft.color,
            parent_id: Some(parent.to_string()),
        };
        let saved = confirm("folders.create", self.backend.create_folder(&folder).await)?.unwrap_or(folder);
        self.commit(epoch, "folders.create", |state| state.store.push_folder(saved.clone()))?;
        Ok(saved)
    }

    pub async fn rename_folder(&self, id: &str, new_name: &str) -> Result<(), OrganizerError> {
        if id == ROOT_FOLDER_ID {
            return Err(OrganizerError::RootFolderImmutable);
        }
        let name = new_name.trim();
        if name.is_empty() {
            return Err(OrganizerError::InvalidInput("folder name is required".to_string()));
        }
        let epoch = {
            let state = self.state();
            if state.store.folder(id).is_none() {
                return Err(OrganizerError::NotFound(id.to_string()));
            }
            state.epoch
        };
        let patch = FolderPatch::rename(name);
        confirm("folders.update", self.backend.update_folder(id, &patch).await)?;
        self.commit(epoch, "folders.update", |state| state.store.patch_folder(id, &patch))
    }

    /// Re-parents `dragged_id` under `target_id`.
    ///
    /// Invalid moves are rejected before the backend is contacted; the tree
    /// changes only once the backend confirms.
    pub async fn move_folder(&self, dragged_id: &str, target_id: &str) -> Result<(), OrganizerError> {
        let epoch = {
            let state = self.state();
            if let Err(err) = folder_tree::validate_move(state.store.folders(), dragged_id, target_id) {
                info!(dragged = dragged_id, target = target_id, error = %err, "folder move rejected");
                return Err(err);
            }
            state.epoch
        };
        confirm("folders.move", self.backend.move_folder(dragged_id, target_id).await)?;
        self.commit(epoch, "folders.move", |state| {
            state.store.set_folder_parent(dragged_id, target_id)
        })
    }

    // ─── Tags ───

    pub async fn create_tag(&self, draft: NewTag) -> Result<Tag, OrganizerError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(OrganizerError::InvalidInput("tag name is required".to_string()));
        }
        let epoch = self.epoch();
        let tag = Tag {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            color: draft.color,
        };
        let _slot = self.tag_slot.lock().await;
        let saved = confirm("tags.create", self.backend.create_tag(&tag).await)?.unwrap_or(tag);
        self.commit(epoch, "tags.create", |state| state.store.push_tags([saved.clone()]))?;
        Ok(saved)
    }

    /// Moves a tag to the position of another, optimistically.
    ///
    /// Only one tag-collection write is in flight at a time; a later call
    /// waits and then snapshots the settled order. On failure the pre-move
    /// order is restored.
    pub async fn reorder_tags(&self, dragged_id: &str, target_id: &str) -> Result<Vec<Tag>, OrganizerError> {
        if dragged_id == target_id {
            return Ok(self.tags());
        }
        let _slot = self.tag_slot.lock().await;

        let command = ReorderTags::new(dragged_id, target_id);
        let (epoch, snapshot, next) = {
            let mut state = self.state();
            let snapshot = command.snapshot(&state.store);
            let next = command.apply(&mut state.store)?;
            (state.epoch, snapshot, next)
        };

        match confirm("tags.reorder", self.backend.reorder_tags(&next).await) {
            Ok(_) => Ok(next),
            Err(err) => {
                let restored = self.commit(epoch, "tags.reorder", |state| {
                    command.rollback(&mut state.store, snapshot)
                });
                if restored.is_ok() {
                    warn!(dragged = dragged_id, target = target_id, "tag reorder rolled back");
                }
                Err(err)
            }
        }
    }

    // ─── View state ───

    pub fn select_folder(&self, folder_id: &str) {
        let mut state = self.state();
        let State { store, view, .. } = &mut *state;
        view.select_folder(store.folders(), folder_id);
    }

    pub fn set_search_query(&self, query: &str) {
        self.state().view.criteria.search_query = query.to_string();
    }

    pub fn toggle_tag(&self, name: &str) {
        self.state().view.toggle_tag(name);
    }

    pub fn clear_tags(&self) {
        self.state().view.criteria.active_tags.clear();
    }

    pub fn set_date_range(&self, range: DateRange) {
        self.state().view.criteria.date_range = range;
    }

    pub fn pick_calendar_date(&self, date: DateTime<Local>) {
        self.state().view.pick_calendar_date(date);
    }

    pub fn clear_date_range(&self) {
        self.state().view.criteria.date_range = DateRange::default();
    }

    pub fn set_sort_option(&self, option: SortOption) {
        self.state().view.set_sort_option(option);
    }

    pub fn set_sort_order(&self, order: SortOrder) {
        self.state().view.criteria.sort_order = order;
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.state().view.criteria.clone()
    }

    pub fn has_active_filters(&self) -> bool {
        self.state().view.criteria.has_active_filters()
    }

    /// Returns whether the folder is now expanded.
    pub fn toggle_expanded(&self, folder_id: &str) -> bool {
        self.state().view.expansion.toggle(folder_id)
    }

    pub fn toggle_expand_all(&self) {
        let mut state = self.state();
        let State { store, view, .. } = &mut *state;
        view.expansion.toggle_all(store.folders());
    }

    pub fn expanded_folder_ids(&self) -> Vec<String> {
        self.state()
            .view
            .expansion
            .expanded_ids()
            .map(str::to_string)
            .collect()
    }

    // ─── Read model ───

    pub fn store(&self) -> EntityStore {
        self.state().store.clone()
    }

    pub fn folders(&self) -> Vec<Folder> {
        self.state().store.folders().to_vec()
    }

    pub fn tags(&self) -> Vec<Tag> {
        self.state().store.tags().to_vec()
    }

    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.state().store.bookmarks().to_vec()
    }

    pub fn bookmark(&self, id: &str) -> Option<Bookmark> {
        self.state().store.bookmark(id).cloned()
    }

    pub fn visible_bookmarks(&self) -> Vec<Bookmark> {
        let state = self.state();
        filter_pipeline::visible(state.store.bookmarks(), &state.view.criteria)
    }

    /// Folder counts over the whole collection, regardless of filters.
    pub fn folder_facets(&self) -> Vec<Counted<Folder>> {
        let state = self.state();
        facet_counter::folder_counts(state.store.folders(), state.store.bookmarks())
    }

    /// Tag counts over the visible bookmarks, hiding empty tags while filtering.
    pub fn tag_facets(&self) -> Vec<Counted<Tag>> {
        let state = self.state();
        let visible = filter_pipeline::visible(state.store.bookmarks(), &state.view.criteria);
        let counted = facet_counter::tag_counts(state.store.tags(), &visible);
        facet_counter::visible_tag_facets(counted, state.view.criteria.has_active_filters())
    }

    /// Breadcrumbs for the selected folder.
    pub fn breadcrumbs(&self) -> Vec<Folder> {
        let state = self.state();
        folder_tree::breadcrumb_path(state.store.folders(), &state.view.criteria.selected_folder_id)
    }

    pub fn breadcrumbs_for(&self, folder_id: &str) -> Vec<Folder> {
        folder_tree::breadcrumb_path(self.state().store.folders(), folder_id)
    }

    pub fn root_folders(&self) -> Vec<Folder> {
        folder_tree::root_folders(self.state().store.folders())
    }

    pub fn subfolders_of(&self, parent_id: &str) -> Vec<Folder> {
        folder_tree::subfolders_of(self.state().store.folders(), parent_id)
    }

    pub fn descendants_of(&self, parent_id: &str) -> Vec<Folder> {
        folder_tree::descendants_of(self.state().store.folders(), parent_id)
    }

    pub fn default_folder_for_new_bookmark(&self, explicit: Option<&str>) -> Option<String> {
        self.state().view.default_folder(explicit)
    }

    /// Days of `month` (1-12) on which at least one bookmark was created, in local time.
    pub fn days_with_bookmarks(&self, year: i32, month: u32) -> BTreeSet<u32> {
        self.state()
            .store
            .bookmarks()
            .iter()
            .filter_map(|b| Local.timestamp_millis_opt(b.created_at_timestamp).single())
            .filter(|dt| dt.year() == year && dt.month() == month)
            .map(|dt| dt.day())
            .collect()
    }
}
