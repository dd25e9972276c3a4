//! Optimistic mutations as command objects.
//!
//! The organizer captures `snapshot` before `apply`, sends the change to the
//! backend, and calls `rollback` with the snapshot only if the backend refuses.

use std::collections::HashSet;

use crate::managers::entity_store::EntityStore;
use crate::types::bookmark::{Bookmark, Tag};
use crate::types::errors::OrganizerError;

pub trait OptimisticCommand {
    type Snapshot;
    /// What `apply` produced, handed back to the caller.
    type Output;

    fn snapshot(&self, store: &EntityStore) -> Self::Snapshot;
    fn apply(&self, store: &mut EntityStore) -> Result<Self::Output, OrganizerError>;
    fn rollback(&self, store: &mut EntityStore, snapshot: Self::Snapshot);
}

/// Moves one tag to the index currently held by another.
#[derive(Debug, Clone)]
pub struct ReorderTags {
    pub dragged_id: String,
    pub target_id: String,
}

impl ReorderTags {
    pub fn new(dragged_id: &str, target_id: &str) -> Self {
        Self {
            dragged_id: dragged_id.to_string(),
            target_id: target_id.to_string(),
        }
    }
}

/// Removes `dragged_id` and reinserts it at the index `target_id` occupied before removal.
pub fn reordered(tags: &[Tag], dragged_id: &str, target_id: &str) -> Result<Vec<Tag>, OrganizerError> {
    let from = tags
        .iter()
        .position(|t| t.id == dragged_id)
        .ok_or_else(|| OrganizerError::NotFound(dragged_id.to_string()))?;
    let to = tags
        .iter()
        .position(|t| t.id == target_id)
        .ok_or_else(|| OrganizerError::NotFound(target_id.to_string()))?;

    let mut next = tags.to_vec();
    let moved = next.remove(from);
    next.insert(to, moved);
    Ok(next)
}

impl OptimisticCommand for ReorderTags {
    type Snapshot = Vec<Tag>;
    type Output = Vec<Tag>;

    fn snapshot(&self, store: &EntityStore) -> Vec<Tag> {
        store.tags().to_vec()
    }

    fn apply(&self, store: &mut EntityStore) -> Result<Vec<Tag>, OrganizerError> {
        let next = reordered(store.tags(), &self.dragged_id, &self.target_id)?;
        store.replace_tags(next.clone());
        Ok(next)
    }

    /// Restores the snapshot order. Tags confirmed after the snapshot was
    /// taken are kept, after the restored ones.
    fn rollback(&self, store: &mut EntityStore, snapshot: Vec<Tag>) {
        let known: HashSet<&str> = snapshot.iter().map(|t| t.id.as_str()).collect();
        let added: Vec<Tag> = store
            .tags()
            .iter()
            .filter(|t| !known.contains(t.id.as_str()))
            .cloned()
            .collect();
        let mut restored = snapshot;
        restored.extend(added);
        store.replace_tags(restored);
    }
}

/// Counts a visit locally. Never rolled back.
#[derive(Debug, Clone)]
pub struct RecordVisit {
    pub bookmark_id: String,
    pub at_ms: i64,
}

impl OptimisticCommand for RecordVisit {
    type Snapshot = ();
    type Output = Bookmark;

    fn snapshot(&self, _store: &EntityStore) {}

    fn apply(&self, store: &mut EntityStore) -> Result<Bookmark, OrganizerError> {
        store
            .record_visit(&self.bookmark_id, self.at_ms)
            .cloned()
            .ok_or_else(|| OrganizerError::NotFound(self.bookmark_id.clone()))
    }

    fn rollback(&self, _store: &mut EntityStore, _snapshot: ()) {}
}
