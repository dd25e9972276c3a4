//! Folder tree integrity: move validation, breadcrumbs, subtree queries and
//! expand/collapse bookkeeping.
//!
//! Every upward or downward walk is bounded by the number of folders and
//! tracks visited ids, so a corrupted `parent_id` loop cannot hang the caller.

use std::collections::{BTreeSet, HashSet};

use tracing::warn;

use crate::types::bookmark::{Folder, ROOT_FOLDER_ID};
use crate::types::errors::OrganizerError;

pub fn find<'a>(folders: &'a [Folder], id: &str) -> Option<&'a Folder> {
    folders.iter().find(|f| f.id == id)
}

/// True when `candidate` is `ancestor` itself or sits anywhere below it.
pub fn is_same_or_descendant(folders: &[Folder], candidate: &str, ancestor: &str) -> bool {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = find(folders, candidate);

    while let Some(folder) = current {
        if folder.id == ancestor {
            return true;
        }
        if !visited.insert(folder.id.as_str()) || visited.len() > folders.len() {
            warn!(folder = %folder.id, "parent chain loops without reaching the root");
            return false;
        }
        match folder.parent_id.as_deref() {
            None | Some(ROOT_FOLDER_ID) => return false,
            Some(parent) => current = find(folders, parent),
        }
    }
    false
}

/// Checks that `dragged` may be re-parented under `target`.
///
/// Rejected when the two are equal, when `dragged` is the root sentinel, when
/// either folder is unknown (the sentinel is always a valid target), or when
/// `target` lies inside the subtree of `dragged`.
pub fn validate_move(folders: &[Folder], dragged: &str, target: &str) -> Result<(), OrganizerError> {
    if dragged == target {
        return Err(OrganizerError::SameFolder(dragged.to_string()));
    }
    if dragged == ROOT_FOLDER_ID {
        return Err(OrganizerError::RootFolderImmutable);
    }
    if find(folders, dragged).is_none() {
        return Err(OrganizerError::NotFound(dragged.to_string()));
    }
    if target != ROOT_FOLDER_ID && find(folders, target).is_none() {
        return Err(OrganizerError::NotFound(target.to_string()));
    }
    if is_same_or_descendant(folders, target, dragged) {
        return Err(OrganizerError::CycleDetected {
            dragged: dragged.to_string(),
            target: target.to_string(),
        });
    }
    Ok(())
}

/// Path from the top of the tree down to `folder_id`, root sentinel excluded.
pub fn breadcrumb_path(folders: &[Folder], folder_id: &str) -> Vec<Folder> {
    let mut path = Vec::new();
    if folder_id == ROOT_FOLDER_ID {
        return path;
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = find(folders, folder_id);
    while let Some(folder) = current {
        if folder.id == ROOT_FOLDER_ID || !visited.insert(folder.id.as_str()) {
            break;
        }
        path.push(folder.clone());
        current = folder.parent_id.as_deref().and_then(|p| find(folders, p));
    }
    path.reverse();
    path
}

/// Direct children of `parent_id`.
pub fn subfolders_of(folders: &[Folder], parent_id: &str) -> Vec<Folder> {
    folders
        .iter()
        .filter(|f| f.parent_id.as_deref() == Some(parent_id))
        .cloned()
        .collect()
}

/// Every folder below `parent_id`, breadth first.
pub fn descendants_of(folders: &[Folder], parent_id: &str) -> Vec<Folder> {
    let mut seen: HashSet<String> = HashSet::from([parent_id.to_string()]);
    let mut out = Vec::new();
    let mut frontier = vec![parent_id.to_string()];

    while let Some(id) = frontier.pop() {
        for child in folders.iter().filter(|f| f.parent_id.as_deref() == Some(id.as_str())) {
            if seen.insert(child.id.clone()) {
                frontier.insert(0, child.id.clone());
                out.push(child.clone());
            }
        }
    }
    out
}

/// Folders shown at the top level of navigation.
pub fn root_folders(folders: &[Folder]) -> Vec<Folder> {
    folders.iter().filter(|f| f.is_top_level()).cloned().collect()
}

pub fn has_children(folders: &[Folder], id: &str) -> bool {
    folders.iter().any(|f| f.parent_id.as_deref() == Some(id))
}

/// Set of folder ids currently expanded in navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: BTreeSet<String>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn expanded_ids(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn expand(&mut self, id: &str) {
        self.expanded.insert(id.to_string());
    }

    /// Flips one folder. Returns whether it is now expanded.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        }
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Collapses everything if anything is open, otherwise opens every parent folder.
    pub fn toggle_all(&mut self, folders: &[Folder]) {
        if !self.expanded.is_empty() {
            self.collapse_all();
            return;
        }
        self.expanded = folders
            .iter()
            .filter(|f| !f.is_root() && has_children(folders, &f.id))
            .map(|f| f.id.clone())
            .collect();
    }

    /// Opens the direct parent of a newly selected folder, unless that parent is the root.
    pub fn reveal(&mut self, folders: &[Folder], selected_id: &str) {
        if let Some(parent) = find(folders, selected_id).and_then(|f| f.parent_id.as_deref()) {
            if parent != ROOT_FOLDER_ID {
                self.expand(parent);
            }
        }
    }
}
