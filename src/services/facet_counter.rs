//! Facet counts shown next to folders and tags.
//!
//! Folder counts always cover the whole collection. Tag counts cover only the
//! currently visible bookmarks.

use crate::types::bookmark::{Bookmark, Counted, Folder, Tag, ROOT_FOLDER_ID};

/// Counts bookmarks per folder over the unfiltered collection.
///
/// The root sentinel counts everything; other folders count exact members only.
pub fn folder_counts(folders: &[Folder], all_bookmarks: &[Bookmark]) -> Vec<Counted<Folder>> {
    folders
        .iter()
        .map(|folder| {
            let count = if folder.id == ROOT_FOLDER_ID {
                all_bookmarks.len()
            } else {
                all_bookmarks
                    .iter()
                    .filter(|b| b.folder_id == folder.id)
                    .count()
            };
            Counted::new(folder.clone(), count)
        })
        .collect()
}

/// Counts visible bookmarks carrying each tag, preserving tag order.
pub fn tag_counts(tags: &[Tag], visible: &[Bookmark]) -> Vec<Counted<Tag>> {
    tags.iter()
        .map(|tag| {
            let count = visible.iter().filter(|b| b.has_tag(&tag.name)).count();
            Counted::new(tag.clone(), count)
        })
        .collect()
}

/// Tags to list in navigation: zero-count tags are hidden while any filter is active.
pub fn visible_tag_facets(counted: Vec<Counted<Tag>>, filters_active: bool) -> Vec<Counted<Tag>> {
    if filters_active {
        counted.into_iter().filter(|t| t.count > 0).collect()
    } else {
        counted
    }
}
