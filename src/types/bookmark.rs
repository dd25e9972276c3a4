use serde::{Deserialize, Serialize};

/// Id of the synthetic folder that stands for "all bookmarks".
pub const ROOT_FOLDER_ID: &str = "all";

/// Display string given to freshly created bookmarks.
pub const JUST_NOW: &str = "just now";

/// Represents a saved bookmark.
///
/// `tags` holds tag *names*, not tag ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    pub folder_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: String,
    pub created_at_timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(default)]
    pub visit_count: u32,
    #[serde(default)]
    pub last_visited: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Bookmark {
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }
}

/// Represents a folder for organizing bookmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default = "default_folder_icon")]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Folder {
    pub fn is_root(&self) -> bool {
        self.id == ROOT_FOLDER_ID
    }

    /// True when the folder hangs directly under the root (explicitly or by omission).
    pub fn is_top_level(&self) -> bool {
        !self.is_root()
            && self
                .parent_id
                .as_deref()
                .map_or(true, |p| p == ROOT_FOLDER_ID)
    }
}

fn default_folder_icon() -> String {
    "folder".to_string()
}

/// A user-defined label. Position in the tag collection is meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// An entity paired with a derived count, as shown in navigation.
///
/// Counts are never stored on the entities themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Counted<T> {
    #[serde(flatten)]
    pub item: T,
    pub count: usize,
}

impl<T> Counted<T> {
    pub fn new(item: T, count: usize) -> Self {
        Self { item, count }
    }

    /// Wire form used when handing a brand-new entity to the backend.
    pub fn zero(item: T) -> Self {
        Self { item, count: 0 }
    }
}

/// User input for a new bookmark, before an id and timestamps are assigned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBookmark {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewBookmark {
    /// Turns the draft into a full record owned by the client.
    pub fn into_bookmark(self, id: String, folder_id: String, now_ms: i64) -> Bookmark {
        let favicon = Some(format!(
            "https://www.google.com/s2/favicons?domain={}&sz=64",
            self.url
        ));
        Bookmark {
            id,
            title: self.title,
            url: self.url,
            description: self.description,
            folder_id,
            tags: self.tags,
            created_at: JUST_NOW.to_string(),
            created_at_timestamp: now_ms,
            favicon,
            visit_count: 0,
            last_visited: now_ms,
            content: None,
        }
    }
}

/// User input for a new folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFolder {
    pub name: String,
    #[serde(default = "default_folder_icon")]
    pub icon: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl NewFolder {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            icon: default_folder_icon(),
            color: None,
        }
    }
}

/// User input for a new tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTag {
    pub name: String,
    #[serde(default = "default_tag_color")]
    pub color: String,
}

impl NewTag {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            color: default_tag_color(),
        }
    }
}

fn default_tag_color() -> String {
    "blue".to_string()
}
