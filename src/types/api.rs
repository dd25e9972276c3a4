use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::filter::{SortOption, SortOrder};

/// Uniform envelope every backend call answers with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failed(message: Option<&str>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.map(str::to_string),
        }
    }
}

impl ApiResponse<()> {
    pub fn done() -> Self {
        Self::ok(())
    }
}

/// Credentials for `auth.login`. The password is wiped on drop.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Partial update for a bookmark. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl BookmarkPatch {
    pub fn content(content: &str) -> Self {
        Self {
            content: Some(content.to_string()),
            ..Default::default()
        }
    }

    /// Merges the patch into `bookmark` in place.
    pub fn apply_to(&self, bookmark: &mut super::bookmark::Bookmark) {
        if let Some(title) = &self.title {
            bookmark.title = title.clone();
        }
        if let Some(url) = &self.url {
            bookmark.url = url.clone();
        }
        if let Some(description) = &self.description {
            bookmark.description = description.clone();
        }
        if let Some(folder_id) = &self.folder_id {
            bookmark.folder_id = folder_id.clone();
        }
        if let Some(tags) = &self.tags {
            bookmark.tags = tags.clone();
        }
        if let Some(content) = &self.content {
            bookmark.content = Some(content.clone());
        }
    }
}

/// Partial update for a folder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl FolderPatch {
    pub fn rename(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn apply_to(&self, folder: &mut super::bookmark::Folder) {
        if let Some(name) = &self.name {
            folder.name = name.clone();
        }
        if let Some(icon) = &self.icon {
            folder.icon = icon.clone();
        }
        if let Some(color) = &self.color {
            folder.color = Some(color.clone());
        }
    }
}

/// Optional server-side narrowing for `bookmarks.getAll`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkQueryParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
}

impl BookmarkQueryParams {
    /// Flattens the params into `key=value` pairs for a query string.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(folder_id) = &self.folder_id {
            pairs.push(("folderId".to_string(), folder_id.clone()));
        }
        if let Some(tags) = &self.tags {
            pairs.push(("tags".to_string(), tags.join(",")));
        }
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        if let Some(start) = &self.start_date {
            pairs.push(("startDate".to_string(), start.clone()));
        }
        if let Some(end) = &self.end_date {
            pairs.push(("endDate".to_string(), end.clone()));
        }
        if let Some(sort) = self.sort {
            let s = match sort {
                SortOption::Created => "created",
                SortOption::Frequent => "frequent",
                SortOption::Recent => "recent",
            };
            pairs.push(("sort".to_string(), s.to_string()));
        }
        if let Some(order) = self.order {
            let o = match order {
                SortOrder::Asc => "asc",
                SortOrder::Desc => "desc",
            };
            pairs.push(("order".to_string(), o.to_string()));
        }
        pairs
    }
}
