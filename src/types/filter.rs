use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::bookmark::ROOT_FOLDER_ID;

/// Key used to order the visible bookmark list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    /// By `createdAtTimestamp`.
    #[default]
    Created,
    /// By `visitCount`.
    Frequent,
    /// By `lastVisited`.
    Recent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Creation-date window. `end` is compared exactly as stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Local>>,
    pub end: Option<DateTime<Local>>,
}

impl DateRange {
    pub fn single_day(start: DateTime<Local>) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    pub fn is_set(&self) -> bool {
        self.start.is_some()
    }
}

/// The transient criteria narrowing the visible bookmark list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub selected_folder_id: String,
    pub search_query: String,
    pub active_tags: Vec<String>,
    pub date_range: DateRange,
    pub sort_option: SortOption,
    pub sort_order: SortOrder,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            selected_folder_id: ROOT_FOLDER_ID.to_string(),
            search_query: String::new(),
            active_tags: Vec::new(),
            date_range: DateRange::default(),
            sort_option: SortOption::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl FilterCriteria {
    /// True when anything other than sorting narrows the list.
    pub fn has_active_filters(&self) -> bool {
        self.selected_folder_id != ROOT_FOLDER_ID
            || !self.search_query.trim().is_empty()
            || !self.active_tags.is_empty()
            || self.date_range.is_set()
    }
}
