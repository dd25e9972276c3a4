//! Filter-sort pipeline: derives the ordered visible subset of bookmarks.
//!
//! A bookmark is visible when it passes the folder, search, tag and date
//! predicates together. Sorting is stable, so bookmarks with equal keys keep
//! their store order.

use chrono::{DateTime, Local, LocalResult, NaiveTime, TimeZone};

use crate::types::bookmark::{Bookmark, ROOT_FOLDER_ID};
use crate::types::filter::{DateRange, FilterCriteria, SortOption, SortOrder};

/// Returns the bookmarks matching `criteria`, ordered by its sort key.
pub fn visible(bookmarks: &[Bookmark], criteria: &FilterCriteria) -> Vec<Bookmark> {
    let window = DateWindow::from_range(&criteria.date_range);
    let needle = criteria.search_query.to_lowercase();

    let mut result: Vec<Bookmark> = bookmarks
        .iter()
        .filter(|b| {
            matches_folder(b, &criteria.selected_folder_id)
                && matches_search(b, &needle)
                && matches_tags(b, &criteria.active_tags)
                && window.contains(b.created_at_timestamp)
        })
        .cloned()
        .collect();

    sort_bookmarks(&mut result, criteria.sort_option, criteria.sort_order);
    result
}

/// Folder scope. Children of the selected folder are not included.
pub fn matches_folder(bookmark: &Bookmark, selected_folder_id: &str) -> bool {
    selected_folder_id == ROOT_FOLDER_ID || bookmark.folder_id == selected_folder_id
}

/// Case-insensitive substring match on title or url. `needle` must already be lowercase.
pub fn matches_search(bookmark: &Bookmark, needle: &str) -> bool {
    needle.is_empty()
        || bookmark.title.to_lowercase().contains(needle)
        || bookmark.url.to_lowercase().contains(needle)
}

/// Every active tag must be present on the bookmark.
pub fn matches_tags(bookmark: &Bookmark, active_tags: &[String]) -> bool {
    active_tags.iter().all(|t| bookmark.has_tag(t))
}

pub fn matches_date(bookmark: &Bookmark, range: &DateRange) -> bool {
    DateWindow::from_range(range).contains(bookmark.created_at_timestamp)
}

/// Sorts in place by the chosen key.
pub fn sort_bookmarks(bookmarks: &mut [Bookmark], option: SortOption, order: SortOrder) {
    bookmarks.sort_by(|a, b| {
        let ordering = sort_key(a, option).cmp(&sort_key(b, option));
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

pub fn sort_key(bookmark: &Bookmark, option: SortOption) -> i64 {
    match option {
        SortOption::Created => bookmark.created_at_timestamp,
        SortOption::Frequent => i64::from(bookmark.visit_count),
        SortOption::Recent => bookmark.last_visited,
    }
}

/// Epoch milliseconds of local midnight on the day of `at`.
pub fn start_of_day(at: &DateTime<Local>) -> i64 {
    local_millis(at, NaiveTime::MIN, true)
}

/// Epoch milliseconds of 23:59:59.999 local time on the day of `at`.
pub fn end_of_day(at: &DateTime<Local>) -> i64 {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    local_millis(at, last, false)
}

/// Local end of day as a `DateTime`, used when a calendar pick closes a range.
pub fn end_of_day_datetime(at: &DateTime<Local>) -> DateTime<Local> {
    Local
        .timestamp_millis_opt(end_of_day(at))
        .single()
        .unwrap_or(*at)
}

fn local_millis(at: &DateTime<Local>, time: NaiveTime, earliest: bool) -> i64 {
    let naive = at.date_naive().and_time(time);
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.timestamp_millis(),
        LocalResult::Ambiguous(first, second) => {
            if earliest {
                first.timestamp_millis()
            } else {
                second.timestamp_millis()
            }
        }
        // Wall-clock time skipped by a DST jump.
        LocalResult::None => at.timestamp_millis(),
    }
}

/// Inclusive millisecond bounds derived from a `DateRange`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DateWindow {
    lower: Option<i64>,
    upper: Option<i64>,
}

impl DateWindow {
    fn from_range(range: &DateRange) -> Self {
        match (range.start, range.end) {
            (None, _) => Self {
                lower: None,
                upper: None,
            },
            (Some(start), None) => Self {
                lower: Some(start_of_day(&start)),
                upper: Some(end_of_day(&start)),
            },
            (Some(start), Some(end)) => Self {
                lower: Some(start_of_day(&start)),
                upper: Some(end.timestamp_millis()),
            },
        }
    }

    fn contains(&self, ts: i64) -> bool {
        self.lower.map_or(true, |l| ts >= l) && self.upper.map_or(true, |u| ts <= u)
    }
}
