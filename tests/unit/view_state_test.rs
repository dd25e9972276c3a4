//! Unit tests for view state: folder selection, tag toggling, sort changes
//! and calendar range picking.

use chrono::{DateTime, Local, TimeZone};
use markshelf::managers::view_state::ViewState;
use markshelf::services::filter_pipeline::end_of_day;
use markshelf::types::bookmark::{Folder, ROOT_FOLDER_ID};
use markshelf::types::filter::{DateRange, SortOption, SortOrder};

fn folder(id: &str, parent: &str) -> Folder {
    Folder {
        id: id.to_string(),
        name: id.to_string(),
        icon: "folder".to_string(),
        color: None,
        parent_id: Some(parent.to_string()),
    }
}

fn march(day: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 3, day, 10, 0, 0).unwrap()
}

#[test]
fn test_new_view_starts_unfiltered() {
    let view = ViewState::new(SortOption::Recent, SortOrder::Asc);
    assert_eq!(view.criteria.selected_folder_id, ROOT_FOLDER_ID);
    assert_eq!(view.criteria.sort_option, SortOption::Recent);
    assert_eq!(view.criteria.sort_order, SortOrder::Asc);
    assert!(!view.criteria.has_active_filters());
}

#[test]
fn test_select_folder_reveals_parent() {
    let folders = vec![folder("work", ROOT_FOLDER_ID), folder("clients", "work")];
    let mut view = ViewState::default();
    view.select_folder(&folders, "clients");
    assert_eq!(view.criteria.selected_folder_id, "clients");
    assert!(view.expansion.is_expanded("work"));
    assert!(view.criteria.has_active_filters());
}

#[test]
fn test_toggle_tag_adds_then_removes() {
    let mut view = ViewState::default();
    view.toggle_tag("Dev");
    view.toggle_tag("CSS");
    assert_eq!(view.criteria.active_tags, vec!["Dev", "CSS"]);
    view.toggle_tag("Dev");
    assert_eq!(view.criteria.active_tags, vec!["CSS"]);
}

#[test]
fn test_sort_option_resets_to_descending() {
    let mut view = ViewState::new(SortOption::Created, SortOrder::Asc);
    view.set_sort_option(SortOption::Recent);
    assert_eq!(view.criteria.sort_option, SortOption::Recent);
    assert_eq!(view.criteria.sort_order, SortOrder::Desc);
}

#[test]
fn test_blank_search_is_not_an_active_filter() {
    let mut view = ViewState::default();
    view.criteria.search_query = "   ".to_string();
    assert!(!view.criteria.has_active_filters());
}

#[test]
fn test_calendar_pick_sequence() {
    let mut view = ViewState::default();
    view.pick_calendar_date(march(4));
    assert_eq!(view.criteria.date_range, DateRange::single_day(march(4)));

    view.pick_calendar_date(march(4));
    let range = view.criteria.date_range;
    assert_eq!(range.start, Some(march(4)));
    assert_eq!(range.end.map(|e| e.timestamp_millis()), Some(end_of_day(&march(4))));

    view.pick_calendar_date(march(20));
    assert_eq!(view.criteria.date_range, DateRange::single_day(march(20)));
}

#[test]
fn test_reset_keeps_sort_preferences() {
    let folders = vec![folder("work", ROOT_FOLDER_ID)];
    let mut view = ViewState::new(SortOption::Frequent, SortOrder::Asc);
    view.select_folder(&folders, "work");
    view.toggle_tag("Dev");
    view.expansion.expand("work");
    view.reset();

    assert_eq!(view, ViewState::new(SortOption::Frequent, SortOrder::Asc));
}

#[test]
fn test_default_folder_prefers_explicit_then_selection() {
    let folders = vec![folder("work", ROOT_FOLDER_ID)];
    let mut view = ViewState::default();
    assert_eq!(view.default_folder(None), None);
    view.select_folder(&folders, "work");
    assert_eq!(view.default_folder(None).as_deref(), Some("work"));
    assert_eq!(view.default_folder(Some("tech")).as_deref(), Some("tech"));
}
