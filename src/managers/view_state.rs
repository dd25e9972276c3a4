//! Transient view state: filter criteria and folder expansion.

use chrono::{DateTime, Local};

use crate::managers::folder_tree::ExpansionState;
use crate::services::filter_pipeline::{end_of_day_datetime, start_of_day};
use crate::types::bookmark::{Folder, ROOT_FOLDER_ID};
use crate::types::filter::{DateRange, FilterCriteria, SortOption, SortOrder};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub criteria: FilterCriteria,
    pub expansion: ExpansionState,
}

impl ViewState {
    pub fn new(sort_option: SortOption, sort_order: SortOrder) -> Self {
        Self {
            criteria: FilterCriteria {
                sort_option,
                sort_order,
                ..FilterCriteria::default()
            },
            expansion: ExpansionState::new(),
        }
    }

    pub fn select_folder(&mut self, folders: &[Folder], folder_id: &str) {
        self.criteria.selected_folder_id = folder_id.to_string();
        self.expansion.reveal(folders, folder_id);
    }

    /// Adds the tag to the active set, or removes it if already active.
    pub fn toggle_tag(&mut self, name: &str) {
        let tags = &mut self.criteria.active_tags;
        if let Some(pos) = tags.iter().position(|t| t == name) {
            tags.remove(pos);
        } else {
            tags.push(name.to_string());
        }
    }

    /// Choosing a new sort key resets the direction to descending.
    pub fn set_sort_option(&mut self, option: SortOption) {
        self.criteria.sort_option = option;
        self.criteria.sort_order = SortOrder::Desc;
    }

    /// Calendar range picking.
    ///
    /// A click with no start, or with a complete range, starts over. A click
    /// on a day before the start also starts over. Any other click closes the
    /// range at the end of the clicked day.
    pub fn pick_calendar_date(&mut self, date: DateTime<Local>) {
        let range = self.criteria.date_range;
        self.criteria.date_range = match (range.start, range.end) {
            (Some(start), None) if date.timestamp_millis() >= start_of_day(&start) => DateRange {
                start: Some(start),
                end: Some(end_of_day_datetime(&date)),
            },
            _ => DateRange::single_day(date),
        };
    }

    /// The folder a new bookmark lands in when the user did not pick one.
    pub fn default_folder(&self, explicit: Option<&str>) -> Option<String> {
        explicit.map(str::to_string).or_else(|| {
            let selected = &self.criteria.selected_folder_id;
            (selected != ROOT_FOLDER_ID).then(|| selected.clone())
        })
    }

    pub fn reset(&mut self) {
        let (option, order) = (self.criteria.sort_option, self.criteria.sort_order);
        *self = Self::new(option, order);
    }
}
