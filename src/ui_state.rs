//! UI state management module
//!
//! Everything the front desk has selected or typed, kept apart from the
//! records themselves.

use chrono::{DateTime, NaiveDate, Utc};

use crate::calendar::CalendarMonth;
use crate::models::{ListFilters, Tab};

/// Feedback line shown under the tab bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(text) | Notice::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

#[derive(Debug, Clone)]
pub struct UiState {
    /// Current time-window tab
    pub active_tab: Tab,

    /// Date picked on the calendar (today until a day is clicked)
    pub selected_date: NaiveDate,

    /// Month the calendar panel shows
    pub current_month: CalendarMonth,

    /// Search text and dropdowns
    pub filters: ListFilters,

    /// Whether the latest tab fetch is still outstanding
    pub loading: bool,

    pub notice: Option<Notice>,

    /// When the list last refreshed successfully
    pub last_refresh: Option<DateTime<Utc>>,
}

impl UiState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            active_tab: Tab::Today,
            selected_date: today,
            current_month: CalendarMonth::containing(today),
            filters: ListFilters::default(),
            loading: false,
            notice: None,
            last_refresh: None,
        }
    }

    /// The selected day is highlighted only on the Today and Date tabs.
    pub fn highlighted_date(&self) -> Option<NaiveDate> {
        match self.active_tab {
            Tab::Today | Tab::Date => Some(self.selected_date),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let today = NaiveDate::from_ymd_opt(2025, 12, 10).unwrap();
        let state = UiState::new(today);

        assert_eq!(state.active_tab, Tab::Today);
        assert_eq!(state.selected_date, today);
        assert_eq!(state.current_month, CalendarMonth::containing(today));
        assert!(!state.filters.is_active());
        assert_eq!(state.highlighted_date(), Some(today));
    }

    #[test]
    fn test_no_highlight_on_range_tabs() {
        let today = NaiveDate::from_ymd_opt(2025, 12, 10).unwrap();
        let mut state = UiState::new(today);
        state.active_tab = Tab::Upcoming;
        assert_eq!(state.highlighted_date(), None);
    }
}
