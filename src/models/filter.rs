// file: src/models/filter.rs
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Appointment, AppointmentMode, AppointmentStatus};
use crate::error::{AppError, AppResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time-window tab applied before the search/status/mode pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Today,
    Upcoming,
    Past,
    All,
    /// An explicit calendar pick.
    Date,
}

impl Tab {
    /// Tabs in tab-bar order. `Date` only appears once a day is picked.
    pub const BAR: [Tab; 4] = [Tab::Upcoming, Tab::Today, Tab::Past, Tab::All];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Today => "Today",
            Tab::Upcoming => "Upcoming",
            Tab::Past => "Past",
            Tab::All => "All",
            Tab::Date => "Date",
        }
    }

    /// Query sent to the service for this tab.
    pub fn query(&self, today: NaiveDate, selected: NaiveDate) -> AppointmentQuery {
        match self {
            Tab::Today => AppointmentQuery::for_date(today),
            Tab::Date => AppointmentQuery::for_date(selected),
            Tab::Upcoming | Tab::Past | Tab::All => AppointmentQuery::all(),
        }
    }

    /// Local date restriction applied to whatever the service returned.
    pub fn admits(&self, appointment: &Appointment, today: NaiveDate, selected: NaiveDate) -> bool {
        match self {
            Tab::Today => appointment.is_today(today),
            Tab::Upcoming => appointment.is_upcoming(today),
            Tab::Past => appointment.is_past(today),
            Tab::All => true,
            Tab::Date => appointment.date == selected,
        }
    }

    /// Keeps the records this tab admits, in their original order.
    pub fn restrict(
        &self,
        appointments: Vec<Appointment>,
        today: NaiveDate,
        selected: NaiveDate,
    ) -> Vec<Appointment> {
        appointments
            .into_iter()
            .filter(|a| self.admits(a, today, selected))
            .collect()
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tab {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(Tab::Today),
            "upcoming" => Ok(Tab::Upcoming),
            "past" => Ok(Tab::Past),
            "all" => Ok(Tab::All),
            "date" => Ok(Tab::Date),
            _ => Err(AppError::invalid_input(format!("Unknown tab '{}'", s))),
        }
    }
}

/// A dropdown value: either "All" or one concrete option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChoice<T> {
    All,
    Only(T),
}

impl<T> Default for FilterChoice<T> {
    fn default() -> Self {
        FilterChoice::All
    }
}

impl<T: PartialEq> FilterChoice<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            FilterChoice::All => true,
            FilterChoice::Only(wanted) => wanted == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, FilterChoice::All)
    }
}

impl<T: fmt::Display> fmt::Display for FilterChoice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterChoice::All => f.write_str("All"),
            FilterChoice::Only(value) => value.fmt(f),
        }
    }
}

impl FromStr for FilterChoice<AppointmentStatus> {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AppError::invalid_input("Status filter cannot be empty"));
        }
        if s.eq_ignore_ascii_case("all") {
            return Ok(FilterChoice::All);
        }
        // Typed names match known statuses in any case; stored data stays exact
        let status = AppointmentStatus::KNOWN
            .into_iter()
            .find(|known| known.as_str().eq_ignore_ascii_case(s))
            .unwrap_or_else(|| AppointmentStatus::Other(s.to_string()));
        Ok(FilterChoice::Only(status))
    }
}

impl FromStr for FilterChoice<AppointmentMode> {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(FilterChoice::All)
        } else {
            s.parse().map(FilterChoice::Only)
        }
    }
}

/// Search text plus the status and mode dropdowns. All three must hold.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListFilters {
    pub search: String,
    pub status: FilterChoice<AppointmentStatus>,
    pub mode: FilterChoice<AppointmentMode>,
}

impl ListFilters {
    pub fn matches(&self, appointment: &Appointment) -> bool {
        appointment.matches_search(&self.search)
            && self.status.matches(&appointment.status)
            && self.mode.matches(&appointment.mode)
    }

    pub fn apply<'a>(&self, appointments: &'a [Appointment]) -> Vec<&'a Appointment> {
        appointments.iter().filter(|a| self.matches(a)).collect()
    }

    /// True when any control narrows the list.
    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || !self.status.is_all() || !self.mode.is_all()
    }
}

/// Service-side restriction. The date is kept as text so a malformed value
/// can be ignored instead of rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppointmentQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
}

impl AppointmentQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date: Some(date.format(DATE_FORMAT).to_string()),
            status: None,
        }
    }

    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// The date restriction, or `None` when absent or not `YYYY-MM-DD`.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(e) => {
                debug!("Ignoring malformed date filter '{}': {}", raw, e);
                None
            }
        }
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        let date_ok = self
            .parsed_date()
            .map_or(true, |date| appointment.date == date);
        let status_ok = self
            .status
            .as_ref()
            .map_or(true, |status| &appointment.status == status);
        date_ok && status_ok
    }
}
