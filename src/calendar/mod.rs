// Calendar module
// Month navigation, the "today" clock, and per-day status markers

use chrono::{Datelike, Local, Months, NaiveDate};

pub mod markers;

pub use markers::{day_marker, month_grid, DayMarker, MonthCell};

/// Source of the local calendar date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall clock, day granularity.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Pinned date, for demos against the seed data and for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// The month the calendar panel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
    first: NaiveDate,
}

impl CalendarMonth {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn days_in_month(&self) -> u32 {
        match self.first.checked_add_months(Months::new(1)) {
            Some(next) => (next - self.first).num_days() as u32,
            None => 31,
        }
    }

    /// `day` of this month, or `None` when out of range.
    pub fn date_for_day(&self, day: u32) -> Option<NaiveDate> {
        if day == 0 || day > self.days_in_month() {
            return None;
        }
        self.first.with_day(day)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Moves by `delta` months. Stays put if that leaves chrono's range.
    pub fn shift(&self, delta: i32) -> Self {
        let months = Months::new(delta.unsigned_abs());
        let moved = if delta >= 0 {
            self.first.checked_add_months(months)
        } else {
            self.first.checked_sub_months(months)
        };
        Self {
            first: moved.unwrap_or(self.first),
        }
    }

    /// Empty cells before day 1 in a Sunday-first week grid.
    pub fn leading_blanks(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    /// e.g. "December 2025".
    pub fn title(&self) -> String {
        self.first.format("%B %Y").to_string()
    }
}
