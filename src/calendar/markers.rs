// src/calendar/markers.rs

use chrono::NaiveDate;

use super::CalendarMonth;
use crate::models::{Appointment, AppointmentStatus};

/// Summary dot for a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayMarker {
    Confirmed,
    Scheduled,
    Upcoming,
    Cancelled,
    /// Appointments exist but none has a prioritised status.
    Other,
}

impl DayMarker {
    /// Single-character glyph for the terminal grid.
    pub fn symbol(&self) -> char {
        match self {
            DayMarker::Confirmed => 'C',
            DayMarker::Scheduled => 'S',
            DayMarker::Upcoming => 'U',
            DayMarker::Cancelled => 'X',
            DayMarker::Other => '.',
        }
    }
}

const PRIORITY: [(AppointmentStatus, DayMarker); 4] = [
    (AppointmentStatus::Confirmed, DayMarker::Confirmed),
    (AppointmentStatus::Scheduled, DayMarker::Scheduled),
    (AppointmentStatus::Upcoming, DayMarker::Upcoming),
    (AppointmentStatus::Cancelled, DayMarker::Cancelled),
];

/// Marker for `date`, first match wins in `PRIORITY` order.
///
/// `appointments` must be the full, unfiltered record set.
pub fn day_marker(appointments: &[Appointment], date: NaiveDate) -> Option<DayMarker> {
    let on_day: Vec<&Appointment> = appointments.iter().filter(|a| a.date == date).collect();
    if on_day.is_empty() {
        return None;
    }

    PRIORITY
        .iter()
        .find(|(status, _)| on_day.iter().any(|a| &a.status == status))
        .map(|(_, marker)| *marker)
        .or(Some(DayMarker::Other))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCell {
    pub day: u32,
    pub date: NaiveDate,
    pub marker: Option<DayMarker>,
    pub selected: bool,
}

/// One cell per day of `month`. `selected` is the highlighted date, if any.
pub fn month_grid(
    month: &CalendarMonth,
    appointments: &[Appointment],
    selected: Option<NaiveDate>,
) -> Vec<MonthCell> {
    (1..=month.days_in_month())
        .filter_map(|day| month.date_for_day(day).map(|date| (day, date)))
        .map(|(day, date)| MonthCell {
            day,
            date,
            marker: day_marker(appointments, date),
            selected: selected == Some(date),
        })
        .collect()
}
