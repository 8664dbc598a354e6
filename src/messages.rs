use crate::models::{
    Appointment, AppointmentMode, AppointmentStatus, FilterChoice, StatusAction, Tab,
};

/// Unified dashboard message type
///
/// User input and async results both arrive as messages; the dashboard
/// handles them one at a time in `Dashboard::update`.
#[derive(Debug, Clone)]
pub enum Message {
    // ===== Navigation Messages =====
    /// Switch to a tab (clears the search text)
    TabSelected(Tab),
    /// Pick a day of the displayed month
    DaySelected(u32),
    /// Move the calendar by this many months
    MonthChanged(i32),

    // ===== Filter Input Messages =====
    /// Update the patient/doctor search text
    SearchChanged(String),
    /// Update the status dropdown
    StatusFilterChanged(FilterChoice<AppointmentStatus>),
    /// Update the mode dropdown
    ModeFilterChanged(FilterChoice<AppointmentMode>),

    // ===== Action Messages =====
    /// Confirm or cancel an appointment
    StatusActionRequested { id: String, action: StatusAction },

    // ===== Async Operation Results =====
    /// Tab fetch completed
    AppointmentsLoaded {
        request: u64,
        result: Result<Vec<Appointment>, String>,
    },
    /// Unfiltered calendar snapshot completed
    CalendarLoaded {
        request: u64,
        result: Result<Vec<Appointment>, String>,
    },
    /// Tab fetch was superseded before it resolved
    FetchCancelled { request: u64 },
    /// Status update completed
    StatusUpdated {
        id: String,
        result: Result<Appointment, String>,
    },
}
