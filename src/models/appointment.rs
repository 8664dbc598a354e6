// file: src/models/appointment.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, AppResult};

/// Lifecycle status of an appointment.
///
/// Values outside the five known ones are kept verbatim in `Other` so a
/// record from a newer backend survives a round trip untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    Confirmed,
    Scheduled,
    Upcoming,
    Completed,
    Cancelled,
    Other(String),
}

impl AppointmentStatus {
    /// Known statuses in the order the status dropdown lists them.
    pub const KNOWN: [AppointmentStatus; 5] = [
        AppointmentStatus::Confirmed,
        AppointmentStatus::Scheduled,
        AppointmentStatus::Upcoming,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Upcoming => "Upcoming",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::Other(raw) => raw,
        }
    }

    /// No further transition is offered from a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled
        )
    }
}

impl From<&str> for AppointmentStatus {
    fn from(value: &str) -> Self {
        match value {
            "Confirmed" => AppointmentStatus::Confirmed,
            "Scheduled" => AppointmentStatus::Scheduled,
            "Upcoming" => AppointmentStatus::Upcoming,
            "Completed" => AppointmentStatus::Completed,
            "Cancelled" => AppointmentStatus::Cancelled,
            other => AppointmentStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for AppointmentStatus {
    fn from(value: String) -> Self {
        AppointmentStatus::from(value.as_str())
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        match status {
            AppointmentStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the patient attends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentMode {
    #[serde(rename = "In-Person")]
    InPerson,
    #[serde(rename = "Video Call")]
    VideoCall,
}

impl AppointmentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentMode::InPerson => "In-Person",
            AppointmentMode::VideoCall => "Video Call",
        }
    }
}

impl fmt::Display for AppointmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentMode {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "in-person" | "in person" => Ok(AppointmentMode::InPerson),
            "video call" | "video" => Ok(AppointmentMode::VideoCall),
            _ => Err(AppError::invalid_input(format!(
                "Unknown mode '{}'. Expected In-Person or Video Call",
                s
            ))),
        }
    }
}

/// Front-desk actions on a non-terminal appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    Confirm,
    Cancel,
}

impl StatusAction {
    pub fn target_status(&self) -> AppointmentStatus {
        match self {
            StatusAction::Confirm => AppointmentStatus::Confirmed,
            StatusAction::Cancel => AppointmentStatus::Cancelled,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusAction::Confirm => "Confirm",
            StatusAction::Cancel => "Cancel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub patient_name: String,
    pub date: NaiveDate,
    /// Display string such as `09:00 AM`; never used for ordering.
    pub time: String,
    /// Minutes.
    pub duration: u32,
    pub doctor_name: String,
    pub status: AppointmentStatus,
    pub mode: AppointmentMode,
    #[serde(rename = "type")]
    pub visit_type: String,
    pub description: String,
    pub patient_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Appointment {
    pub fn is_today(&self, today: NaiveDate) -> bool {
        self.date == today
    }

    /// Today's appointments count as upcoming.
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.date >= today
    }

    pub fn is_past(&self, today: NaiveDate) -> bool {
        self.date < today
    }

    pub fn available_actions(&self) -> &'static [StatusAction] {
        if self.status.is_terminal() {
            &[]
        } else {
            &[StatusAction::Confirm, StatusAction::Cancel]
        }
    }

    pub fn allows(&self, action: StatusAction) -> bool {
        self.available_actions().contains(&action)
    }

    /// Case-insensitive substring match on patient or doctor name.
    pub fn matches_search(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.patient_name.to_lowercase().contains(&needle)
            || self.doctor_name.to_lowercase().contains(&needle)
    }

    /// First letter of the patient name, used as an avatar.
    pub fn initial(&self) -> char {
        self.patient_name.chars().next().unwrap_or('?')
    }
}
