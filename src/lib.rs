// Front Desk Library
// Appointment dashboard core, exposed for the terminal binary and tests

pub mod store;
pub mod models;
pub mod calendar;
pub mod service;
pub mod utils;
pub mod error;
pub mod command_handlers;
pub mod config;
pub mod dashboard;
pub mod messages;
pub mod ui;
pub mod ui_state;

// Re-export commonly used types
pub use models::*;
pub use store::AppointmentStore;
pub use service::{AppointmentService, InMemoryAppointmentService, ServiceHealth, ServiceLatency};
pub use calendar::{CalendarMonth, Clock, DayMarker, FixedClock, SystemClock};
pub use dashboard::{Dashboard, Task};
pub use messages::Message;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
