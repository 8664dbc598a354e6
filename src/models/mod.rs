// file: src/models/mod.rs

pub mod appointment;
pub mod filter;

pub use appointment::{Appointment, AppointmentMode, AppointmentStatus, StatusAction};
pub use filter::{AppointmentQuery, FilterChoice, ListFilters, Tab, DATE_FORMAT};
