// src/ui/mod.rs
// Plain-text rendering of the dashboard for the terminal front end

use chrono::NaiveDate;
use std::fmt::Write;

use crate::calendar::MonthCell;
use crate::dashboard::Dashboard;
use crate::models::{Appointment, AppointmentStatus, Tab};

pub mod input;

pub use input::{parse_command, Input, HELP};

/// Numbers for the two summary cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub confirmed: usize,
    pub label: String,
}

impl DashboardStats {
    pub fn new(visible: &[&Appointment], tab: Tab, selected: NaiveDate) -> Self {
        let label = match tab {
            Tab::Date => format!("Total Appointments on {}", selected),
            other => format!("Total {} Appointments", other),
        };
        Self {
            total: visible.len(),
            confirmed: visible
                .iter()
                .filter(|a| a.status == AppointmentStatus::Confirmed)
                .count(),
            label,
        }
    }
}

pub fn empty_hint(filters_active: bool) -> &'static str {
    if filters_active {
        "Try adjusting your filters."
    } else {
        "Try selecting a different date."
    }
}

pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    let state = dashboard.state();

    let stats = dashboard.stats();
    let _ = writeln!(out, "== Appointment Management ==");
    let _ = writeln!(
        out,
        "{} {} | {} Confirmed Appointments",
        stats.total, stats.label, stats.confirmed
    );
    out.push('\n');

    let month = &state.current_month;
    out.push_str(&render_calendar(
        &month.title(),
        month.leading_blanks(),
        &dashboard.calendar_cells(),
    ));
    out.push('\n');

    out.push_str(&render_tabs(state.active_tab, state.selected_date));
    let _ = writeln!(
        out,
        "search: \"{}\"  status: {}  mode: {}",
        state.filters.search, state.filters.status, state.filters.mode
    );
    if let Some(notice) = &state.notice {
        let prefix = if notice.is_error() { "!" } else { "*" };
        let _ = writeln!(out, "{} {}", prefix, notice.text());
    }
    out.push('\n');

    if dashboard.is_loading() {
        let _ = writeln!(out, "Loading appointments...");
        return out;
    }

    let visible = dashboard.visible_appointments();
    if visible.is_empty() {
        let _ = writeln!(out, "No appointments found");
        let _ = writeln!(out, "{}", dashboard.empty_hint());
    } else {
        for appointment in visible {
            out.push_str(&render_appointment(appointment));
        }
    }
    out
}

pub fn render_tabs(active: Tab, selected: NaiveDate) -> String {
    let mut labels: Vec<String> = Tab::BAR
        .iter()
        .map(|tab| {
            if *tab == active {
                format!("[{}]", tab)
            } else {
                tab.to_string()
            }
        })
        .collect();
    if active == Tab::Date {
        labels.push(format!("[{}]", selected));
    }
    format!("{}\n", labels.join("  "))
}

/// Sunday-first month grid. Marker letters sit after the day number and
/// are hidden on the highlighted day, which is bracketed instead.
pub fn render_calendar(title: &str, leading_blanks: u32, cells: &[MonthCell]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, " Su   Mo   Tu   We   Th   Fr   Sa");

    let mut column = 0;
    for _ in 0..leading_blanks {
        out.push_str("     ");
        column += 1;
    }
    for cell in cells {
        let text = if cell.selected {
            format!("[{:>2}]", cell.day)
        } else {
            let mark = cell.marker.map(|m| m.symbol()).unwrap_or(' ');
            format!(" {:>2}{}", cell.day, mark)
        };
        let _ = write!(out, "{:<5}", text);
        column += 1;
        if column % 7 == 0 {
            out.push('\n');
        }
    }
    if column % 7 != 0 {
        out.push('\n');
    }
    out
}

pub fn render_appointment(appointment: &Appointment) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "({}) {} [{}] #{}",
        appointment.initial(),
        appointment.patient_name,
        appointment.status.as_str().to_uppercase(),
        appointment.id
    );
    let _ = writeln!(
        out,
        "    {} {} | {} min | {} | {}",
        appointment.date,
        appointment.time,
        appointment.duration,
        appointment.mode,
        appointment.doctor_name
    );
    let _ = writeln!(
        out,
        "    {}: {} <{}>",
        appointment.visit_type, appointment.description, appointment.patient_email
    );
    let actions = appointment.available_actions();
    if !actions.is_empty() {
        let labels: Vec<String> = actions
            .iter()
            .map(|action| format!("{} {}", action.label().to_lowercase(), appointment.id))
            .collect();
        let _ = writeln!(out, "    actions: {}", labels.join(" | "));
    }
    out
}
