//! Dashboard controller
//!
//! Owns the UI state and the last results the service returned, and turns
//! each [`Message`] into state changes plus follow-up [`Task`]s.
//!
//! List fetches are last-issued-wins: every fetch gets a request number,
//! issuing a new one cancels the previous one's token, and a result whose
//! number is not the latest is dropped. Calendar snapshots are numbered the
//! same way.

use chrono::{NaiveDate, Utc};
use log::{debug, error, info, warn};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::calendar::{day_marker, month_grid, CalendarMonth, Clock, DayMarker, MonthCell};
use crate::command_handlers::AppointmentHandlers;
use crate::messages::Message;
use crate::models::{Appointment, AppointmentMode, StatusAction, Tab};
use crate::service::AppointmentService;
use crate::ui::DashboardStats;
use crate::ui_state::{Notice, UiState};
use crate::utils::retry::RetryConfig;

/// Deferred work resolving to the next message.
pub type Task = Pin<Box<dyn Future<Output = Message> + Send + 'static>>;

pub struct Dashboard {
    handlers: AppointmentHandlers,
    clock: Arc<dyn Clock>,
    state: UiState,

    /// Latest tab result, before the search/status/mode pass
    appointments: Vec<Appointment>,
    /// Unfiltered records backing the calendar markers
    calendar_source: Vec<Appointment>,

    next_request: u64,
    latest_fetch: u64,
    latest_calendar: u64,
    fetch_cancel: Option<CancellationToken>,
}

impl Dashboard {
    /// Builds the dashboard on the Today tab and returns the start-up fetches.
    pub fn new(
        service: Arc<dyn AppointmentService>,
        clock: Arc<dyn Clock>,
        retry: RetryConfig,
    ) -> (Self, Vec<Task>) {
        let today = clock.today();
        let mut dashboard = Self {
            handlers: AppointmentHandlers::new(service, retry),
            clock,
            state: UiState::new(today),
            appointments: Vec::new(),
            calendar_source: Vec::new(),
            next_request: 0,
            latest_fetch: 0,
            latest_calendar: 0,
            fetch_cancel: None,
        };

        info!("Dashboard starting on {} (today is {})", Tab::Today, today);
        let tasks = vec![dashboard.issue_fetch(), dashboard.issue_calendar_fetch()];
        (dashboard, tasks)
    }

    pub fn update(&mut self, message: Message) -> Vec<Task> {
        match message {
            Message::TabSelected(tab) => {
                self.state.active_tab = tab;
                self.state.filters.search.clear();
                if tab == Tab::Today {
                    let today = self.today();
                    self.state.selected_date = today;
                    self.state.current_month = CalendarMonth::containing(today);
                }
                vec![self.issue_fetch()]
            }
            Message::DaySelected(day) => match self.state.current_month.date_for_day(day) {
                Some(date) => {
                    self.state.selected_date = date;
                    self.state.active_tab = Tab::Date;
                    vec![self.issue_fetch()]
                }
                None => {
                    warn!("Day {} is not in {}", day, self.state.current_month.title());
                    self.state.notice = Some(Notice::Error(format!(
                        "{} has no day {}",
                        self.state.current_month.title(),
                        day
                    )));
                    Vec::new()
                }
            },
            Message::MonthChanged(delta) => {
                self.state.current_month = self.state.current_month.shift(delta);
                Vec::new()
            }
            Message::SearchChanged(text) => {
                self.state.filters.search = text;
                Vec::new()
            }
            Message::StatusFilterChanged(choice) => {
                self.state.filters.status = choice;
                Vec::new()
            }
            Message::ModeFilterChanged(choice) => {
                self.state.filters.mode = choice;
                Vec::new()
            }
            Message::StatusActionRequested { id, action } => self.request_action(id, action),
            Message::AppointmentsLoaded { request, result } => {
                if request != self.latest_fetch {
                    debug!("Discarding stale fetch {} (latest is {})", request, self.latest_fetch);
                    return Vec::new();
                }
                self.state.loading = false;
                self.fetch_cancel = None;
                match result {
                    Ok(records) => {
                        self.appointments = records;
                        self.state.last_refresh = Some(Utc::now());
                        if self.state.notice.as_ref().is_some_and(Notice::is_error) {
                            self.state.notice = None;
                        }
                    }
                    Err(e) => {
                        // Keep showing the previous list
                        error!("Fetch {} failed: {}", request, e);
                        self.state.notice =
                            Some(Notice::Error(format!("Could not load appointments: {}", e)));
                    }
                }
                Vec::new()
            }
            Message::CalendarLoaded { request, result } => {
                if request != self.latest_calendar {
                    debug!("Discarding stale calendar snapshot {}", request);
                    return Vec::new();
                }
                match result {
                    Ok(records) => self.calendar_source = records,
                    Err(e) => error!("Calendar snapshot {} failed: {}", request, e),
                }
                Vec::new()
            }
            Message::FetchCancelled { request } => {
                debug!("Fetch {} cancelled", request);
                Vec::new()
            }
            Message::StatusUpdated { id, result } => {
                match result {
                    Ok(updated) => {
                        self.state.notice = Some(Notice::Info(format!(
                            "Appointment {} updated to {}",
                            updated.id, updated.status
                        )));
                    }
                    Err(e) => {
                        warn!("Status update for {} failed: {}", id, e);
                        self.state.notice = Some(Notice::Error(e));
                    }
                }
                // Same tab, same filter context as before the action
                vec![self.issue_fetch(), self.issue_calendar_fetch()]
            }
        }
    }

    /// Applies `message` and awaits every resulting task in order, feeding
    /// their messages back in, until nothing is left outstanding.
    pub async fn perform(&mut self, message: Message) {
        let tasks = self.update(message);
        self.settle(tasks).await;
    }

    pub async fn settle(&mut self, tasks: Vec<Task>) {
        let mut queue: VecDeque<Task> = tasks.into();
        while let Some(task) = queue.pop_front() {
            let message = task.await;
            queue.extend(self.update(message));
        }
    }

    fn request_action(&mut self, id: String, action: StatusAction) -> Vec<Task> {
        let known = self
            .appointments
            .iter()
            .chain(self.calendar_source.iter())
            .find(|a| a.id == id);

        if let Some(appointment) = known {
            if !appointment.allows(action) {
                warn!(
                    "{} refused for appointment {}: status is {}",
                    action.label(),
                    id,
                    appointment.status
                );
                self.state.notice = Some(Notice::Error(format!(
                    "Appointment {} is {} and can no longer be changed",
                    id, appointment.status
                )));
                return Vec::new();
            }
        }

        let handlers = self.handlers.clone();
        let task: Task = Box::pin(async move {
            let result = handlers
                .apply_action(&id, action)
                .await
                .map_err(|e| e.to_safe_string());
            Message::StatusUpdated { id, result }
        });
        vec![task]
    }

    fn issue_fetch(&mut self) -> Task {
        if let Some(previous) = self.fetch_cancel.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        self.fetch_cancel = Some(token.clone());

        self.next_request += 1;
        let request = self.next_request;
        self.latest_fetch = request;
        self.state.loading = true;

        let tab = self.state.active_tab;
        let today = self.today();
        let selected = self.state.selected_date;
        let handlers = self.handlers.clone();
        debug!("Issuing fetch {} for {} tab", request, tab);

        Box::pin(async move {
            tokio::select! {
                _ = token.cancelled() => Message::FetchCancelled { request },
                result = handlers.load_tab(tab, today, selected) => Message::AppointmentsLoaded {
                    request,
                    result: result.map_err(|e| e.to_safe_string()),
                },
            }
        })
    }

    fn issue_calendar_fetch(&mut self) -> Task {
        self.next_request += 1;
        let request = self.next_request;
        self.latest_calendar = request;

        let handlers = self.handlers.clone();
        Box::pin(async move {
            let result = handlers
                .load_calendar()
                .await
                .map_err(|e| e.to_safe_string());
            Message::CalendarLoaded { request, result }
        })
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    /// The active tab's records, before search/status/mode.
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// What the list shows: the tab's records through the filter pass.
    pub fn visible_appointments(&self) -> Vec<&Appointment> {
        self.state.filters.apply(&self.appointments)
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats::new(
            &self.visible_appointments(),
            self.state.active_tab,
            self.state.selected_date,
        )
    }

    /// Hint for an empty list.
    pub fn empty_hint(&self) -> &'static str {
        crate::ui::empty_hint(self.state.filters.is_active())
    }

    pub fn marker_for(&self, date: NaiveDate) -> Option<DayMarker> {
        day_marker(&self.calendar_source, date)
    }

    pub fn calendar_cells(&self) -> Vec<MonthCell> {
        month_grid(
            &self.state.current_month,
            &self.calendar_source,
            self.state.highlighted_date(),
        )
    }

    /// Distinct modes in the unfiltered records, first-seen order.
    pub fn mode_options(&self) -> Vec<AppointmentMode> {
        let mut modes = Vec::new();
        for appointment in &self.calendar_source {
            if !modes.contains(&appointment.mode) {
                modes.push(appointment.mode);
            }
        }
        modes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FixedClock;
    use crate::error::AppError;
    use crate::models::{AppointmentStatus, FilterChoice};
    use crate::service::{InMemoryAppointmentService, MockAppointmentService, ServiceLatency};
    use crate::store::AppointmentStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 10).unwrap()
    }

    fn ids(records: &[&Appointment]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    async fn seeded_dashboard() -> Dashboard {
        let store = AppointmentStore::seeded().unwrap();
        let service = InMemoryAppointmentService::new(store, ServiceLatency::none());
        let (mut dashboard, tasks) =
            Dashboard::new(Arc::new(service), Arc::new(FixedClock(today())), RetryConfig::none());
        dashboard.settle(tasks).await;
        dashboard
    }

    #[tokio::test]
    async fn test_starts_on_today() {
        let dashboard = seeded_dashboard().await;

        assert_eq!(dashboard.state().active_tab, Tab::Today);
        assert!(!dashboard.is_loading());
        assert_eq!(ids(&dashboard.visible_appointments()), vec!["1", "2", "3"]);
        assert_eq!(
            dashboard.mode_options(),
            vec![AppointmentMode::InPerson, AppointmentMode::VideoCall]
        );
    }

    #[tokio::test]
    async fn test_search_and_status_are_conjunctive() {
        let mut dashboard = seeded_dashboard().await;
        dashboard.perform(Message::TabSelected(Tab::All)).await;
        dashboard.perform(Message::SearchChanged("Sandeep".to_string())).await;
        dashboard
            .perform(Message::StatusFilterChanged(FilterChoice::Only(AppointmentStatus::Scheduled)))
            .await;

        assert_eq!(ids(&dashboard.visible_appointments()), vec!["2"]);
        assert_eq!(dashboard.empty_hint(), "Try adjusting your filters.");
    }

    #[tokio::test]
    async fn test_tab_click_clears_search() {
        let mut dashboard = seeded_dashboard().await;
        dashboard.perform(Message::SearchChanged("Dipti".to_string())).await;
        assert_eq!(dashboard.visible_appointments().len(), 1);

        dashboard.perform(Message::TabSelected(Tab::Past)).await;
        assert!(dashboard.state().filters.search.is_empty());
        assert_eq!(dashboard.visible_appointments().len(), 5);
    }

    #[tokio::test]
    async fn test_day_click_switches_to_date_tab() {
        let mut dashboard = seeded_dashboard().await;
        dashboard.perform(Message::DaySelected(7)).await;

        assert_eq!(dashboard.state().active_tab, Tab::Date);
        assert_eq!(dashboard.state().selected_date, NaiveDate::from_ymd_opt(2025, 12, 7).unwrap());
        assert_eq!(ids(&dashboard.visible_appointments()), vec!["8", "9"]);
        assert_eq!(dashboard.stats().label, "Total Appointments on 2025-12-07");
    }

    #[tokio::test]
    async fn test_today_tab_resets_date_and_month() {
        let mut dashboard = seeded_dashboard().await;
        dashboard.perform(Message::MonthChanged(2)).await;
        dashboard.perform(Message::DaySelected(3)).await;
        assert_eq!(dashboard.state().selected_date, NaiveDate::from_ymd_opt(2026, 2, 3).unwrap());
        assert!(dashboard.visible_appointments().is_empty());
        assert_eq!(dashboard.empty_hint(), "Try selecting a different date.");

        dashboard.perform(Message::TabSelected(Tab::Today)).await;
        assert_eq!(dashboard.state().selected_date, today());
        assert_eq!(dashboard.state().current_month.month(), 12);
        assert_eq!(dashboard.visible_appointments().len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_day_is_ignored() {
        let mut dashboard = seeded_dashboard().await;
        let tasks = dashboard.update(Message::DaySelected(32));

        assert!(tasks.is_empty());
        assert_eq!(dashboard.state().active_tab, Tab::Today);
        assert!(dashboard.state().notice.as_ref().unwrap().is_error());
    }

    #[tokio::test]
    async fn test_confirm_refreshes_current_tab() {
        let mut dashboard = seeded_dashboard().await;
        dashboard
            .perform(Message::StatusActionRequested {
                id: "2".to_string(),
                action: StatusAction::Confirm,
            })
            .await;

        let second = dashboard
            .visible_appointments()
            .into_iter()
            .find(|a| a.id == "2")
            .cloned()
            .unwrap();
        assert_eq!(second.status, AppointmentStatus::Confirmed);
        assert_eq!(dashboard.state().active_tab, Tab::Today);
        assert_eq!(
            dashboard.state().notice,
            Some(Notice::Info("Appointment 2 updated to Confirmed".to_string()))
        );
    }

    #[tokio::test]
    async fn test_cancel_updates_calendar_marker() {
        let mut dashboard = seeded_dashboard().await;
        let eleventh = NaiveDate::from_ymd_opt(2025, 12, 11).unwrap();
        assert_eq!(dashboard.marker_for(eleventh), Some(DayMarker::Scheduled));

        dashboard
            .perform(Message::StatusActionRequested {
                id: "5".to_string(),
                action: StatusAction::Cancel,
            })
            .await;

        assert_eq!(dashboard.marker_for(eleventh), Some(DayMarker::Upcoming));
    }

    #[tokio::test]
    async fn test_terminal_record_refuses_action() {
        let mut dashboard = seeded_dashboard().await;
        dashboard.perform(Message::TabSelected(Tab::Past)).await;

        let tasks = dashboard.update(Message::StatusActionRequested {
            id: "6".to_string(),
            action: StatusAction::Confirm,
        });

        assert!(tasks.is_empty());
        assert!(dashboard.state().notice.as_ref().unwrap().is_error());
    }

    #[tokio::test]
    async fn test_unknown_id_reports_not_found() {
        let mut dashboard = seeded_dashboard().await;
        dashboard
            .perform(Message::StatusActionRequested {
                id: "99".to_string(),
                action: StatusAction::Cancel,
            })
            .await;

        let notice = dashboard.state().notice.clone().unwrap();
        assert_eq!(notice, Notice::Error("Not found: Appointment 99".to_string()));
        assert_eq!(dashboard.visible_appointments().len(), 3);
    }

    #[tokio::test]
    async fn test_stale_fetch_is_discarded() {
        let mut dashboard = seeded_dashboard().await;

        let mut first = dashboard.update(Message::TabSelected(Tab::Past));
        let mut second = dashboard.update(Message::TabSelected(Tab::Upcoming));

        // Newer result lands first, then the stale one
        let newer = second.remove(0).await;
        dashboard.update(newer);
        let older = first.remove(0).await;
        dashboard.update(older);

        assert_eq!(dashboard.state().active_tab, Tab::Upcoming);
        assert_eq!(
            ids(&dashboard.visible_appointments()),
            vec!["1", "2", "3", "4", "5"]
        );
        assert!(!dashboard.is_loading());
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_list() {
        let seed: Vec<Appointment> = serde_json::from_str(include_str!("store/seed.json")).unwrap();
        let mut mock = MockAppointmentService::new();
        let mut calls = 0;
        // Start-up list and calendar fetches succeed, everything after fails
        mock.expect_fetch_appointments().returning(move |query| {
            calls += 1;
            if calls <= 2 {
                Ok(seed.iter().filter(|a| query.matches(a)).cloned().collect())
            } else {
                Err(AppError::network("service unavailable"))
            }
        });

        let (mut dashboard, tasks) =
            Dashboard::new(Arc::new(mock), Arc::new(FixedClock(today())), RetryConfig::none());
        dashboard.settle(tasks).await;
        assert_eq!(dashboard.visible_appointments().len(), 3);

        dashboard.perform(Message::TabSelected(Tab::All)).await;

        assert!(!dashboard.is_loading());
        assert_eq!(dashboard.visible_appointments().len(), 3);
        let notice = dashboard.state().notice.clone().unwrap();
        assert!(notice.is_error());
        assert!(notice.text().contains("service unavailable"));
    }

    #[tokio::test]
    async fn test_successful_fetch_clears_error_notice() {
        let seed: Vec<Appointment> = serde_json::from_str(include_str!("store/seed.json")).unwrap();
        let mut mock = MockAppointmentService::new();
        let mut calls = 0;
        // Only the first tab switch after start-up fails
        mock.expect_fetch_appointments().returning(move |query| {
            calls += 1;
            if calls == 3 {
                Err(AppError::network("service unavailable"))
            } else {
                Ok(seed.iter().filter(|a| query.matches(a)).cloned().collect())
            }
        });

        let (mut dashboard, tasks) =
            Dashboard::new(Arc::new(mock), Arc::new(FixedClock(today())), RetryConfig::none());
        dashboard.settle(tasks).await;

        dashboard.perform(Message::TabSelected(Tab::All)).await;
        assert!(dashboard.state().notice.as_ref().unwrap().is_error());

        dashboard.perform(Message::TabSelected(Tab::All)).await;
        assert_eq!(dashboard.state().notice, None);
        assert_eq!(dashboard.visible_appointments().len(), 10);
    }

    #[tokio::test]
    async fn test_successful_fetch_keeps_info_notice() {
        let mut dashboard = seeded_dashboard().await;
        dashboard
            .perform(Message::StatusActionRequested {
                id: "4".to_string(),
                action: StatusAction::Confirm,
            })
            .await;

        assert_eq!(
            dashboard.state().notice,
            Some(Notice::Info("Appointment 4 updated to Confirmed".to_string()))
        );
    }
}
