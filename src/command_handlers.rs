//! Command handlers module
//!
//! Async operations the dashboard dispatches. Each handler owns a cheap
//! clone of the service handle so it can move into a spawned task.

use chrono::NaiveDate;
use log::info;
use std::sync::Arc;

use crate::error::AppResult;
use crate::models::{Appointment, AppointmentQuery, StatusAction, Tab};
use crate::service::AppointmentService;
use crate::utils::retry::{retry_with_exponential_backoff, RetryConfig};

#[derive(Clone)]
pub struct AppointmentHandlers {
    service: Arc<dyn AppointmentService>,
    retry: RetryConfig,
}

impl AppointmentHandlers {
    pub fn new(service: Arc<dyn AppointmentService>, retry: RetryConfig) -> Self {
        Self { service, retry }
    }

    async fn fetch(&self, query: AppointmentQuery) -> AppResult<Vec<Appointment>> {
        retry_with_exponential_backoff(&self.retry, || {
            let service = self.service.clone();
            let query = query.clone();
            async move { service.fetch_appointments(query).await }
        })
        .await
    }

    /// Records for `tab`: the tab's service query, then its local date rule.
    pub async fn load_tab(
        &self,
        tab: Tab,
        today: NaiveDate,
        selected: NaiveDate,
    ) -> AppResult<Vec<Appointment>> {
        let records = self.fetch(tab.query(today, selected)).await?;
        let records = tab.restrict(records, today, selected);
        info!("Loaded {} appointments for {} tab", records.len(), tab);
        Ok(records)
    }

    /// Every record, unfiltered, for the calendar markers.
    pub async fn load_calendar(&self) -> AppResult<Vec<Appointment>> {
        self.fetch(AppointmentQuery::all()).await
    }

    /// Status updates are not retried.
    pub async fn apply_action(&self, id: &str, action: StatusAction) -> AppResult<Appointment> {
        info!("{} requested for appointment {}", action.label(), id);
        self.service.update_status(id, action.target_status()).await
    }
}
