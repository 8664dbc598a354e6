//! Appointment service adapter
//!
//! The controller only talks to [`AppointmentService`]. The in-memory
//! implementation simulates network latency over an [`AppointmentStore`];
//! an HTTP backend exposing `GET /appointments?date=` and
//! `PATCH /appointments/{id}` would implement the same trait.

use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::error::{AppError, AppResult};
use crate::models::{Appointment, AppointmentQuery, AppointmentStatus};
use crate::store::AppointmentStore;
use crate::utils::logging::{log_fetch, log_status_change};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    pub service: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentService: Send + Sync {
    /// Records matching `query`, in store order.
    async fn fetch_appointments(&self, query: AppointmentQuery) -> AppResult<Vec<Appointment>>;

    /// Overwrites the status of `id` and returns the updated record.
    /// Fails with `NotFound` when no record has that id.
    async fn update_status(&self, id: &str, status: AppointmentStatus) -> AppResult<Appointment>;

    async fn health(&self) -> ServiceHealth;
}

/// Simulated round-trip times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceLatency {
    pub fetch: Duration,
    pub update: Duration,
}

impl Default for ServiceLatency {
    fn default() -> Self {
        Self {
            fetch: Duration::from_millis(300),
            update: Duration::from_millis(200),
        }
    }
}

impl ServiceLatency {
    pub fn none() -> Self {
        Self {
            fetch: Duration::ZERO,
            update: Duration::ZERO,
        }
    }
}

#[derive(Clone, Debug)]
pub struct InMemoryAppointmentService {
    store: AppointmentStore,
    latency: ServiceLatency,
}

impl InMemoryAppointmentService {
    pub fn new(store: AppointmentStore, latency: ServiceLatency) -> Self {
        Self { store, latency }
    }

    pub fn store(&self) -> &AppointmentStore {
        &self.store
    }

    async fn simulate(delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl AppointmentService for InMemoryAppointmentService {
    async fn fetch_appointments(&self, query: AppointmentQuery) -> AppResult<Vec<Appointment>> {
        let started = Instant::now();
        Self::simulate(self.latency.fetch).await;

        let records = self.store.snapshot(&query).await;
        log_fetch(&query, records.len(), started.elapsed().as_millis() as u64);
        Ok(records)
    }

    async fn update_status(&self, id: &str, status: AppointmentStatus) -> AppResult<Appointment> {
        Self::simulate(self.latency.update).await;

        match self.store.set_status(id, status.clone()).await {
            Some(updated) => {
                log_status_change(id, &status);
                Ok(updated)
            }
            None => {
                warn!("Status update for unknown appointment '{}'", id);
                Err(AppError::not_found(format!("Appointment {}", id)))
            }
        }
    }

    async fn health(&self) -> ServiceHealth {
        debug!("Health check");
        ServiceHealth {
            status: "healthy".to_string(),
            service: "Appointment Management API".to_string(),
        }
    }
}
