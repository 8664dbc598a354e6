// file: src/store/mod.rs

use chrono::Utc;
use log::{debug, info};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::{Appointment, AppointmentQuery, AppointmentStatus};

const SEED: &str = include_str!("seed.json");

/// Seed files may be a bare array or the `{"appointments": [...]}` shape the
/// HTTP backend responds with.
#[derive(Deserialize)]
#[serde(untagged)]
enum SeedDocument {
    Bare(Vec<Appointment>),
    Envelope { appointments: Vec<Appointment> },
}

impl SeedDocument {
    fn into_records(self) -> Vec<Appointment> {
        match self {
            SeedDocument::Bare(records) => records,
            SeedDocument::Envelope { appointments } => appointments,
        }
    }
}

/// In-memory appointment records.
///
/// Cloning shares the same records. Writers take the write half of the lock,
/// so status updates never interleave.
#[derive(Clone, Debug)]
pub struct AppointmentStore {
    records: Arc<RwLock<Vec<Appointment>>>,
}

impl AppointmentStore {
    /// The built-in front-desk dataset.
    pub fn seeded() -> AppResult<Self> {
        Self::from_json(SEED)
    }

    pub fn from_records(records: Vec<Appointment>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                return Err(AppError::invalid_input(format!(
                    "Duplicate appointment id '{}'",
                    record.id
                )));
            }
        }

        debug!("Store initialised with {} appointments", records.len());
        Ok(Self {
            records: Arc::new(RwLock::new(records)),
        })
    }

    pub fn from_json(json: &str) -> AppResult<Self> {
        let document: SeedDocument = serde_json::from_str(json)?;
        Self::from_records(document.into_records())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        info!("Loading appointments from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Clones of the matching records, in store order.
    pub async fn snapshot(&self, query: &AppointmentQuery) -> Vec<Appointment> {
        let records = self.records.read().await;
        records
            .iter()
            .filter(|record| query.matches(record))
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: &str) -> Option<Appointment> {
        let records = self.records.read().await;
        records.iter().find(|record| record.id == id).cloned()
    }

    /// Overwrites the status of one record. Returns `None` and touches nothing
    /// when the id is unknown.
    pub async fn set_status(&self, id: &str, status: AppointmentStatus) -> Option<Appointment> {
        let mut records = self.records.write().await;
        let record = records.iter_mut().find(|record| record.id == id)?;
        record.status = status;
        record.updated_at = Some(Utc::now());
        Some(record.clone())
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}
