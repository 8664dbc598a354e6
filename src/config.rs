//! Configuration module
//!
//! Settings come from `FRONTDESK_*` environment variables; every one has a
//! default so the dashboard runs with an empty environment.

use chrono::NaiveDate;
use log::info;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::calendar::{Clock, FixedClock, SystemClock};
use crate::error::{AppError, AppResult};
use crate::models::DATE_FORMAT;
use crate::service::ServiceLatency;
use crate::utils::retry::RetryConfig;

pub const FETCH_LATENCY_VAR: &str = "FRONTDESK_FETCH_LATENCY_MS";
pub const UPDATE_LATENCY_VAR: &str = "FRONTDESK_UPDATE_LATENCY_MS";
pub const FETCH_RETRIES_VAR: &str = "FRONTDESK_FETCH_RETRIES";
pub const SEED_FILE_VAR: &str = "FRONTDESK_SEED_FILE";
pub const TODAY_VAR: &str = "FRONTDESK_TODAY";

const MAX_LATENCY: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub latency: ServiceLatency,
    pub retry: RetryConfig,
    /// JSON seed replacing the built-in records.
    pub seed_file: Option<PathBuf>,
    /// Pinned "today" instead of the local clock.
    pub today: Option<NaiveDate>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            latency: ServiceLatency::default(),
            retry: RetryConfig::default(),
            seed_file: None,
            today: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(ms) = read_number(FETCH_LATENCY_VAR)? {
            config.latency.fetch = Duration::from_millis(ms);
        }
        if let Some(ms) = read_number(UPDATE_LATENCY_VAR)? {
            config.latency.update = Duration::from_millis(ms);
        }
        if let Some(attempts) = read_number(FETCH_RETRIES_VAR)? {
            config.retry.max_attempts = u32::try_from(attempts)
                .map_err(|_| AppError::config(format!("{} is too large", FETCH_RETRIES_VAR)))?;
        }
        if let Some(path) = read_var(SEED_FILE_VAR) {
            config.seed_file = Some(PathBuf::from(path));
        }
        if let Some(raw) = read_var(TODAY_VAR) {
            let today = NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|e| {
                AppError::config(format!("{} must be YYYY-MM-DD, got '{}': {}", TODAY_VAR, raw, e))
            })?;
            config.today = Some(today);
        }

        validate_config(&config)?;
        Ok(config)
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        match self.today {
            Some(date) => Arc::new(FixedClock(date)),
            None => Arc::new(SystemClock),
        }
    }
}

fn read_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn read_number(name: &str) -> AppResult<Option<u64>> {
    match read_var(name) {
        Some(raw) => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|e| {
                AppError::config(format!(
                    "{} must be a whole number, got '{}': {}",
                    name, raw, e
                ))
            }),
        None => Ok(None),
    }
}

/// Validates application configuration
///
/// # Returns
///
/// * `Ok(())` - configuration is usable
/// * `Err(AppError::Config)` - a value is out of range
///
pub fn validate_config(config: &AppConfig) -> AppResult<()> {
    if config.retry.max_attempts == 0 {
        return Err(AppError::config(format!("{} must be at least 1", FETCH_RETRIES_VAR)));
    }
    if config.latency.fetch > MAX_LATENCY || config.latency.update > MAX_LATENCY {
        return Err(AppError::config("Simulated latency must not exceed 60 seconds"));
    }
    if let Some(path) = &config.seed_file {
        if !path.is_file() {
            return Err(AppError::config(format!(
                "Seed file {} does not exist",
                path.display()
            )));
        }
    }

    info!(
        "Configuration: fetch latency {:?}, update latency {:?}, {} fetch attempts",
        config.latency.fetch, config.latency.update, config.retry.max_attempts
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for name in [
            FETCH_LATENCY_VAR,
            UPDATE_LATENCY_VAR,
            FETCH_RETRIES_VAR,
            SEED_FILE_VAR,
            TODAY_VAR,
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_with_empty_environment() {
        clear_env();
        let config = AppConfig::from_env().unwrap();

        assert_eq!(config.latency, ServiceLatency::default());
        assert_eq!(config.retry.max_attempts, 3);
        assert!(config.seed_file.is_none());
        assert!(config.today.is_none());
    }

    #[test]
    #[serial]
    fn test_reads_overrides() {
        clear_env();
        env::set_var(FETCH_LATENCY_VAR, "0");
        env::set_var(UPDATE_LATENCY_VAR, "50");
        env::set_var(FETCH_RETRIES_VAR, "5");
        env::set_var(TODAY_VAR, "2025-12-10");

        let config = AppConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.latency.fetch, Duration::ZERO);
        assert_eq!(config.latency.update, Duration::from_millis(50));
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.today, NaiveDate::from_ymd_opt(2025, 12, 10));
        assert_eq!(config.clock().today(), NaiveDate::from_ymd_opt(2025, 12, 10).unwrap());
    }

    #[test]
    #[serial]
    fn test_rejects_bad_values() {
        clear_env();
        env::set_var(TODAY_VAR, "10/12/2025");
        assert!(matches!(AppConfig::from_env(), Err(AppError::Config(_))));

        clear_env();
        env::set_var(FETCH_RETRIES_VAR, "0");
        assert!(matches!(AppConfig::from_env(), Err(AppError::Config(_))));

        clear_env();
        env::set_var(FETCH_LATENCY_VAR, "soon");
        assert!(matches!(AppConfig::from_env(), Err(AppError::Config(_))));

        clear_env();
        env::set_var(SEED_FILE_VAR, "/definitely/not/here.json");
        assert!(matches!(AppConfig::from_env(), Err(AppError::Config(_))));
        clear_env();
    }

    #[test]
    fn test_latency_cap() {
        let mut config = AppConfig::default();
        config.latency.update = Duration::from_secs(120);
        assert!(validate_config(&config).is_err());
    }
}
