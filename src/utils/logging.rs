use env_logger::{Builder, Target};
use log::{Level, LevelFilter, SetLoggerError};
use std::env;
use std::io::Write;

use crate::error::AppError;
use crate::models::{AppointmentQuery, AppointmentStatus};

pub fn parse_level(value: &str) -> LevelFilter {
    match value.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

pub fn init_logging() -> Result<(), SetLoggerError> {
    let env = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let log_level = parse_level(&env);

    let mut builder = Builder::from_default_env();

    builder.format(|buf, record| {
        let timestamp = buf.timestamp();
        let target = record.target();
        let file = record.file().unwrap_or("unknown");
        let line = record.line().unwrap_or(0);

        match record.level() {
            Level::Info => {
                writeln!(buf, "{} [INFO] [{}]: {}", timestamp, target, record.args())
            }
            level => {
                writeln!(
                    buf,
                    "{} [{}] [{}:{}] {}: {}",
                    timestamp,
                    level,
                    file,
                    line,
                    target,
                    record.args()
                )
            }
        }
    });

    // The dashboard prints to stdout, keep logs off it
    builder.filter_level(log_level).target(Target::Stderr).try_init()
}

pub fn log_error_with_context(error: &AppError, context: &str) {
    log::error!("[{}] {}", context, error);

    let mut source = std::error::Error::source(error);
    while let Some(err) = source {
        log::error!("  Caused by: {}", err);
        source = err.source();
    }
}

pub fn log_fetch(query: &AppointmentQuery, count: usize, duration_ms: u64) {
    let date = query.date.as_deref().unwrap_or("any");
    log::debug!(
        "[Service] Fetched {} appointments (date: {}) in {}ms",
        count,
        date,
        duration_ms
    );
}

pub fn log_status_change(id: &str, status: &AppointmentStatus) {
    log::info!("[Service] Appointment {} updated to {}", id, status);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_level("error"), LevelFilter::Error);
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("verbose"), LevelFilter::Info);
    }
}
