use log::{debug, info, warn};
use std::time::Duration;

use crate::error::AppResult;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Single attempt, no waiting.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    fn next_delay(&self, delay: Duration) -> Duration {
        std::cmp::min(
            Duration::from_millis((delay.as_millis() as f64 * self.backoff_multiplier) as u64),
            self.max_delay,
        )
    }
}

/// Runs `operation` until it succeeds, fails with a non-transient error,
/// or `max_attempts` is used up. The last error is returned as-is.
pub async fn retry_with_exponential_backoff<T, F, Fut>(
    config: &RetryConfig,
    operation: F,
) -> AppResult<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = AppResult<T>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut delay = config.base_delay;
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    info!("Operation succeeded on attempt {}", attempt);
                }
                return Ok(value);
            }
            Err(e) if !e.is_transient() => {
                debug!("Attempt {} failed with non-transient error, not retrying: {}", attempt, e);
                return Err(e);
            }
            Err(e) if attempt >= max_attempts => {
                warn!("Operation failed after {} attempts: {}", max_attempts, e);
                return Err(e);
            }
            Err(e) => {
                debug!("Attempt {} failed transiently, retrying in {:?}: {}", attempt, delay, e);
                tokio::time::sleep(delay).await;
                delay = config.next_delay(delay);
                attempt += 1;
            }
        }
    }
}
