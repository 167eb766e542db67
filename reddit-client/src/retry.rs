use sorter_core::{CoreError, ErrorExt};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Base delay for exponential backoff (in milliseconds)
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds)
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Maximum jitter factor (0.0 to 1.0)
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

impl RetryConfig {
    /// Retry config sized for the Reddit API
    pub fn reddit() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 2000,
            max_delay_ms: 60000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.2, // 20% jitter to prevent thundering herd
        }
    }
}

/// Calculate delay with exponential backoff and jitter
pub fn backoff_delay(attempt: u32, config: &RetryConfig) -> Duration {
    let multiplier = config.backoff_multiplier.powi(attempt as i32);
    let delay_ms = ((config.base_delay_ms as f64) * multiplier) as u64;
    let capped_ms = delay_ms.min(config.max_delay_ms);

    let jitter_span = (capped_ms as f64 * config.jitter_factor) as u64;
    let jitter_ms = if jitter_span == 0 {
        0
    } else {
        fastrand::u64(0..=jitter_span)
    };

    Duration::from_millis((capped_ms + jitter_ms).min(config.max_delay_ms))
}

/// Wraps remote calls with bounded retry.
///
/// Retryability is decided by `ErrorExt`; rate-limit errors wait the
/// server-provided delay instead of the computed backoff. The last error is
/// returned unchanged once attempts run out.
#[derive(Debug)]
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub async fn execute<F, Fut, T>(&self, operation_name: &str, operation: F) -> Result<T, CoreError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        info!("{} succeeded after {} retries", operation_name, attempt);
                    }
                    return Ok(value);
                }
                Err(error) => {
                    let attempts_left = attempt + 1 < self.config.max_attempts;
                    if !error.is_retryable() || !attempts_left {
                        return Err(error);
                    }

                    let delay = error
                        .retry_after()
                        .unwrap_or_else(|| backoff_delay(attempt, &self.config));
                    warn!(
                        "{} failed (attempt {}): {}; retrying in {:?}",
                        operation_name,
                        attempt + 1,
                        error,
                        delay
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
