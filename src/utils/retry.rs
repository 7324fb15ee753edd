//! Retry utilities with exponential backoff for search calls.
//!
//! The default configuration makes a single attempt. Raising
//! [`RetryConfig::max_attempts`] turns on retries for transient failures
//! without touching any call site.

use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::sources::SourceError;

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Initial delay between retries
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Maximum time a single attempt may take
    pub attempt_timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            attempt_timeout: Duration::from_secs(120),
        }
    }
}

impl RetryConfig {
    /// Set the maximum number of attempts
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the initial backoff delay
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Delay before retry number `attempt` (1-based count of failed attempts)
    fn backoff(&self, attempt: u32) -> Duration {
        let exp = self.initial_delay.as_secs_f64()
            * self.backoff_multiplier.powf(attempt.saturating_sub(1) as f64);
        if exp.is_nan() || exp <= 0.0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(exp.min(self.max_delay.as_secs_f64()))
    }
}

/// Transient errors that should trigger a retry
#[derive(Debug, Clone, PartialEq)]
pub enum TransientError {
    /// Network connectivity issues
    Network,
    /// Rate limit exceeded
    RateLimit,
    /// Server error (5xx)
    ServerError,
    /// Request timeout
    Timeout,
}

impl TransientError {
    /// Check if a SourceError represents a transient error
    pub fn from_source_error(err: &SourceError) -> Option<Self> {
        match err {
            SourceError::Network(_) => Some(TransientError::Network),
            SourceError::Timeout => Some(TransientError::Timeout),
            SourceError::RateLimit | SourceError::Status(429) => Some(TransientError::RateLimit),
            SourceError::Status(status) if *status >= 500 => Some(TransientError::ServerError),
            _ => None,
        }
    }

    /// Minimum delay this kind of error calls for
    pub fn minimum_delay(&self) -> Duration {
        match self {
            TransientError::RateLimit => Duration::from_secs(2),
            _ => Duration::ZERO,
        }
    }
}

/// Execute an async operation with retry logic
///
/// Permanent errors are returned immediately; transient ones are retried with
/// exponential backoff until `max_attempts` is reached.
pub async fn with_retry<T, F, Fut>(config: RetryConfig, operation: F) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, SourceError>>,
{
    let mut attempts = 0;
    let mut operation = operation;

    loop {
        attempts += 1;

        let error = match timeout(config.attempt_timeout, operation()).await {
            Ok(Ok(result)) => {
                if attempts > 1 {
                    tracing::info!(
                        "Operation succeeded on attempt {} after {} transient failures",
                        attempts,
                        attempts - 1
                    );
                }
                return Ok(result);
            }
            Ok(Err(error)) => error,
            Err(_) => SourceError::Timeout,
        };

        let Some(transient) = TransientError::from_source_error(&error) else {
            return Err(error);
        };

        if attempts >= config.max_attempts {
            if config.max_attempts > 1 {
                tracing::warn!("Operation failed after {} attempts: {}", attempts, error);
            }
            return Err(error);
        }

        let delay = std::cmp::max(config.backoff(attempts), transient.minimum_delay());
        tracing::debug!(
            "Transient error on attempt {}: {:?}, retrying in {:?}",
            attempts,
            transient,
            delay
        );
        sleep(delay).await;
    }
}
