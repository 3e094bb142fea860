//! Retry logic.
//!
//! # Responsibilities
//! - Determine if a failure is retryable (by status code)
//! - Execute retries with exponential backoff + jitter
//! - Surface only the last error once attempts are exhausted
//!
//! # Design Decisions
//! - Never retry 4xx other than 429; repetition cannot fix them
//! - Transport errors, timeouts, 429 and 5xx are always retryable
//! - Unaware of the circuit breaker; the breaker wraps this loop

use std::future::Future;
use std::time::Duration;

use crate::client::error::{ApiClientError, ApiResult};
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;

/// Retry settings for one logical call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; `retries + 1` attempts in total.
    pub retries: u32,
    pub base_delay: Duration,
    pub jitter_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            base_delay: Duration::from_millis(1000),
            jitter_ms: 1000,
        }
    }
}

impl RetryPolicy {
    pub fn no_retry() -> Self {
        Self {
            retries: 0,
            ..Self::default()
        }
    }
}

/// Whether an error is worth another attempt.
pub fn is_retryable(error: &ApiClientError) -> bool {
    error.is_retryable()
}

/// Run `operation` until it succeeds, fails terminally, or runs out of attempts.
///
/// `operation` receives the 0-based attempt index.
pub async fn retry_with_backoff<T, F, Fut>(policy: RetryPolicy, mut operation: F) -> ApiResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    let mut attempt = 0;
    loop {
        let error = match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !is_retryable(&error) {
            tracing::debug!(status = error.status_code, attempt, "Non-retryable failure");
            return Err(error);
        }
        if attempt >= policy.retries {
            tracing::debug!(status = error.status_code, attempts = attempt + 1, "Retries exhausted");
            return Err(error);
        }

        let delay = calculate_backoff(attempt, policy.base_delay, policy.jitter_ms);
        tracing::info!(
            attempt = attempt + 1,
            delay = ?delay,
            status = error.status_code,
            error = %error,
            "Retrying request"
        );
        metrics::record_retry(error.status_code);
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
