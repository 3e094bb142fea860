//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap a single network attempt with a deadline
//! - Cancel the in-flight attempt on expiry
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; dropping the future aborts the request
//! - Timeout errors are distinct from other transport errors (status 408)

use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::client::error::{ApiClientError, ApiResult};

/// Run `fut` with a deadline, mapping expiry to a timeout error.
pub async fn with_timeout<T, F>(duration: Duration, fut: F) -> ApiResult<T>
where
    F: Future<Output = ApiResult<T>>,
{
    match timeout(duration, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout = ?duration, "Request timed out");
            Err(ApiClientError::timeout())
        }
    }
}
