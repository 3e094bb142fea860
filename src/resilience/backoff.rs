//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Delay before retrying after the attempt with 0-based index `attempt`.
///
/// `base × 2^attempt` plus a uniform jitter in `[0, jitter_ms)`.
pub fn calculate_backoff(attempt: u32, base: Duration, jitter_ms: u64) -> Duration {
    let base_ms = base.as_millis().min(u64::MAX as u128) as u64;
    let exponential = 2u64.saturating_pow(attempt);
    let delay_ms = base_ms.saturating_mul(exponential);

    let jitter = if jitter_ms > 0 {
        rand::thread_rng().gen_range(0..jitter_ms)
    } else {
        0
    };

    Duration::from_millis(delay_ms.saturating_add(jitter))
}
