//! Circuit breaker for backend protection.
//!
//! # States
//! - Closed: normal operation, requests pass through
//! - Open: backend assumed down, requests fail fast
//! - Half-Open: testing if backend recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive failures >= threshold
//! Open → Half-Open: time since last failure > recovery timeout
//! Half-Open → Closed: probe request succeeds
//! Half-Open → Open: probe request fails
//! ```
//!
//! # Design Decisions
//! - One breaker per client (shared by every caller of that client)
//! - Fail fast in Open state (no network attempt, 503)
//! - Single probe in Half-Open; concurrent callers are rejected until it resolves
//! - Rejections issued by the breaker itself never count as failures

use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::sync::Mutex;
use tokio::time::Instant;

use crate::client::error::{ApiClientError, ApiResult};
use crate::config::CircuitBreakerConfig;
use crate::observability::metrics;

/// Circuit state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
            CircuitState::HalfOpen => "half_open",
        }
    }
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    failures: u32,
    last_failure: Option<Instant>,
    probe_in_flight: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Admission {
    Normal,
    Probe,
}

/// Circuit breaker shared by all calls of one client.
#[derive(Debug)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    inner: Mutex<BreakerState>,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(BreakerState {
                state: CircuitState::Closed,
                failures: 0,
                last_failure: None,
                probe_in_flight: false,
            }),
        }
    }

    /// Current state.
    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    /// Consecutive failures recorded so far.
    pub fn failures(&self) -> u32 {
        self.lock().failures
    }

    /// Run `operation` through the breaker.
    ///
    /// Returns a circuit-open error without calling `operation` when the
    /// circuit is open and still cooling down, or when a half-open probe is
    /// already in flight.
    pub async fn call<T, F, Fut>(&self, operation: F) -> ApiResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let admission = self.admit()?;
        let mut guard = ProbeGuard {
            breaker: self,
            armed: admission == Admission::Probe,
        };

        let result = operation().await;
        guard.armed = false;

        match &result {
            Ok(_) => self.record_success(),
            Err(e) => self.record_failure(e),
        }
        result
    }

    fn admit(&self) -> ApiResult<Admission> {
        let mut inner = self.lock();
        match inner.state {
            CircuitState::Closed => Ok(Admission::Normal),
            CircuitState::Open => {
                let cooled_down = inner
                    .last_failure
                    .map(|at| at.elapsed() > self.config.recovery_timeout())
                    .unwrap_or(true);
                if cooled_down {
                    inner.state = CircuitState::HalfOpen;
                    inner.probe_in_flight = true;
                    tracing::info!(failures = inner.failures, "Circuit half-open, probing backend");
                    metrics::record_circuit_state(CircuitState::HalfOpen);
                    Ok(Admission::Probe)
                } else {
                    metrics::record_circuit_rejection();
                    Err(ApiClientError::circuit_open())
                }
            }
            CircuitState::HalfOpen => {
                if inner.probe_in_flight {
                    metrics::record_circuit_rejection();
                    Err(ApiClientError::circuit_open())
                } else {
                    inner.probe_in_flight = true;
                    Ok(Admission::Probe)
                }
            }
        }
    }

    fn record_success(&self) {
        let mut inner = self.lock();
        match inner.state {
            CircuitState::HalfOpen => {
                inner.state = CircuitState::Closed;
                inner.failures = 0;
                inner.probe_in_flight = false;
                tracing::info!("Circuit closed, backend recovered");
                metrics::record_circuit_state(CircuitState::Closed);
            }
            CircuitState::Closed => inner.failures = 0,
            // A call admitted before the circuit opened; the open decision stands.
            CircuitState::Open => {}
        }
    }

    fn record_failure(&self, error: &ApiClientError) {
        if error.is_circuit_open() {
            return;
        }

        let mut inner = self.lock();
        inner.failures = inner.failures.saturating_add(1);
        inner.last_failure = Some(Instant::now());

        match inner.state {
            CircuitState::HalfOpen => {
                inner.state = CircuitState::Open;
                inner.probe_in_flight = false;
                tracing::warn!(error = %error, "Probe failed, circuit re-opened");
                metrics::record_circuit_state(CircuitState::Open);
            }
            CircuitState::Closed if inner.failures >= self.config.failure_threshold => {
                inner.state = CircuitState::Open;
                tracing::warn!(
                    failures = inner.failures,
                    threshold = self.config.failure_threshold,
                    error = %error,
                    "Circuit opened"
                );
                metrics::record_circuit_state(CircuitState::Open);
            }
            _ => {}
        }
    }

    /// The probe was dropped before finishing; let the next caller probe instead.
    fn abandon_probe(&self) {
        let mut inner = self.lock();
        if inner.state == CircuitState::HalfOpen {
            inner.state = CircuitState::Open;
            inner.probe_in_flight = false;
            tracing::debug!("Probe cancelled, circuit back to open");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BreakerState> {
        self.inner.lock().expect("circuit breaker mutex poisoned")
    }
}

struct ProbeGuard<'a> {
    breaker: &'a CircuitBreaker,
    armed: bool,
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.breaker.abandon_probe();
        }
    }
}
