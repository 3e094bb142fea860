//! Metrics collection and exposition.
//!
//! # Metrics
//! - `planstore_client_requests_total` (counter): logical calls by method, status
//! - `planstore_client_request_duration_seconds` (histogram): end-to-end latency
//! - `planstore_client_retries_total` (counter): scheduled retries by status
//! - `planstore_client_circuit_state` (gauge): 0=closed, 1=half-open, 2=open
//! - `planstore_client_circuit_rejections_total` (counter)
//! - `planstore_client_active_requests` / `planstore_client_queued_requests` (gauges)

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

use crate::resilience::circuit_breaker::CircuitState;

/// Install the Prometheus recorder with an HTTP scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished logical call. `status` is `ok` or the failing status code.
pub fn record_request(method: &str, status: &str, start: Instant) {
    counter!(
        "planstore_client_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "planstore_client_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_retry(status: u16) {
    counter!("planstore_client_retries_total", "status" => status.to_string()).increment(1);
}

pub fn record_circuit_state(state: CircuitState) {
    let value = match state {
        CircuitState::Closed => 0.0,
        CircuitState::HalfOpen => 1.0,
        CircuitState::Open => 2.0,
    };
    gauge!("planstore_client_circuit_state").set(value);
}

pub fn record_circuit_rejection() {
    counter!("planstore_client_circuit_rejections_total").increment(1);
}

pub fn record_slots(active: usize, queued: usize) {
    gauge!("planstore_client_active_requests").set(active as f64);
    gauge!("planstore_client_queued_requests").set(queued as f64);
}
