//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! ApiClient, CircuitBreaker, ConcurrencyGate, retry loop produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms via the metrics facade)
//!
//! Consumers:
//!     → stdout (plain or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every attempt of a logical call
//! - Metric calls are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
