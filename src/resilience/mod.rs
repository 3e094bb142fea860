//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Logical call:
//!     → concurrency.rs (wait for a slot, FIFO when saturated)
//!     → circuit_breaker.rs (fail fast while the backend is considered down)
//!     → retries.rs (retry transient failures, backoff.rs schedules delays)
//!     → timeouts.rs (deadline on each network attempt)
//!     ← slot released on every exit path
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every attempt has a deadline
//! - The breaker wraps the retry loop, so open-circuit rejections are never retried
//! - 4xx (except 429) are terminal and never retried
//! - All shared state is confined to one client instance

pub mod backoff;
pub mod circuit_breaker;
pub mod concurrency;
pub mod retries;
pub mod timeouts;

pub use circuit_breaker::{CircuitBreaker, CircuitState};
pub use concurrency::{ConcurrencyGate, GateStatus, SlotGuard};
pub use retries::{retry_with_backoff, RetryPolicy};
