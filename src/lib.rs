//! Resilient client for the house-plan storefront API.
//!
//! # Architecture Overview
//!
//! ```text
//!   caller ──▶ ApiClient::request(endpoint, RequestConfig)
//!                 │
//!                 ▼
//!   ┌──────────────────────────────────────────────────────────┐
//!   │ resilience::concurrency   wait for one of N slots (FIFO) │
//!   │ resilience::circuit_breaker   fail fast while open       │
//!   │ resilience::retries   backoff + jitter, skip 4xx         │
//!   │ resilience::timeouts   deadline per network attempt      │
//!   └──────────────────────────────────────────────────────────┘
//!                 │
//!                 ▼
//!           reqwest ──▶ backend /api/<version>/<endpoint>
//!                 │
//!                 ▼
//!   ApiResponse<T>  |  ApiClientError { message, status_code }
//! ```
//!
//! Construct one `ApiClient` per process and clone it where needed; all
//! clones share the same breaker, gate and bearer token.

pub mod api;
pub mod client;
pub mod config;
pub mod observability;
pub mod resilience;

pub use client::{
    ApiClient, ApiClientError, ApiResponse, ApiResult, BatchRequest, CacheMode, Method,
    RequestBody, RequestConfig,
};
pub use config::ClientConfig;
