//! API client subsystem.
//!
//! # Data Flow
//! ```text
//! caller (endpoint, RequestConfig)
//!     → api_client.rs (URL, headers, body encoding)
//!     → resilience (gate → breaker → retry → timeout)
//!     → reqwest (one network attempt)
//!     → response.rs (ApiResponse) | error.rs (ApiClientError)
//!
//! batch.rs: fixed-size sequential batches over api_client.rs
//! ```

pub mod api_client;
pub mod batch;
pub mod error;
pub mod request;
pub mod response;

pub use api_client::{ApiClient, ClientStatus};
pub use batch::{BatchRequest, DEFAULT_BATCH_CONCURRENCY};
pub use error::{ApiClientError, ApiResult, ErrorKind};
pub use request::{CacheMode, Method, RequestBody, RequestConfig};
pub use response::{ApiResponse, Pagination};
