//! Per-call request description.
//!
//! # Responsibilities
//! - Model the HTTP method, header overrides and body of a call
//! - Carry per-call timeout / retry overrides
//! - Translate the cache directive into a request header
//!
//! # Design Decisions
//! - Body is a sum type: structured JSON is serialized by the client,
//!   pre-encoded payloads (text, bytes, form pairs) pass through unchanged
//! - Overrides are `Option`s; the client falls back to its configured defaults

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// HTTP methods accepted by the backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
        }
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Structured value, serialized to a JSON string.
    Json(serde_json::Value),
    /// Already-encoded text, sent as-is.
    Text(String),
    /// Binary payload, sent as-is.
    Bytes(Vec<u8>),
    /// Form fields, sent `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
}

impl RequestBody {
    /// Serialize any `Serialize` value into a JSON body.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
        serde_json::to_value(value).map(RequestBody::Json)
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        RequestBody::Json(value)
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Text(text.to_string())
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        RequestBody::Bytes(bytes)
    }
}

/// Cache directive, rendered as a `Cache-Control` request header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    Default,
    NoStore,
    Reload,
    NoCache,
    ForceCache,
    OnlyIfCached,
}

impl CacheMode {
    pub fn header_value(&self) -> Option<&'static str> {
        match self {
            CacheMode::Default => None,
            CacheMode::NoStore => Some("no-store"),
            CacheMode::Reload | CacheMode::NoCache => Some("no-cache"),
            CacheMode::ForceCache => Some("max-stale"),
            CacheMode::OnlyIfCached => Some("only-if-cached"),
        }
    }
}

/// Options for a single logical call.
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    pub method: Method,
    /// Header overrides, applied after the client's default headers.
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    /// Defaults to `NoCache` when unset.
    pub cache: Option<CacheMode>,
    pub timeout: Option<Duration>,
    pub retries: Option<u32>,
    pub retry_delay: Option<Duration>,
}

impl RequestConfig {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn cache(mut self, cache: CacheMode) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }
}
