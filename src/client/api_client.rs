//! Resilient client for the storefront REST API.
//!
//! # Responsibilities
//! - Build request URLs from the configured base URL and API version
//! - Merge default headers, the bearer token and per-call overrides
//! - Encode request bodies
//! - Route every call through gate → breaker → retry → timeout
//! - Shape responses into `ApiResponse` or `ApiClientError`
//!
//! # Design Decisions
//! - One `ApiClient` per process; clones share the breaker, gate and token
//! - Headers and body are prepared once per logical call and reused by retries
//! - The slot guard lives for the whole call, so release happens on every path

use arc_swap::ArcSwapOption;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::client::error::{ApiClientError, ApiResult};
use crate::client::request::{CacheMode, Method, RequestBody, RequestConfig};
use crate::client::response::{error_message, ApiResponse};
use crate::config::{ApiConfig, ClientConfig};
use crate::observability::metrics;
use crate::resilience::circuit_breaker::{CircuitBreaker, CircuitState};
use crate::resilience::concurrency::ConcurrencyGate;
use crate::resilience::retries::{retry_with_backoff, RetryPolicy};
use crate::resilience::timeouts::with_timeout;

const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";

/// Snapshot of the client's shared state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientStatus {
    pub active_requests: usize,
    pub queue_size: usize,
    pub circuit_state: CircuitState,
    pub consecutive_failures: u32,
}

struct ClientInner {
    http: reqwest::Client,
    config: ApiConfig,
    /// `<base_url>/api/<version>`, without trailing slash.
    api_root: String,
    auth_token: ArcSwapOption<String>,
    gate: Arc<ConcurrencyGate>,
    breaker: CircuitBreaker,
}

/// Storefront API client.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

/// Method, headers and encoded body of one logical call.
struct PreparedRequest {
    method: Method,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl ApiClient {
    /// Create a client. Configuration is read once, here.
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let api = config.api.clone();
        let http = reqwest::Client::builder()
            .user_agent(api.user_agent.clone())
            .build()?;

        let api_root = format!(
            "{}/api/{}",
            api.base_url.trim_end_matches('/'),
            api.api_version.trim_matches('/')
        );

        tracing::info!(
            api_root = %api_root,
            max_concurrent = api.max_concurrent_requests,
            timeout_ms = api.timeout_ms,
            max_retries = api.max_retries,
            "API client initialized"
        );

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                gate: ConcurrencyGate::new(api.max_concurrent_requests),
                breaker: CircuitBreaker::new(config.circuit_breaker.clone()),
                auth_token: ArcSwapOption::empty(),
                api_root,
                config: api,
            }),
        })
    }

    /// Full URL for an endpoint path such as `/plans/42`.
    pub fn build_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.inner.api_root, endpoint)
        } else {
            format!("{}/{}", self.inner.api_root, endpoint)
        }
    }

    /// `<base_url>/api/<version>`, without trailing slash.
    pub fn api_root(&self) -> &str {
        &self.inner.api_root
    }

    /// Set or clear the bearer token attached to subsequent calls.
    pub fn set_auth_token(&self, token: Option<&str>) {
        match token {
            Some(token) => {
                self.inner.auth_token.store(Some(Arc::new(token.to_string())));
                tracing::debug!("Auth token set");
            }
            None => {
                self.inner.auth_token.store(None);
                tracing::debug!("Auth token cleared");
            }
        }
    }

    pub fn auth_token(&self) -> Option<String> {
        self.inner.auth_token.load_full().map(|t| t.as_ref().clone())
    }

    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    pub fn status(&self) -> ClientStatus {
        let gate = self.inner.gate.status();
        ClientStatus {
            active_requests: gate.active,
            queue_size: gate.queued,
            circuit_state: self.inner.breaker.state(),
            consecutive_failures: self.inner.breaker.failures(),
        }
    }

    /// Perform one logical call.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        config: RequestConfig,
    ) -> ApiResult<ApiResponse<T>> {
        let start = Instant::now();
        let request_id = Uuid::new_v4().to_string();
        let url = self.build_url(endpoint);
        let defaults = &self.inner.config;

        let policy = RetryPolicy {
            retries: config.retries.unwrap_or(defaults.max_retries),
            base_delay: config.retry_delay.unwrap_or_else(|| defaults.retry_delay()),
            jitter_ms: defaults.retry_jitter_ms,
        };
        let timeout = config.timeout.unwrap_or_else(|| defaults.timeout());
        let prepared = self.prepare(config, &request_id);

        let _slot = self.inner.gate.acquire().await;

        let attempt = |attempt: u32| self.send_once::<T>(&url, &prepared, &request_id, timeout, attempt);
        let result = self
            .inner
            .breaker
            .call(move || retry_with_backoff(policy, attempt))
            .await;

        match &result {
            Ok(_) => metrics::record_request(prepared.method.as_str(), "ok", start),
            Err(e) => {
                tracing::error!(
                    request_id = %request_id,
                    method = %prepared.method,
                    url = %url,
                    status = e.status_code,
                    error = %e,
                    "Request failed"
                );
                metrics::record_request(prepared.method.as_str(), &e.status_code.to_string(), start);
            }
        }
        result
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        mut config: RequestConfig,
    ) -> ApiResult<ApiResponse<T>> {
        config.method = Method::Get;
        config.cache = Some(config.cache.unwrap_or(CacheMode::Default));
        self.request(endpoint, config).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<RequestBody>,
        mut config: RequestConfig,
    ) -> ApiResult<ApiResponse<T>> {
        config.method = Method::Post;
        config.body = body;
        self.request(endpoint, config).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<RequestBody>,
        mut config: RequestConfig,
    ) -> ApiResult<ApiResponse<T>> {
        config.method = Method::Put;
        config.body = body;
        self.request(endpoint, config).await
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<RequestBody>,
        mut config: RequestConfig,
    ) -> ApiResult<ApiResponse<T>> {
        config.method = Method::Patch;
        config.body = body;
        self.request(endpoint, config).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        mut config: RequestConfig,
    ) -> ApiResult<ApiResponse<T>> {
        config.method = Method::Delete;
        self.request(endpoint, config).await
    }

    /// Probe the health endpoint once with a short timeout.
    pub async fn health_check(&self) -> bool {
        let config = RequestConfig::default()
            .timeout(self.inner.config.health_timeout())
            .retries(0);
        let path = self.inner.config.health_path.clone();
        match self.get::<serde_json::Value>(&path, config).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(status = e.status_code, error = %e, "Health check failed");
                false
            }
        }
    }

    fn prepare(&self, config: RequestConfig, request_id: &str) -> PreparedRequest {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        if let Ok(value) = HeaderValue::from_str(request_id) {
            headers.insert("x-request-id", value);
        }
        if let Some(token) = self.inner.auth_token.load_full() {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => tracing::warn!("Auth token is not a valid header value, omitting"),
            }
        }
        if let Some(value) = config.cache.unwrap_or(CacheMode::NoCache).header_value() {
            headers.insert(CACHE_CONTROL, HeaderValue::from_static(value));
        }

        for (name, value) in &config.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::warn!(header = %name, "Ignoring invalid header override"),
            }
        }

        let body = config.body.map(|body| match body {
            RequestBody::Json(value) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
                value.to_string().into_bytes()
            }
            RequestBody::Text(text) => text.into_bytes(),
            RequestBody::Bytes(bytes) => bytes,
            RequestBody::Form(pairs) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM));
                url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                    .finish()
                    .into_bytes()
            }
        });

        PreparedRequest {
            method: config.method,
            headers,
            body,
        }
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        url: &str,
        prepared: &PreparedRequest,
        request_id: &str,
        timeout: Duration,
        attempt: u32,
    ) -> ApiResult<ApiResponse<T>> {
        tracing::debug!(
            request_id = %request_id,
            method = %prepared.method,
            url = %url,
            attempt,
            "Sending request"
        );

        let mut builder = self
            .inner
            .http
            .request(prepared.method.into(), url)
            .headers(prepared.headers.clone());
        if let Some(body) = &prepared.body {
            builder = builder.body(body.clone());
        }

        with_timeout(timeout, async move {
            let response = builder.send().await?;
            let status = response.status();
            let bytes = response.bytes().await?;
            parse_response(status, &bytes)
        })
        .await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_root", &self.inner.api_root)
            .field("authenticated", &self.inner.auth_token.load().is_some())
            .field("status", &self.status())
            .finish()
    }
}

fn parse_response<T: DeserializeOwned>(status: StatusCode, bytes: &[u8]) -> ApiResult<ApiResponse<T>> {
    if status.is_success() {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(ApiResponse {
                success: true,
                data: None,
                message: None,
                pagination: None,
            });
        }
        return serde_json::from_slice(bytes)
            .map_err(|e| ApiClientError::decode(format!("Invalid JSON response: {}", e)));
    }

    let body: Option<serde_json::Value> = serde_json::from_slice(bytes).ok();
    let message = body.as_ref().and_then(error_message).unwrap_or_else(|| {
        format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        )
    });
    Err(ApiClientError::http(status.as_u16(), message, body))
}
