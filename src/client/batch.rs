//! Batched execution of independent calls.

use futures_util::future::join_all;
use serde::de::DeserializeOwned;

use crate::client::api_client::ApiClient;
use crate::client::error::ApiResult;
use crate::client::request::RequestConfig;
use crate::client::response::ApiResponse;

/// Default number of calls issued together in one batch.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 5;

/// One entry of a batch.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub endpoint: String,
    pub config: RequestConfig,
}

impl BatchRequest {
    pub fn new(endpoint: impl Into<String>, config: RequestConfig) -> Self {
        Self {
            endpoint: endpoint.into(),
            config,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint, RequestConfig::default())
    }
}

impl ApiClient {
    /// Run `requests` in sequential batches of `concurrency` calls.
    ///
    /// The i-th result belongs to the i-th request. A failed call never
    /// prevents the others from running.
    pub async fn batch_request<T: DeserializeOwned>(
        &self,
        requests: Vec<BatchRequest>,
        concurrency: usize,
    ) -> Vec<ApiResult<ApiResponse<T>>> {
        let concurrency = concurrency.max(1);
        let mut results = Vec::with_capacity(requests.len());

        for (index, batch) in requests.chunks(concurrency).enumerate() {
            tracing::debug!(batch = index, size = batch.len(), "Running request batch");
            let calls = batch
                .iter()
                .map(|req| self.request::<T>(&req.endpoint, req.config.clone()));
            results.extend(join_all(calls).await);
        }

        results
    }
}
