//! Response envelopes.
//!
//! The backend wraps every success as `{ success, data?, message?, pagination? }`
//! and every failure as `{ success: false, error: { message, details? } }`.

use serde::{Deserialize, Serialize};

/// Pagination block attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

/// Success envelope, returned to callers verbatim.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiResponse<T = serde_json::Value> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Failure envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Extract the server message from a parsed error body, if it has one.
pub fn error_message(body: &serde_json::Value) -> Option<String> {
    serde_json::from_value::<ErrorEnvelope>(body.clone())
        .ok()
        .map(|envelope| envelope.error.message)
}
