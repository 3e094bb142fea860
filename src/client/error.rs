//! Error type surfaced to every caller of the client.

use thiserror::Error;

/// Status code used for transport failures where no response was received.
pub const STATUS_TRANSPORT: u16 = 0;
/// Status code used when an attempt exceeds its deadline.
pub const STATUS_TIMEOUT: u16 = 408;
/// Status code used when the circuit breaker rejects a call.
pub const STATUS_CIRCUIT_OPEN: u16 = 503;

/// Which layer produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// DNS, connect or reset failure; no response received.
    Transport,
    /// The attempt was aborted after exceeding its timeout.
    Timeout,
    /// The server answered with a non-2xx status.
    Http,
    /// The circuit breaker rejected the call without a network attempt.
    CircuitOpen,
    /// A response arrived but its body was not the expected JSON.
    Decode,
}

/// A failed logical call.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiClientError {
    pub message: String,
    pub status_code: u16,
    /// Parsed error body, when the server sent one.
    pub response: Option<serde_json::Value>,
    pub kind: ErrorKind,
}

/// Result type for client operations.
pub type ApiResult<T> = Result<T, ApiClientError>;

impl ApiClientError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: STATUS_TRANSPORT,
            response: None,
            kind: ErrorKind::Transport,
        }
    }

    pub fn timeout() -> Self {
        Self {
            message: "Request timeout".to_string(),
            status_code: STATUS_TIMEOUT,
            response: None,
            kind: ErrorKind::Timeout,
        }
    }

    pub fn circuit_open() -> Self {
        Self {
            message: "Circuit breaker is OPEN".to_string(),
            status_code: STATUS_CIRCUIT_OPEN,
            response: None,
            kind: ErrorKind::CircuitOpen,
        }
    }

    pub fn http(status_code: u16, message: impl Into<String>, response: Option<serde_json::Value>) -> Self {
        Self {
            message: message.into(),
            status_code,
            response,
            kind: ErrorKind::Http,
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: STATUS_TRANSPORT,
            response: None,
            kind: ErrorKind::Decode,
        }
    }

    /// A server 4xx other than 429; it will fail the same way every time.
    ///
    /// Client-side timeouts share status 408 but are not client errors.
    pub fn is_client_error(&self) -> bool {
        self.kind == ErrorKind::Http
            && (400..500).contains(&self.status_code)
            && self.status_code != 429
    }

    pub fn is_retryable(&self) -> bool {
        !self.is_client_error()
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == ErrorKind::Timeout
    }

    pub fn is_circuit_open(&self) -> bool {
        self.kind == ErrorKind::CircuitOpen
    }
}

impl From<reqwest::Error> for ApiClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ApiClientError::timeout();
        }
        if err.is_decode() {
            return ApiClientError::decode(err.to_string());
        }
        ApiClientError::transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryability_by_status() {
        assert!(!ApiClientError::http(404, "not found", None).is_retryable());
        assert!(!ApiClientError::http(400, "bad", None).is_retryable());
        assert!(!ApiClientError::http(499, "closed", None).is_retryable());
        assert!(ApiClientError::http(429, "slow down", None).is_retryable());
        assert!(ApiClientError::http(500, "boom", None).is_retryable());
        assert!(ApiClientError::http(503, "down", None).is_retryable());
        assert!(ApiClientError::transport("reset").is_retryable());
        assert!(ApiClientError::timeout().is_retryable());
    }

    #[test]
    fn test_timeout_retryable_but_server_408_terminal() {
        let timeout = ApiClientError::timeout();
        assert_eq!(timeout.status_code, 408);
        assert!(!timeout.is_client_error());
        assert!(timeout.is_retryable());

        let server = ApiClientError::http(408, "Request Timeout", None);
        assert!(server.is_client_error());
        assert!(!server.is_retryable());
    }

    #[test]
    fn test_status_conventions() {
        assert_eq!(ApiClientError::transport("x").status_code, 0);
        assert_eq!(ApiClientError::timeout().status_code, 408);
        assert_eq!(ApiClientError::circuit_open().status_code, 503);
        assert!(ApiClientError::circuit_open().is_circuit_open());
        assert!(ApiClientError::timeout().is_timeout());
    }

    #[test]
    fn test_error_display() {
        let err = ApiClientError::http(422, "Validation failed", None);
        assert_eq!(err.to_string(), "Validation failed");
        assert_eq!(ApiClientError::circuit_open().to_string(), "Circuit breaker is OPEN");
    }
}
