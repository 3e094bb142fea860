//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the base URL and API version segment
//! - Validate value ranges (timeouts > 0, concurrency > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the client

use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("api.base_url '{0}' is not a valid URL")]
    InvalidBaseUrl(String),

    #[error("api.base_url scheme '{0}' is not http or https")]
    UnsupportedScheme(String),

    #[error("api.api_version must not be empty")]
    EmptyApiVersion,

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("api.health_path '{0}' must start with '/'")]
    RelativeHealthPath(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let api = &config.api;

    match Url::parse(&api.base_url) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
            }
        }
        Err(_) => errors.push(ValidationError::InvalidBaseUrl(api.base_url.clone())),
    }

    if api.api_version.trim_matches('/').is_empty() {
        errors.push(ValidationError::EmptyApiVersion);
    }
    if api.timeout_ms == 0 {
        errors.push(ValidationError::Zero("api.timeout_ms"));
    }
    if api.health_timeout_ms == 0 {
        errors.push(ValidationError::Zero("api.health_timeout_ms"));
    }
    if api.max_concurrent_requests == 0 {
        errors.push(ValidationError::Zero("api.max_concurrent_requests"));
    }
    if !api.health_path.starts_with('/') {
        errors.push(ValidationError::RelativeHealthPath(api.health_path.clone()));
    }
    if config.circuit_breaker.failure_threshold == 0 {
        errors.push(ValidationError::Zero("circuit_breaker.failure_threshold"));
    }
    if config.circuit_breaker.recovery_timeout_ms == 0 {
        errors.push(ValidationError::Zero("circuit_breaker.recovery_timeout_ms"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
