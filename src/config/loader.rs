//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ClientConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "PLANSTORE_API_URL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: ClientConfig = toml::from_str(&content)?;
    apply_env_overrides(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(path = %path.display(), base_url = %config.api.base_url, "Configuration loaded");
    Ok(config)
}

impl ClientConfig {
    /// Defaults plus environment overrides, validated.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = ClientConfig::default();
        apply_env_overrides(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    /// Replace `api.base_url` and re-validate.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Result<Self, ConfigError> {
        self.api.base_url = url.into();
        validate_config(&self).map_err(ConfigError::Validation)?;
        Ok(self)
    }
}

fn apply_env_overrides(config: &mut ClientConfig) {
    if let Ok(url) = std::env::var(API_URL_ENV) {
        if !url.trim().is_empty() {
            config.api.base_url = url.trim().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}.toml", name, uuid::Uuid::new_v4()));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_invalid_config_reports_validation() {
        let path = write_temp(
            "planstore-invalid",
            "[api]\ntimeout_ms = 0\nmax_concurrent_requests = 0\n",
        );
        let err = load_config(&path).unwrap_err();
        let _ = fs::remove_file(&path);

        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_load_malformed_toml() {
        let path = write_temp("planstore-malformed", "[api\nbase_url = ");
        let err = load_config(&path).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_base_url_override_is_validated() {
        let config = ClientConfig::default()
            .with_base_url("https://api.example.com")
            .unwrap();
        assert_eq!(config.api.base_url, "https://api.example.com");

        let err = ClientConfig::default().with_base_url("not a url").unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors, vec![ValidationError::InvalidBaseUrl("not a url".into())])
            }
            other => panic!("expected validation error, got {other}"),
        }

        let err = ClientConfig::default().with_base_url("ftp://files.example.com").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/planstore.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
