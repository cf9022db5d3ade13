//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `COUPON_API_BASE_URL` - Base URL of the remote coupon API
//!
//! ## Optional
//! - `COUPON_API_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)

use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Remote API client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL all resource paths are joined onto. Always ends with `/`.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `COUPON_API_BASE_URL` is missing or unparsable,
    /// or if `COUPON_API_TIMEOUT_SECS` is present but not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::var("COUPON_API_BASE_URL").ok(),
            std::env::var("COUPON_API_TIMEOUT_SECS").ok(),
        )
    }

    fn from_vars(
        base_url: Option<String>,
        timeout_secs: Option<String>,
    ) -> Result<Self, ConfigError> {
        let raw = base_url
            .ok_or_else(|| ConfigError::MissingEnvVar("COUPON_API_BASE_URL".to_owned()))?;

        // A trailing slash makes Url::join treat the last segment as a
        // directory rather than replacing it.
        let normalized = if raw.ends_with('/') {
            raw
        } else {
            format!("{raw}/")
        };

        let base_url = Url::parse(&normalized).map_err(|e| {
            ConfigError::InvalidEnvVar("COUPON_API_BASE_URL".to_owned(), e.to_string())
        })?;

        let timeout_secs = match timeout_secs {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("COUPON_API_TIMEOUT_SECS".to_owned(), e.to_string())
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
