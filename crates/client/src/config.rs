//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `ESTORE_API_URL` - Base URL of the storefront API (default: `http://127.0.0.1:5000`)
//! - `ESTORE_SESSION_FILE` - Where the session identity is persisted
//!   (default: `.estore/session.json`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_SESSION_FILE: &str = ".estore/session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the storefront API.
    pub api_url: Url,
    /// Path of the persisted session file.
    pub session_file: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `ESTORE_API_URL` is not a valid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let raw_url = std::env::var("ESTORE_API_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = parse_api_url(&raw_url)?;

        let session_file = std::env::var("ESTORE_SESSION_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

        Ok(Self {
            api_url,
            session_file,
        })
    }
}

/// Parse an API base URL. Only `http` and `https` are accepted.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` if the URL is malformed or uses another scheme.
pub fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("ESTORE_API_URL".to_string(), reason);

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {other}"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_url() {
        let url = parse_api_url(" http://localhost:5000 ").unwrap();
        assert_eq!(url.port(), Some(5000));
        assert!(parse_api_url("ftp://localhost").is_err());
        assert!(parse_api_url("not a url").is_err());
    }
}
