//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `ESTORE_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`; when neither is set the in-memory store is used)
//! - `ESTORE_HOST` - Bind address (default: 127.0.0.1)
//! - `ESTORE_PORT` - Listen port (default: 5000)
//! - `ESTORE_TOKEN_TTL_SECS` - Access token lifetime in seconds (default: 86400)
//! - `ESTORE_RATE_LIMIT` - Rate limit auth endpoints per client IP (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Fraction of errors sent to Sentry (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Fraction of transactions traced (default: 0.0)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use chrono::Duration;
use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;
const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// How long an issued access token stays valid
    pub token_ttl: Duration,
    /// Whether auth endpoints are rate limited
    pub rate_limit: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. `production`)
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced by Sentry
    pub sentry_traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("ESTORE_HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?;
        let port = parse_env("ESTORE_PORT", DEFAULT_PORT)?;

        let ttl_secs = parse_env("ESTORE_TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?;
        let token_ttl = parse_token_ttl(ttl_secs)?;

        Ok(Self {
            database_url: get_database_url("ESTORE_DATABASE_URL"),
            host,
            port,
            token_ttl,
            rate_limit: parse_env("ESTORE_RATE_LIMIT", true)?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Configuration for local development and tests.
    ///
    /// In-memory stores, ephemeral port, no rate limiting, no Sentry.
    #[must_use]
    pub fn local() -> Self {
        Self {
            database_url: None,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
            rate_limit: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Option<SecretString> {
    get_optional_env(primary_key)
        .or_else(|| get_optional_env("DATABASE_URL"))
        .map(SecretString::from)
}

/// Validate a token lifetime given in seconds.
fn parse_token_ttl(secs: i64) -> Result<Duration, ConfigError> {
    if !(1..=MAX_TOKEN_TTL_SECS).contains(&secs) {
        return Err(ConfigError::InvalidEnvVar(
            "ESTORE_TOKEN_TTL_SECS".to_string(),
            format!("must be between 1 and {MAX_TOKEN_TTL_SECS} seconds"),
        ));
    }
    Duration::try_seconds(secs).ok_or_else(|| {
        ConfigError::InvalidEnvVar(
            "ESTORE_TOKEN_TTL_SECS".to_string(),
            "out of range".to_string(),
        )
    })
}

/// Get an optional, non-blank environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an environment variable, using `default` when it is unset.
fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_port() {
        let port: u16 = parse_value("ESTORE_PORT", " 8080 ").unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_value_invalid() {
        let err = parse_value::<u16>("ESTORE_PORT", "eighty").unwrap_err();
        assert!(err.to_string().contains("ESTORE_PORT"));
    }

    #[test]
    fn test_parse_value_bool() {
        assert!(parse_value::<bool>("ESTORE_RATE_LIMIT", "true").unwrap());
        assert!(!parse_value::<bool>("ESTORE_RATE_LIMIT", "false").unwrap());
        assert!(parse_value::<bool>("ESTORE_RATE_LIMIT", "yes").is_err());
    }

    #[test]
    fn test_parse_env_default_when_unset() {
        let value: u16 = parse_env("ESTORE_TEST_SURELY_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_token_ttl_bounds() {
        assert_eq!(parse_token_ttl(60).unwrap(), Duration::minutes(1));
        assert_eq!(parse_token_ttl(MAX_TOKEN_TTL_SECS).unwrap(), Duration::days(365));
        assert!(parse_token_ttl(0).is_err());
        assert!(parse_token_ttl(-5).is_err());
        assert!(parse_token_ttl(MAX_TOKEN_TTL_SECS + 1).is_err());
        assert!(parse_token_ttl(10_000_000_000_000).is_err());

        let err = parse_token_ttl(i64::MAX).unwrap_err();
        assert!(err.to_string().contains("ESTORE_TOKEN_TTL_SECS"));
    }

    #[test]
    fn test_local_config() {
        let config = StorefrontConfig::local();
        assert!(config.database_url.is_none());
        assert!(!config.rate_limit);
        assert_eq!(config.token_ttl, Duration::hours(24));
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            port: 5000,
            ..StorefrontConfig::local()
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = StorefrontConfig {
            database_url: Some(SecretString::from("postgres://app:hunter2@db/estore")),
            ..StorefrontConfig::local()
        };

        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("hunter2"));
    }
}
