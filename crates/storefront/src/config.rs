//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `CATALOG_BASE_URL` - Product catalog API (default: <https://dummyjson.com>)
//! - `AUTH_BASE_URL` - Token auth API (default: <https://reqres.in/api>)
//! - `AUTH_API_KEY` - Sent as `x-api-key` to the auth API
//! - `DEFAULT_PRODUCT_LIMIT` - Page size for categories without a mapping (default: 20)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG_BASE_URL: &str = "https://dummyjson.com";
const DEFAULT_AUTH_BASE_URL: &str = "https://reqres.in/api";
const DEFAULT_PRODUCT_LIMIT: u32 = 20;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Base URL of the product catalog API
    pub catalog_base_url: Url,
    /// Base URL of the auth API
    pub auth_base_url: Url,
    /// Optional key for the auth API
    pub auth_api_key: Option<SecretString>,
    /// Page size for the fallback product listing
    pub default_product_limit: u32,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("catalog_base_url", &self.catalog_base_url.as_str())
            .field("auth_base_url", &self.auth_base_url.as_str())
            .field(
                "auth_api_key",
                &self.auth_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("default_product_limit", &self.default_product_limit)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .field("log_json", &self.log_json)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = parse_or("STOREFRONT_HOST", get("STOREFRONT_HOST"), || {
            IpAddr::from([127, 0, 0, 1])
        })?;
        let port = parse_or("STOREFRONT_PORT", get("STOREFRONT_PORT"), || 3000)?;
        let catalog_base_url = parse_url(
            "CATALOG_BASE_URL",
            get("CATALOG_BASE_URL").as_deref(),
            DEFAULT_CATALOG_BASE_URL,
        )?;
        let auth_base_url = parse_url(
            "AUTH_BASE_URL",
            get("AUTH_BASE_URL").as_deref(),
            DEFAULT_AUTH_BASE_URL,
        )?;
        let default_product_limit = parse_or(
            "DEFAULT_PRODUCT_LIMIT",
            get("DEFAULT_PRODUCT_LIMIT"),
            || DEFAULT_PRODUCT_LIMIT,
        )?;
        if default_product_limit == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "DEFAULT_PRODUCT_LIMIT".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            catalog_base_url,
            auth_base_url,
            auth_api_key: get("AUTH_API_KEY").map(SecretString::from),
            default_product_limit,
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
            log_json: get("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T>(
    key: &str,
    value: Option<String>,
    default: impl FnOnce() -> T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or_else(
        || Ok(default()),
        |v| {
            v.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        },
    )
}

fn parse_url(key: &str, value: Option<&str>, default: &str) -> Result<Url, ConfigError> {
    let raw = value.unwrap_or(default);
    let url =
        Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}
