//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DATA_DIR` - Directory holding the JSON documents (default: data)
//! - `STOREFRONT_PRODUCTS_PATH` - Catalog document (default: `<data dir>/products.json`)
//! - `STOREFRONT_CART_PATH` - Cart document (default: `<data dir>/cart.json`)
//! - `STOREFRONT_STATIC_DIR` - Browser page and assets (default: crates/storefront/static)
//! - `STOREFRONT_STRICT_READS` - Surface unreadable stores as 500s instead of
//!   treating them as empty (default: false)
//! - `STOREFRONT_CATALOG_CACHE_SECS` - Catalog cache TTL, 0 disables (default: 30)
//! - `STOREFRONT_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::db::ReadPolicy;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-field lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `pretty` or `json`, got `{other}`")),
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Catalog JSON document
    pub products_path: PathBuf,
    /// Cart JSON document
    pub cart_path: PathBuf,
    /// Directory served at `/` and `/static`
    pub static_dir: PathBuf,
    /// Policy for unreadable stores
    pub read_policy: ReadPolicy,
    /// How long a successful catalog load is reused
    pub catalog_cache_ttl: Duration,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry error tracking configuration
    pub sentry: SentryConfig,
}

/// Sentry error tracking configuration.
#[derive(Debug, Clone, Default)]
pub struct SentryConfig {
    /// Sentry DSN; Sentry is disabled when unset
    pub dsn: Option<String>,
    /// Environment tag (e.g. `production`)
    pub environment: Option<String>,
    /// Error event sample rate
    pub sample_rate: f32,
    /// Transaction sample rate
    pub traces_sample_rate: f32,
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

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_or_default(&lookup, "STOREFRONT_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_or_default(&lookup, "STOREFRONT_PORT", 3000_u16)?;

        let data_dir = PathBuf::from(get_or_default(&lookup, "STOREFRONT_DATA_DIR", "data"));
        let products_path = lookup("STOREFRONT_PRODUCTS_PATH")
            .map_or_else(|| data_dir.join("products.json"), PathBuf::from);
        let cart_path = lookup("STOREFRONT_CART_PATH")
            .map_or_else(|| data_dir.join("cart.json"), PathBuf::from);
        let static_dir = PathBuf::from(get_or_default(
            &lookup,
            "STOREFRONT_STATIC_DIR",
            "crates/storefront/static",
        ));

        let read_policy = if parse_bool(&lookup, "STOREFRONT_STRICT_READS", false)? {
            ReadPolicy::Strict
        } else {
            ReadPolicy::FailOpen
        };
        let catalog_cache_ttl = Duration::from_secs(parse_or_default(
            &lookup,
            "STOREFRONT_CATALOG_CACHE_SECS",
            30_u64,
        )?);
        let log_format = parse_or_default(&lookup, "STOREFRONT_LOG_FORMAT", LogFormat::Pretty)?;

        let sentry = SentryConfig {
            dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
            environment: lookup("SENTRY_ENVIRONMENT"),
            sample_rate: parse_rate(&lookup, "SENTRY_SAMPLE_RATE", 1.0)?,
            traces_sample_rate: parse_rate(&lookup, "SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        };

        Ok(Self {
            host,
            port,
            products_path,
            cart_path,
            static_dir,
            read_policy,
            catalog_cache_ttl,
            log_format,
            sentry,
        })
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

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Parse a variable, falling back to `default` when unset.
fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse a boolean flag (`true`/`false`/`1`/`0`/`yes`/`no`).
fn parse_bool(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(value) = lookup(key) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got `{other}`"),
        )),
    }
}

/// Parse a sample rate in `0.0..=1.0`.
fn parse_rate(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: f32,
) -> Result<f32, ConfigError> {
    let rate = parse_or_default(lookup, key, default)?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.products_path, PathBuf::from("data/products.json"));
        assert_eq!(config.cart_path, PathBuf::from("data/cart.json"));
        assert_eq!(config.read_policy, ReadPolicy::FailOpen);
        assert_eq!(config.catalog_cache_ttl, Duration::from_secs(30));
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.sentry.dsn.is_none());
    }

    #[test]
    fn test_data_dir_moves_both_documents() {
        let config = load(&[("STOREFRONT_DATA_DIR", "/srv/shop")]).unwrap();
        assert_eq!(config.products_path, PathBuf::from("/srv/shop/products.json"));
        assert_eq!(config.cart_path, PathBuf::from("/srv/shop/cart.json"));
    }

    #[test]
    fn test_explicit_paths_override_data_dir() {
        let config = load(&[
            ("STOREFRONT_DATA_DIR", "/srv/shop"),
            ("STOREFRONT_CART_PATH", "/tmp/cart.json"),
        ])
        .unwrap();
        assert_eq!(config.products_path, PathBuf::from("/srv/shop/products.json"));
        assert_eq!(config.cart_path, PathBuf::from("/tmp/cart.json"));
    }

    #[test]
    fn test_strict_reads_flag() {
        let config = load(&[("STOREFRONT_STRICT_READS", "true")]).unwrap();
        assert_eq!(config.read_policy, ReadPolicy::Strict);

        let err = load(&[("STOREFRONT_STRICT_READS", "maybe")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STOREFRONT_STRICT_READS"));
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("STOREFRONT_PORT", "70000")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_log_format() {
        assert_eq!(
            load(&[("STOREFRONT_LOG_FORMAT", "JSON")]).unwrap().log_format,
            LogFormat::Json
        );
        assert!(load(&[("STOREFRONT_LOG_FORMAT", "xml")]).is_err());
    }

    #[test]
    fn test_sample_rate_bounds() {
        assert!(load(&[("SENTRY_SAMPLE_RATE", "1.5")]).is_err());
        let config = load(&[("SENTRY_TRACES_SAMPLE_RATE", "0.25")]).unwrap();
        assert!((config.sentry.traces_sample_rate - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_empty_sentry_dsn_is_disabled() {
        let config = load(&[("SENTRY_DSN", "")]).unwrap();
        assert!(config.sentry.dsn.is_none());
    }
}
