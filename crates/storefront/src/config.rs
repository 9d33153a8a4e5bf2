//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_ENV` - `development` or `production` (default: build mode;
//!   debug builds are development)
//! - `REFABRY_API_BASE_URL` - Catalog/order API (default: <https://admin.refabry.com/api>)
//! - `REFABRY_IMAGE_BASE_URL` - Product image host (default:
//!   <https://admin.refabry.com/storage/product>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use thiserror::Error;
use url::Url;

/// Default catalog/order API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://admin.refabry.com/api";

/// Default product image base URL.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://admin.refabry.com/storage/product";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Deployment environment.
///
/// Development mounts the debug endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// The environment implied by the build profile.
    #[must_use]
    pub const fn from_build() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Production
        }
    }

    #[must_use]
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("expected development or production, got {other:?}")),
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
    /// Deployment environment
    pub environment: Environment,
    /// Refabry API configuration
    pub api: RefabryApiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Refabry API configuration.
#[derive(Debug, Clone)]
pub struct RefabryApiConfig {
    /// Base URL of the catalog and order endpoints, without trailing slash
    pub base_url: String,
    /// Base URL that product image filenames are appended to
    pub image_base_url: String,
}

impl Default for RefabryApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let environment = match get_optional_env("STOREFRONT_ENV") {
            Some(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_ENV".to_string(), e))?,
            None => Environment::from_build(),
        };

        let api = RefabryApiConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            environment,
            api,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl RefabryApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: get_url_or_default("REFABRY_API_BASE_URL", DEFAULT_API_BASE_URL)?,
            image_base_url: get_url_or_default("REFABRY_IMAGE_BASE_URL", DEFAULT_IMAGE_BASE_URL)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Get an absolute http(s) URL, without trailing slash.
fn get_url_or_default(key: &str, default: &str) -> Result<String, ConfigError> {
    let value = get_env_or_default(key, default);
    validate_base_url(&value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e))
}

/// Check that `value` is an absolute http(s) URL and strip any trailing slash.
fn validate_base_url(value: &str) -> Result<String, String> {
    let url = Url::parse(value).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme {:?}", url.scheme()));
    }
    Ok(value.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!("development".parse::<Environment>(), Ok(Environment::Development));
        assert_eq!("PROD".parse::<Environment>(), Ok(Environment::Production));
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_environment_from_build() {
        assert_eq!(
            Environment::from_build().is_development(),
            cfg!(debug_assertions)
        );
    }

    #[test]
    fn test_validate_base_url_strips_trailing_slash() {
        assert_eq!(
            validate_base_url("https://admin.refabry.com/api/").unwrap(),
            "https://admin.refabry.com/api"
        );
    }

    #[test]
    fn test_validate_base_url_rejects_invalid() {
        assert!(validate_base_url("admin.refabry.com/api").is_err());
        assert!(validate_base_url("ftp://admin.refabry.com/api").is_err());
    }

    #[test]
    fn test_api_config_defaults() {
        let api = RefabryApiConfig::default();
        assert_eq!(api.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(api.image_base_url, DEFAULT_IMAGE_BASE_URL);
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            environment: Environment::Production,
            api: RefabryApiConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}
