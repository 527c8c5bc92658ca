//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CATALOG_API_URL` - Upstream catalog endpoint
//!
//! ## Optional
//! - `CATALOG_PUBLIC_URL` - Read-only, price-less endpoint used without a credential
//! - `CATALOG_BEARER_TOKEN` - Bearer credential for the catalog endpoint
//! - `CATALOG_REQUIRE_CREDENTIAL` - Fail fetches without a credential (default: false)
//! - `CATALOG_PAGE_SIZE` - Products requested per fetch (default: 100)
//! - `CATALOG_SORT_FIELD` - Upstream sort field (default: createdAt)
//! - `CATALOG_SORT_DIRECTION` - `asc` or `desc` (default: desc)
//! - `CATALOG_TIMEOUT_SECS` - HTTP timeout (default: 15)
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_STORAGE_DIR` - Durable cart/wishlist directory (default: .shopfront)
//! - `STOREFRONT_SECTIONS` - Comma separated section names
//! - `STOREFRONT_SECTION_CAPACITY` - Products per section page (default: 6)
//! - `STOREFRONT_SECTION_PAGES` - Pages each section may claim (default: 2)
//! - `STOREFRONT_SEARCH_DEBOUNCE_MS` - Search debounce delay (default: 300)
//! - `STOREFRONT_PRICE_POLICY` - `original-price` or `explicit-price` (default: original-price)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use shopfront_core::PricePolicy;
use thiserror::Error;
use url::Url;

use crate::catalog::{ALL_SECTION, SectionPlan};
use crate::session::RESULTS_KEY;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the durable `cart` and `wishlist` collections
    pub storage_dir: PathBuf,
    /// Upstream catalog configuration
    pub upstream: UpstreamConfig,
    /// Display section layout
    pub sections: SectionPlan,
    /// Debounce delay for search input
    pub search_debounce: Duration,
    /// Price precedence when no discount applies
    pub price_policy: PricePolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Upstream catalog configuration.
///
/// Implements `Debug` manually to redact the bearer token.
#[derive(Clone)]
pub struct UpstreamConfig {
    /// Priced catalog endpoint
    pub api_url: Url,
    /// Read-only endpoint without prices, used when no credential is present
    pub public_url: Option<Url>,
    /// Optional bearer credential
    pub bearer_token: Option<SecretString>,
    /// Treat a missing credential as a fetch error when no public endpoint exists
    pub require_credential: bool,
    /// `size` query parameter
    pub page_size: u32,
    /// Upstream sort field
    pub sort_field: String,
    /// Upstream sort direction
    pub sort_direction: SortDirection,
    /// HTTP request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_url", &self.api_url.as_str())
            .field("public_url", &self.public_url.as_ref().map(Url::as_str))
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("require_credential", &self.require_credential)
            .field("page_size", &self.page_size)
            .field("sort_field", &self.sort_field)
            .field("sort_direction", &self.sort_direction)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Upstream sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("expected asc or desc, got '{other}'")),
        }
    }
}

impl UpstreamConfig {
    /// Upstream configuration with defaults for everything but the endpoint.
    #[must_use]
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            public_url: None,
            bearer_token: None,
            require_credential: false,
            page_size: 100,
            sort_field: "createdAt".to_string(),
            sort_direction: SortDirection::Desc,
            timeout: Duration::from_secs(15),
        }
    }

    /// Load upstream configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `CATALOG_API_URL` is missing or any value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = parse_url("CATALOG_API_URL", &get_required_env("CATALOG_API_URL")?)?;
        let public_url = get_optional_env("CATALOG_PUBLIC_URL")
            .map(|v| parse_url("CATALOG_PUBLIC_URL", &v))
            .transpose()?;
        let bearer_token = get_optional_env("CATALOG_BEARER_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::from);

        Ok(Self {
            api_url,
            public_url,
            bearer_token,
            require_credential: parse_env_or("CATALOG_REQUIRE_CREDENTIAL", false)?,
            page_size: parse_env_or("CATALOG_PAGE_SIZE", 100)?,
            sort_field: get_env_or_default("CATALOG_SORT_FIELD", "createdAt"),
            sort_direction: parse_env_or("CATALOG_SORT_DIRECTION", SortDirection::Desc)?,
            timeout: Duration::from_secs(parse_env_or("CATALOG_TIMEOUT_SECS", 15)?),
        })
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or("STOREFRONT_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_env_or("STOREFRONT_PORT", 3000)?;
        let storage_dir = PathBuf::from(get_env_or_default("STOREFRONT_STORAGE_DIR", ".shopfront"));

        let defaults = SectionPlan::default();
        let sections = SectionPlan {
            names: get_optional_env("STOREFRONT_SECTIONS")
                .map_or(Ok(defaults.names), |v| parse_section_names(&v))?,
            capacity: parse_env_or("STOREFRONT_SECTION_CAPACITY", defaults.capacity)?,
            pages: parse_env_or("STOREFRONT_SECTION_PAGES", defaults.pages)?,
        };

        let price_policy = match get_optional_env("STOREFRONT_PRICE_POLICY") {
            Some(v) => PricePolicy::parse(&v).ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "STOREFRONT_PRICE_POLICY".to_string(),
                    format!("expected original-price or explicit-price, got '{v}'"),
                )
            })?,
            None => PricePolicy::default(),
        };

        Ok(Self {
            host,
            port,
            storage_dir,
            upstream: UpstreamConfig::from_env()?,
            sections,
            search_debounce: Duration::from_millis(parse_env_or(
                "STOREFRONT_SEARCH_DEBOUNCE_MS",
                300,
            )?),
            price_policy,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
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

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional environment variable, falling back to a default.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |v| parse_value(key, &v))
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Split a comma separated section list, rejecting reserved names.
fn parse_section_names(value: &str) -> Result<Vec<String>, ConfigError> {
    let names: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect();

    if let Some(reserved) = names
        .iter()
        .find(|n| n.as_str() == ALL_SECTION || n.as_str() == RESULTS_KEY)
    {
        return Err(ConfigError::InvalidEnvVar(
            "STOREFRONT_SECTIONS".to_string(),
            format!("'{reserved}' is a reserved section name"),
        ));
    }

    Ok(names)
}
