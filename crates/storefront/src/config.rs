//! Widget configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `GREEN_CART_API_BASE` - Catalog API base URL (default: <https://openapi.programming-hero.com/api>)
//! - `GREEN_CART_STORAGE_DIR` - Directory backing the local key-value store (default: `.green-cart`)
//! - `GREEN_CART_SNAPSHOT_PATH` - Where the binary writes the rendered page (default: `green-cart.html`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default catalog API base URL.
pub const DEFAULT_API_BASE: &str = "https://openapi.programming-hero.com/api";

/// Storage key holding the persisted cart.
pub const CART_STORAGE_KEY: &str = "green_cart_v1_v2";

const DEFAULT_STORAGE_DIR: &str = ".green-cart";
const DEFAULT_SNAPSHOT_PATH: &str = "green-cart.html";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Widget configuration.
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    /// Catalog API base URL, without a trailing slash
    pub api_base: String,
    /// Directory backing the file key-value store
    pub storage_dir: PathBuf,
    /// Storage key for the cart
    pub cart_key: String,
    /// Output path for rendered page snapshots
    pub snapshot_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            cart_key: CART_STORAGE_KEY.to_string(),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl WidgetConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base = match get_optional_env("GREEN_CART_API_BASE") {
            Some(raw) => parse_api_base(&raw)
                .map_err(|e| ConfigError::InvalidEnvVar("GREEN_CART_API_BASE".to_string(), e))?,
            None => DEFAULT_API_BASE.to_string(),
        };

        Ok(Self {
            api_base,
            storage_dir: PathBuf::from(get_env_or_default(
                "GREEN_CART_STORAGE_DIR",
                DEFAULT_STORAGE_DIR,
            )),
            cart_key: CART_STORAGE_KEY.to_string(),
            snapshot_path: PathBuf::from(get_env_or_default(
                "GREEN_CART_SNAPSHOT_PATH",
                DEFAULT_SNAPSHOT_PATH,
            )),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Replace the API base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base` is not an absolute http(s) URL.
    pub fn with_api_base(mut self, base: &str) -> Result<Self, ConfigError> {
        self.api_base = parse_api_base(base)
            .map_err(|e| ConfigError::InvalidEnvVar("api_base".to_string(), e))?;
        Ok(self)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Validate an API base URL and strip any trailing slash.
fn parse_api_base(raw: &str) -> Result<String, String> {
    let url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url.as_str().trim_end_matches('/').to_string()),
        other => Err(format!("unsupported scheme '{other}'")),
    }
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}
