//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GOLDEN_ERA_API_URL` - Backend origin (e.g., <https://api.goldenera.example>).
//!   The `/api` prefix is appended by the client.
//!
//! ## Optional
//! - `GOLDEN_ERA_USER_ID` - Cart/wishlist owner (default: guest)
//! - `GOLDEN_ERA_STORAGE_PATH` - Durable client-state file
//!   (default: golden-era/client-state.json)
//! - `GOLDEN_ERA_HTTP_TIMEOUT_SECS` - Transport timeout (default: 30)
//! - `GOLDEN_ERA_MAX_RETRIES` - Retry budget per request (default: 3)
//! - `GOLDEN_ERA_RETRY_BASE_MS` - Backoff base delay (default: 1000)
//! - `GOLDEN_ERA_DEBOUNCE_MS` - Search debounce quiet window (default: 300)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use golden_era_core::UserId;

use crate::http::RetryPolicy;

const DEFAULT_STORAGE_PATH: &str = "golden-era/client-state.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin; requests go to `{api_url}/api/...`
    pub api_url: Url,
    /// Owner of the cart/wishlist collections
    pub user_id: UserId,
    /// Path of the durable client-state file (auth token, recent searches)
    pub storage_path: PathBuf,
    /// Transport-level timeout applied to every request
    pub http_timeout: Duration,
    /// Retry/backoff policy for transient failures
    pub retry: RetryPolicy,
    /// Quiet window before a keystroke triggers a suggestion fetch
    pub debounce: Duration,
}

impl ClientConfig {
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

        let api_url = get_required_env("GOLDEN_ERA_API_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("GOLDEN_ERA_API_URL".to_string(), e.to_string())
            })?;

        let user_id = get_optional_env("GOLDEN_ERA_USER_ID")
            .map_or_else(UserId::guest, UserId::new);

        let storage_path =
            PathBuf::from(get_env_or_default("GOLDEN_ERA_STORAGE_PATH", DEFAULT_STORAGE_PATH));

        let http_timeout =
            Duration::from_secs(parse_env_or("GOLDEN_ERA_HTTP_TIMEOUT_SECS", 30)?);
        let max_retries = parse_env_or("GOLDEN_ERA_MAX_RETRIES", 3)?;
        let base_delay = Duration::from_millis(parse_env_or("GOLDEN_ERA_RETRY_BASE_MS", 1000)?);
        let debounce = Duration::from_millis(parse_env_or("GOLDEN_ERA_DEBOUNCE_MS", 300)?);

        Ok(Self {
            api_url,
            user_id,
            storage_path,
            http_timeout,
            retry: RetryPolicy {
                max_retries,
                base_delay,
            },
            debounce,
        })
    }

    /// Build a config programmatically, with defaults for everything but the
    /// backend origin. Primarily for tests and embedding.
    #[must_use]
    pub fn for_origin(api_url: Url) -> Self {
        Self {
            api_url,
            user_id: UserId::guest(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            http_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            debounce: Duration::from_millis(300),
        }
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

/// Parse a numeric environment variable, falling back to a default when unset.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}
