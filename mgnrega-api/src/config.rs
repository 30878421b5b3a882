//! API Configuration Module
//!
//! Everything the server needs is read once at startup into these structs
//! and passed down explicitly. Values come from environment variables (a
//! `.env` file is loaded by the binary before this runs), with defaults from
//! [`crate::constants`].

use std::net::SocketAddr;
use std::time::Duration;

use mgnrega_core::{FreshnessWindow, UpstreamCredentials};

use crate::constants::*;
use crate::error::{ApiError, ApiResult};
use crate::policy::PolicyConfig;

// ============================================================================
// HTTP SERVER
// ============================================================================

/// Listener and CORS settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_host: String,
    pub port: u16,

    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins.
    pub cors_origins: Vec<String>,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    /// Deployment environment name (production, staging, development).
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_host: DEFAULT_BIND_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origins: Vec::new(),
            cors_max_age_secs: DEFAULT_CORS_MAX_AGE_SECS,
            environment: DEFAULT_ENVIRONMENT.to_string(),
        }
    }
}

impl ApiConfig {
    /// Environment variables:
    /// - `MGNREGA_API_BIND`: bind host (default: 0.0.0.0)
    /// - `PORT`: listen port (default: 5000, also when blank); an unparsable value is an error
    /// - `MGNREGA_CORS_ORIGINS`: comma-separated allowed origins (empty = allow all)
    /// - `MGNREGA_CORS_MAX_AGE_SECS`: preflight cache duration (default: 86400)
    /// - `MGNREGA_ENVIRONMENT`: environment name (default: development)
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> ApiResult<Self> {
        let bind_host = lookup("MGNREGA_API_BIND")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_HOST.to_string());

        let port = match lookup("PORT").filter(|s| !s.trim().is_empty()) {
            Some(value) => value.trim().parse::<u16>().map_err(|_| {
                ApiError::invalid_input(format!("Invalid port value: {}", value))
            })?,
            None => DEFAULT_PORT,
        };

        let cors_origins = lookup("MGNREGA_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            bind_host,
            port,
            cors_origins,
            cors_max_age_secs: parse_or(lookup, "MGNREGA_CORS_MAX_AGE_SECS", DEFAULT_CORS_MAX_AGE_SECS),
            environment: lookup("MGNREGA_ENVIRONMENT")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
        })
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> ApiResult<SocketAddr> {
        let addr = format!("{}:{}", self.bind_host, self.port);
        addr.parse::<SocketAddr>().map_err(|e| {
            ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e))
        })
    }

    /// Whether CORS is restricted to a configured origin list.
    pub fn has_cors_allowlist(&self) -> bool {
        !self.cors_origins.is_empty()
    }

    pub fn is_production(&self) -> bool {
        matches!(
            self.environment.to_lowercase().as_str(),
            "production" | "prod"
        )
    }
}

// ============================================================================
// UPSTREAM
// ============================================================================

/// Settings for the open-data API client.
#[derive(Clone)]
pub struct UpstreamConfig {
    pub api_key: Option<String>,
    pub resource_id: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
    pub page_limit: u32,
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("resource_id", &self.resource_id)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("page_limit", &self.page_limit)
            .finish()
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            resource_id: None,
            base_url: DEFAULT_DATA_GOV_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            page_limit: DEFAULT_UPSTREAM_PAGE_LIMIT,
        }
    }
}

impl UpstreamConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_key: lookup("DATA_GOV_API_KEY"),
            resource_id: lookup("DATA_GOV_RESOURCE_ID"),
            base_url: lookup("DATA_GOV_BASE_URL")
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_DATA_GOV_BASE_URL.to_string()),
            timeout: Duration::from_secs(parse_or(
                lookup,
                "DATA_GOV_TIMEOUT_SECS",
                DEFAULT_UPSTREAM_TIMEOUT_SECS,
            )),
            page_limit: parse_or(lookup, "DATA_GOV_PAGE_LIMIT", DEFAULT_UPSTREAM_PAGE_LIMIT),
        }
    }

    /// Usable credentials, or `None` when missing, blank, or a placeholder.
    pub fn credentials(&self) -> Option<UpstreamCredentials> {
        UpstreamCredentials::from_parts(self.api_key.clone(), self.resource_id.clone())
    }
}

// ============================================================================
// STORAGE
// ============================================================================

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// PostgreSQL URL. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub pool_size: usize,
    pub cache_max_age: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            pool_size: DEFAULT_DB_POOL_SIZE,
            cache_max_age: Duration::from_secs(DEFAULT_CACHE_MAX_AGE_SECS),
        }
    }
}

impl StoreConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            database_url: lookup("DATABASE_URL").filter(|s| !s.trim().is_empty()),
            pool_size: parse_or(lookup, "MGNREGA_DB_POOL_SIZE", DEFAULT_DB_POOL_SIZE),
            cache_max_age: Duration::from_secs(parse_or(
                lookup,
                "MGNREGA_CACHE_MAX_AGE_SECS",
                DEFAULT_CACHE_MAX_AGE_SECS,
            )),
        }
    }
}

// ============================================================================
// APPLICATION
// ============================================================================

/// Complete server configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub upstream: UpstreamConfig,
    pub store: StoreConfig,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ApiResult<Self> {
        Ok(Self {
            api: ApiConfig::from_lookup(&lookup)?,
            upstream: UpstreamConfig::from_lookup(&lookup),
            store: StoreConfig::from_lookup(&lookup),
        })
    }

    /// Settings injected into the freshness policy.
    pub fn policy_config(&self) -> PolicyConfig {
        PolicyConfig {
            credentials: self.upstream.credentials(),
            window: FreshnessWindow::new(self.store.cache_max_age),
            page_limit: self.upstream.page_limit,
        }
    }
}

/// Parse a variable, falling back to `default` when unset or invalid.
fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring invalid configuration value");
            default
        }),
        None => default,
    }
}
