//! Constants for the Tracker API
//!
//! Defaults for every environment-driven setting live here so that
//! configuration, tests, and documentation agree.

// ============================================================================
// UPSTREAM
// ============================================================================

/// Base URL of the open-data resource API; the resource id is appended.
pub const DEFAULT_DATA_GOV_BASE_URL: &str = "https://api.data.gov.in/resource";

/// Upstream request timeout in seconds
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 15;

/// Records requested per upstream call
pub const DEFAULT_UPSTREAM_PAGE_LIMIT: u32 = 100;

/// User-Agent sent to the upstream API
pub const UPSTREAM_USER_AGENT: &str = "MGNREGA-Performance-Tracker/1.0";

// ============================================================================
// STORAGE
// ============================================================================

/// Default PostgreSQL pool size
pub const DEFAULT_DB_POOL_SIZE: usize = 16;

/// Freshness window in seconds (24 hours)
pub const DEFAULT_CACHE_MAX_AGE_SECS: u64 = 86400;

// ============================================================================
// SERVER
// ============================================================================

pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

pub const DEFAULT_PORT: u16 = 5000;

pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Default CORS max age in seconds (24 hours)
pub const DEFAULT_CORS_MAX_AGE_SECS: u64 = 86400;

/// Default tracing filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "mgnrega_api=debug,tower_http=info,info";

// ============================================================================
// RESPONSES
// ============================================================================

/// Usage example returned with a missing-district error
pub const EXAMPLE_PERFORMANCE_QUERY: &str =
    "/api/performance?state=Uttar Pradesh&district=Varanasi";

/// Message returned when the cached-district listing fails
pub const CACHED_LIST_FAILED_MESSAGE: &str = "Failed to fetch cached districts";
