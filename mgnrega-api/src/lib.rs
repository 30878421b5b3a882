//! MGNREGA Tracker API - REST Layer
//!
//! Serves district-level MGNREGA performance data. Lookups go through the
//! [`FreshnessPolicy`], which answers from the record store while entries
//! are fresh, refreshes them from the data.gov.in resource API when they are
//! not, and degrades to stale or demo data when the upstream is unavailable
//! or unconfigured.

pub mod config;
pub mod constants;
pub mod error;
pub mod macros;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod policy;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod upstream;

// Re-export commonly used types
pub use config::{ApiConfig, AppConfig, StoreConfig, UpstreamConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use policy::{FreshnessPolicy, PolicyConfig, PolicyError};
pub use routes::create_api_router;
pub use state::AppState;
pub use upstream::DataGovClient;
