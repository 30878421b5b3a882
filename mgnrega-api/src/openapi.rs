//! OpenAPI Specification for the Tracker API
//!
//! Generated with utoipa from the route annotations and schema derives.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::health::{
    ComponentHealth, HealthStatus, LivenessResponse, ReadinessResponse,
};
use crate::routes::performance::CachedDistrictsResponse;
use crate::routes::{health, performance};
use crate::telemetry::metrics;

use mgnrega_core::{CachedRecordSummary, DataSource, Envelope};

/// OpenAPI document for the tracker API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "MGNREGA Performance Tracker API",
        version = "0.1.0",
        description = "District-level MGNREGA performance data from data.gov.in, served through a freshness-checked cache",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local Development")
    ),
    tags(
        (name = "Performance", description = "District performance lookup and cached districts"),
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Observability", description = "Prometheus metrics"),
    ),
    paths(
        performance::get_performance,
        performance::list_cached,
        health::liveness,
        health::readiness,
        metrics::metrics_handler,
    ),
    components(schemas(
        Envelope,
        DataSource,
        CachedRecordSummary,
        CachedDistrictsResponse,
        LivenessResponse,
        ReadinessResponse,
        ComponentHealth,
        HealthStatus,
        ApiError,
        ErrorCode,
    ))
)]
pub struct ApiDoc;
