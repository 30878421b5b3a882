//! Performance REST API Routes
//!
//! - `GET /api/performance?state=&district=`: envelope for one district
//! - `GET /api/performance/cached`: every cached district, newest first

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use mgnrega_core::{CachedRecordSummary, Envelope, PerformanceQuery};
use serde::{Deserialize, Serialize};

use crate::constants::CACHED_LIST_FAILED_MESSAGE;
use crate::error::{ApiError, ApiResult};
use crate::policy::FreshnessPolicy;
use crate::state::AppState;
use crate::telemetry::metrics;

// ============================================================================
// TYPES
// ============================================================================

/// Query parameters for `GET /api/performance`.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct PerformanceParams {
    /// State name; defaults to "Uttar Pradesh"
    pub state: Option<String>,
    /// District name (required)
    pub district: Option<String>,
}

/// Response for `GET /api/performance/cached`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CachedDistrictsResponse {
    pub count: usize,
    pub districts: Vec<CachedRecordSummary>,
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// Get performance data for a district.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/performance",
    tag = "Performance",
    params(PerformanceParams),
    responses(
        (status = 200, description = "Performance data with provenance", body = Envelope),
        (status = 400, description = "District missing", body = ApiError),
        (status = 500, description = "Fetch failed and nothing cached", body = ApiError),
    ),
))]
pub async fn get_performance(
    State(policy): State<FreshnessPolicy>,
    Query(params): Query<PerformanceParams>,
) -> ApiResult<Json<Envelope>> {
    let query = PerformanceQuery::new(params.state, params.district)?;

    let envelope = policy.resolve(&query).await?;
    metrics::record_performance_response(envelope.source.as_str());

    Ok(Json(envelope))
}

/// List cached districts.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/performance/cached",
    tag = "Performance",
    responses(
        (status = 200, description = "Cached districts, newest first", body = CachedDistrictsResponse),
        (status = 500, description = "Record store unavailable", body = ApiError),
    ),
))]
pub async fn list_cached(State(policy): State<FreshnessPolicy>) -> ApiResult<Json<CachedDistrictsResponse>> {
    let districts = policy.store().list_all().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to list cached districts");
        ApiError::database_error(CACHED_LIST_FAILED_MESSAGE).with_error(e.to_string())
    })?;

    Ok(Json(CachedDistrictsResponse {
        count: districts.len(),
        districts,
    }))
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/api/performance", get(get_performance))
        .route("/api/performance/cached", get(list_cached))
}
