//! REST API Routes Module
//!
//! Includes:
//! - District performance lookup and the cached-district listing
//! - Health check endpoints
//! - Prometheus metrics and the OpenAPI document
//! - CORS support for the browser client

pub mod health;
pub mod performance;

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::state::AppState;
use crate::telemetry::{metrics_handler, observability_middleware};

pub use health::create_router as health_router;
pub use performance::create_router as performance_router;

// ============================================================================
// OPENAPI ENDPOINT
// ============================================================================

/// Handler for /openapi.json endpoint.
#[cfg(feature = "openapi")]
async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi;
    axum::Json(crate::openapi::ApiDoc::openapi())
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// With no configured origins any origin is allowed; otherwise only the
/// configured list.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if !config.has_cors_allowlist() {
        if config.is_production() {
            tracing::warn!("CORS: no origins configured in production, allowing all origins");
        } else {
            tracing::info!("CORS: allowing all origins");
        }
        cors.allow_origin(Any)
    } else {
        tracing::info!("CORS: allowing origins: {:?}", config.cors_origins);
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the complete API router.
///
/// Layer order: CORS (outermost) -> Observability -> Handler.
pub fn create_api_router(state: AppState, config: &ApiConfig) -> Router {
    let router = Router::new()
        .merge(performance_router())
        .merge(health_router())
        .route("/metrics", get(metrics_handler));

    #[cfg(feature = "openapi")]
    let router = router.route("/openapi.json", get(openapi_json));

    router.with_state(state).layer(
        ServiceBuilder::new()
            .layer(build_cors_layer(config))
            .layer(from_fn(observability_middleware)),
    )
}
