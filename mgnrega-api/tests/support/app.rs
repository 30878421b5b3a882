use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use mgnrega_api::{create_api_router, ApiConfig, AppState, FreshnessPolicy, PolicyConfig};
use mgnrega_storage::RecordStore;
use mgnrega_test_utils::{test_credentials, UpstreamSource};
use tower::ServiceExt;

pub fn policy_config(configured: bool) -> PolicyConfig {
    PolicyConfig {
        credentials: configured.then(test_credentials),
        ..PolicyConfig::default()
    }
}

pub fn test_policy(
    store: Arc<dyn RecordStore>,
    upstream: Arc<dyn UpstreamSource>,
    configured: bool,
) -> FreshnessPolicy {
    FreshnessPolicy::new(store, upstream, policy_config(configured))
}

pub fn test_app(
    store: Arc<dyn RecordStore>,
    upstream: Arc<dyn UpstreamSource>,
    configured: bool,
) -> Router {
    let policy = test_policy(store, upstream, configured);
    create_api_router(AppState::new(policy), &ApiConfig::default())
}

/// Issue a GET and decode the JSON body.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request");
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}
