//! DataGovClient against a local mock of the data.gov.in resource endpoint.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    extract::{Path, Query},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use mgnrega_api::constants::UPSTREAM_USER_AGENT;
use mgnrega_api::{DataGovClient, UpstreamConfig};
use mgnrega_test_utils::{test_credentials, UpstreamError, UpstreamRequest, UpstreamSource};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Echoes the resource id, query parameters and user agent back as JSON.
async fn echo(
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Json<Value> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    Json(json!({
        "resource": id,
        "params": params,
        "user_agent": user_agent,
        "records": [],
    }))
}

async fn forbidden() -> impl IntoResponse {
    (
        StatusCode::FORBIDDEN,
        Json(json!({"message": "Invalid API key"})),
    )
}

async fn empty_ok() -> StatusCode {
    StatusCode::OK
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({"records": []}))
}

async fn not_json() -> &'static str {
    "<html>maintenance</html>"
}

async fn spawn_mock(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock upstream");
    let addr = listener.local_addr().expect("mock address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

fn client_for(base_url: String, timeout: Duration) -> DataGovClient {
    let config = UpstreamConfig {
        base_url,
        timeout,
        ..UpstreamConfig::default()
    };
    DataGovClient::new(&config).expect("client builds")
}

async fn fetch(client: &DataGovClient) -> Result<Value, UpstreamError> {
    let credentials = test_credentials();
    client
        .fetch(UpstreamRequest {
            credentials: &credentials,
            region: "Uttar Pradesh",
            sub_region: "Varanasi",
            limit: 100,
        })
        .await
}

#[tokio::test]
async fn sends_filters_key_and_user_agent() -> Result<(), UpstreamError> {
    let addr = spawn_mock(Router::new().route("/resource/:id", get(echo))).await;
    let client = client_for(format!("http://{}/resource/", addr), Duration::from_secs(5));

    let body = fetch(&client).await?;

    assert_eq!(body["resource"], "ee03643a-ee4c-48c2-ac30-9f2ff26ab722");
    assert_eq!(body["params"]["api-key"], "real-looking-key");
    assert_eq!(body["params"]["format"], "json");
    assert_eq!(body["params"]["limit"], "100");
    assert_eq!(body["params"]["filters[state_name]"], "Uttar Pradesh");
    assert_eq!(body["params"]["filters[district_name]"], "Varanasi");
    assert_eq!(body["user_agent"], UPSTREAM_USER_AGENT);
    Ok(())
}

#[tokio::test]
async fn error_status_keeps_json_body() {
    let addr = spawn_mock(Router::new().route("/resource/:id", get(forbidden))).await;
    let client = client_for(format!("http://{}/resource", addr), Duration::from_secs(5));

    match fetch(&client).await {
        Err(UpstreamError::Status { status, body }) => {
            assert_eq!(status, 403);
            assert_eq!(body, Some(json!({"message": "Invalid API key"})));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn empty_success_body_becomes_empty_object() -> Result<(), UpstreamError> {
    let addr = spawn_mock(Router::new().route("/resource/:id", get(empty_ok))).await;
    let client = client_for(format!("http://{}/resource", addr), Duration::from_secs(5));

    assert_eq!(fetch(&client).await?, json!({}));
    Ok(())
}

#[tokio::test]
async fn non_json_success_body_is_invalid_response() {
    let addr = spawn_mock(Router::new().route("/resource/:id", get(not_json))).await;
    let client = client_for(format!("http://{}/resource", addr), Duration::from_secs(5));

    assert!(matches!(
        fetch(&client).await,
        Err(UpstreamError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let addr = spawn_mock(Router::new().route("/resource/:id", get(slow))).await;
    let timeout = Duration::from_millis(200);
    let client = client_for(format!("http://{}/resource", addr), timeout);

    match fetch(&client).await {
        Err(UpstreamError::Timeout(elapsed)) => assert_eq!(elapsed, timeout),
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn closed_port_is_a_network_error() {
    // Bind then drop to find a port with nothing listening.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        listener.local_addr().expect("ephemeral address")
    };
    let client = client_for(format!("http://{}/resource", addr), Duration::from_secs(5));

    assert!(matches!(
        fetch(&client).await,
        Err(UpstreamError::Network(_))
    ));
}
