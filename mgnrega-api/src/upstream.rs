//! data.gov.in resource API client.
//!
//! Performs a single filtered GET per lookup:
//! `{base_url}/{resource_id}?api-key=..&format=json&limit=..&filters[state_name]=..&filters[district_name]=..`
//!
//! Clone is cheap: `reqwest::Client` shares its connection pool internally.

use std::time::Duration;

use async_trait::async_trait;
use mgnrega_core::{UpstreamError, UpstreamRequest, UpstreamSource};
use reqwest::{header, Client};

use crate::config::UpstreamConfig;
use crate::constants::UPSTREAM_USER_AGENT;
use crate::error::{ApiError, ApiResult};

#[derive(Clone)]
pub struct DataGovClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl DataGovClient {
    pub fn new(config: &UpstreamConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(UPSTREAM_USER_AGENT)
            .build()
            .map_err(|e| ApiError::internal_error(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    fn resource_url(&self, resource_id: &str) -> String {
        format!("{}/{}", self.base_url, resource_id)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout(self.timeout)
        } else {
            UpstreamError::Network(err.to_string())
        }
    }
}

/// Decode a success body. Empty bodies and JSON `null` become `{}`.
fn parse_payload(body: &str) -> Result<serde_json::Value, UpstreamError> {
    if body.trim().is_empty() {
        return Ok(serde_json::json!({}));
    }
    match serde_json::from_str(body) {
        Ok(serde_json::Value::Null) => Ok(serde_json::json!({})),
        Ok(value) => Ok(value),
        Err(e) => Err(UpstreamError::InvalidResponse(e.to_string())),
    }
}

/// Keep a failure body as details when it parses as JSON.
fn parse_error_body(body: &str) -> Option<serde_json::Value> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .filter(|value| !value.is_null())
}

#[async_trait]
impl UpstreamSource for DataGovClient {
    async fn fetch(&self, request: UpstreamRequest<'_>) -> Result<serde_json::Value, UpstreamError> {
        let url = self.resource_url(request.credentials.resource_id());
        let limit = request.limit.to_string();

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(&[
                ("api-key", request.credentials.api_key()),
                ("format", "json"),
                ("limit", limit.as_str()),
                ("filters[state_name]", request.region),
                ("filters[district_name]", request.sub_region),
            ])
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Upstream returned an error status");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: parse_error_body(&body),
            });
        }

        parse_payload(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_url_strips_trailing_slash() -> ApiResult<()> {
        let config = UpstreamConfig {
            base_url: "http://localhost:9000/resource/".to_string(),
            ..UpstreamConfig::default()
        };
        let client = DataGovClient::new(&config)?;
        assert_eq!(
            client.resource_url("abc-123"),
            "http://localhost:9000/resource/abc-123"
        );
        Ok(())
    }

    #[test]
    fn test_parse_payload_empty_and_null() -> Result<(), UpstreamError> {
        assert_eq!(parse_payload("")?, serde_json::json!({}));
        assert_eq!(parse_payload("  \n")?, serde_json::json!({}));
        assert_eq!(parse_payload("null")?, serde_json::json!({}));
        Ok(())
    }

    #[test]
    fn test_parse_payload_records() -> Result<(), UpstreamError> {
        let payload = parse_payload(r#"{"records":[{"district_name":"Gaya"}],"total":1}"#)?;
        assert_eq!(payload["records"][0]["district_name"], "Gaya");
        Ok(())
    }

    #[test]
    fn test_parse_payload_rejects_garbage() {
        assert!(matches!(
            parse_payload("<html>"),
            Err(UpstreamError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_parse_error_body() {
        assert_eq!(
            parse_error_body(r#"{"message":"Invalid API key"}"#),
            Some(serde_json::json!({"message": "Invalid API key"}))
        );
        assert_eq!(parse_error_body("Forbidden"), None);
        assert_eq!(parse_error_body(""), None);
    }
}
