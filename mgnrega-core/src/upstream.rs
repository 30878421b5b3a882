//! Upstream open-data source seam.
//!
//! The HTTP client lives in the API crate; tests substitute scripted fakes.

use async_trait::async_trait;
use std::fmt;

use crate::error::UpstreamError;

/// API key values shipped in sample env files. Treated as "not configured".
pub const PLACEHOLDER_API_KEYS: &[&str] = &[
    "test_api_key",
    "your_api_key",
    "your_api_key_here",
    "changeme",
];

/// Credentials for the upstream API. Only constructible from usable values.
#[derive(Clone, PartialEq, Eq)]
pub struct UpstreamCredentials {
    api_key: String,
    resource_id: String,
}

impl UpstreamCredentials {
    /// Returns `None` when either part is missing or blank, or when the key
    /// is a known placeholder.
    pub fn from_parts(api_key: Option<String>, resource_id: Option<String>) -> Option<Self> {
        let api_key = api_key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())?;
        let resource_id = resource_id
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())?;

        if PLACEHOLDER_API_KEYS
            .iter()
            .any(|placeholder| api_key.eq_ignore_ascii_case(placeholder))
        {
            return None;
        }

        Some(Self {
            api_key,
            resource_id,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }
}

// Never print the key.
impl fmt::Debug for UpstreamCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamCredentials")
            .field("api_key", &"<redacted>")
            .field("resource_id", &self.resource_id)
            .finish()
    }
}

/// One filtered fetch against the upstream.
#[derive(Debug, Clone, Copy)]
pub struct UpstreamRequest<'a> {
    pub credentials: &'a UpstreamCredentials,
    pub region: &'a str,
    pub sub_region: &'a str,
    pub limit: u32,
}

/// External data source for performance statistics.
#[async_trait]
pub trait UpstreamSource: Send + Sync {
    /// Fetch the payload for one region / sub-region.
    async fn fetch(&self, request: UpstreamRequest<'_>) -> Result<serde_json::Value, UpstreamError>;
}
