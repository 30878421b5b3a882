//! Response envelope: the payload plus where it came from.
//!
//! Every outcome of the freshness policy is shaped here. No decisions are
//! made in this module; each constructor corresponds to one policy branch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::record::CachedRecord;

pub const WARNING_CREDENTIALS_MISSING: &str =
    "API credentials not configured, serving cached data";
pub const WARNING_DEMO_DATA: &str =
    "Using demo data. Configure DATA_GOV_API_KEY to fetch real data.";
pub const WARNING_UPSTREAM_ERROR: &str = "Served from cache due to API error";

/// Provenance of the data in an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Cache,
    Api,
    Demo,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Cache => "cache",
            DataSource::Api => "api",
            DataSource::Demo => "demo",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform response body for `GET /api/performance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub source: DataSource,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Upstream error message when stale cache was served in its place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    /// Human-readable age, e.g. `"42 minutes"`. Only set on fresh cache hits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_age: Option<String>,
}

impl Envelope {
    /// Fresh cache hit.
    pub fn fresh_cache(record: CachedRecord, now: DateTime<Utc>) -> Self {
        let age = record.age_minutes(now);
        Self {
            source: DataSource::Cache,
            data: record.payload,
            warning: None,
            error: None,
            last_updated: Some(record.last_updated),
            cache_age: Some(format!("{} minutes", age)),
        }
    }

    /// Existing (possibly stale) record served because no credentials are set.
    pub fn unconfigured_cache(record: CachedRecord) -> Self {
        Self {
            source: DataSource::Cache,
            data: record.payload,
            warning: Some(WARNING_CREDENTIALS_MISSING.to_string()),
            error: None,
            last_updated: Some(record.last_updated),
            cache_age: None,
        }
    }

    /// Existing record served because the fresh path failed.
    pub fn stale_after_error(record: CachedRecord, error: impl Into<String>) -> Self {
        Self {
            source: DataSource::Cache,
            data: record.payload,
            warning: Some(WARNING_UPSTREAM_ERROR.to_string()),
            error: Some(error.into()),
            last_updated: Some(record.last_updated),
            cache_age: None,
        }
    }

    /// Payload just fetched from the upstream and persisted at `written_at`.
    pub fn from_api(payload: serde_json::Value, written_at: DateTime<Utc>) -> Self {
        Self {
            source: DataSource::Api,
            data: payload,
            warning: None,
            error: None,
            last_updated: Some(written_at),
            cache_age: None,
        }
    }

    /// Synthesized demo payload, persisted at `written_at`.
    pub fn demo(payload: serde_json::Value, written_at: DateTime<Utc>) -> Self {
        Self {
            source: DataSource::Demo,
            data: payload,
            warning: Some(WARNING_DEMO_DATA.to_string()),
            error: None,
            last_updated: Some(written_at),
            cache_age: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::PerformanceQuery;
    use chrono::Duration;

    fn record(age: Duration) -> (CachedRecord, DateTime<Utc>) {
        let now = Utc::now();
        let query =
            PerformanceQuery::new(Some("Bihar".to_string()), Some("Patna".to_string()))
                .expect("valid query");
        let record = CachedRecord::new(&query, serde_json::json!({"count": 1}), now - age);
        (record, now)
    }

    #[test]
    fn test_fresh_cache_reports_age() {
        let (record, now) = record(Duration::minutes(42));
        let envelope = Envelope::fresh_cache(record, now);
        assert_eq!(envelope.source, DataSource::Cache);
        assert_eq!(envelope.cache_age.as_deref(), Some("42 minutes"));
        assert!(envelope.warning.is_none());
    }

    #[test]
    fn test_stale_after_error_carries_message() {
        let (record, _) = record(Duration::hours(30));
        let envelope = Envelope::stale_after_error(record, "Upstream returned status 502");
        assert_eq!(envelope.source, DataSource::Cache);
        assert_eq!(envelope.warning.as_deref(), Some(WARNING_UPSTREAM_ERROR));
        assert_eq!(envelope.error.as_deref(), Some("Upstream returned status 502"));
    }

    #[test]
    fn test_serialization_is_camel_case_and_sparse() -> Result<(), serde_json::Error> {
        let (record, now) = record(Duration::minutes(5));
        let json = serde_json::to_value(Envelope::fresh_cache(record, now))?;

        assert_eq!(json["source"], "cache");
        assert_eq!(json["data"]["count"], 1);
        assert_eq!(json["cacheAge"], "5 minutes");
        assert!(json.get("lastUpdated").is_some());
        assert!(json.get("warning").is_none());
        assert!(json.get("error").is_none());
        Ok(())
    }

    #[test]
    fn test_demo_envelope() {
        let envelope = Envelope::demo(serde_json::json!({}), Utc::now());
        assert_eq!(envelope.source.as_str(), "demo");
        assert_eq!(envelope.warning.as_deref(), Some(WARNING_DEMO_DATA));
    }
}
