//! The single persisted entity: the latest payload for a region / sub-region.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::key::{CacheKey, PerformanceQuery};

/// Most recently fetched payload for one cache key.
///
/// At most one record exists per key; writes overwrite, nothing is versioned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedRecord {
    pub key: CacheKey,
    pub region: String,
    pub sub_region: String,
    /// Upstream payload, stored as-is. Its shape is not validated.
    pub payload: serde_json::Value,
    pub last_updated: DateTime<Utc>,
}

impl CachedRecord {
    pub fn new(
        query: &PerformanceQuery,
        payload: serde_json::Value,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            key: query.cache_key(),
            region: query.region().to_string(),
            sub_region: query.sub_region().to_string(),
            payload,
            last_updated,
        }
    }

    /// Whole minutes elapsed since the last write, clamped at zero for
    /// timestamps ahead of `now`.
    pub fn age_minutes(&self, now: DateTime<Utc>) -> i64 {
        (now - self.last_updated).num_minutes().max(0)
    }

    pub fn summary(&self) -> CachedRecordSummary {
        CachedRecordSummary {
            state: self.region.clone(),
            district: self.sub_region.clone(),
            last_updated: self.last_updated,
        }
    }
}

/// Listing entry for `GET /api/performance/cached`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CachedRecordSummary {
    pub state: String,
    pub district: String,
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn query() -> PerformanceQuery {
        PerformanceQuery::new(Some("Uttar Pradesh".to_string()), Some("Varanasi".to_string()))
            .expect("valid query")
    }

    #[test]
    fn test_new_record_uses_normalized_key() {
        let record = CachedRecord::new(&query(), serde_json::json!({}), Utc::now());
        assert_eq!(record.key.as_str(), "uttar pradesh::varanasi");
        assert_eq!(record.region, "Uttar Pradesh");
        assert_eq!(record.sub_region, "Varanasi");
    }

    #[test]
    fn test_age_minutes_floors() {
        let now = Utc::now();
        let record = CachedRecord::new(
            &query(),
            serde_json::json!({}),
            now - Duration::seconds(95),
        );
        assert_eq!(record.age_minutes(now), 1);
    }

    #[test]
    fn test_age_minutes_clamps_future_timestamps() {
        let now = Utc::now();
        let record = CachedRecord::new(&query(), serde_json::json!({}), now + Duration::hours(1));
        assert_eq!(record.age_minutes(now), 0);
    }

    #[test]
    fn test_summary_serializes_camel_case() -> Result<(), serde_json::Error> {
        let record = CachedRecord::new(&query(), serde_json::json!({}), Utc::now());
        let json = serde_json::to_value(record.summary())?;
        assert_eq!(json["state"], "Uttar Pradesh");
        assert_eq!(json["district"], "Varanasi");
        assert!(json.get("lastUpdated").is_some());
        Ok(())
    }
}
