//! Region / sub-region query and the normalized cache key derived from it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Region used when the caller does not name one.
pub const DEFAULT_REGION: &str = "Uttar Pradesh";

/// Normalized composite key: `lowercase("{region}::{sub_region}")`.
///
/// Two queries that differ only in letter case resolve to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(region: &str, sub_region: &str) -> Self {
        Self(format!("{}::{}", region, sub_region).to_lowercase())
    }

    /// Wrap an already-normalized key, e.g. one read back from storage.
    pub fn from_normalized(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated performance lookup: a region (state) and a required
/// sub-region (district), kept as the caller spelled them for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformanceQuery {
    region: String,
    sub_region: String,
}

impl PerformanceQuery {
    /// Build a query from optional request parameters.
    ///
    /// Both values are trimmed. A missing or blank region falls back to
    /// [`DEFAULT_REGION`]; a missing or blank sub-region is rejected.
    pub fn new(
        region: Option<String>,
        sub_region: Option<String>,
    ) -> Result<Self, ValidationError> {
        let sub_region = non_blank(sub_region).ok_or_else(|| {
            ValidationError::RequiredFieldMissing {
                field: "district".to_string(),
            }
        })?;
        let region = non_blank(region).unwrap_or_else(|| DEFAULT_REGION.to_string());

        Ok(Self { region, sub_region })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn sub_region(&self) -> &str {
        &self.sub_region
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(&self.region, &self.sub_region)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_key_is_case_folded() {
        let a = CacheKey::new("Uttar Pradesh", "Varanasi");
        let b = CacheKey::new("uttar pradesh", "VARANASI");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "uttar pradesh::varanasi");
    }

    #[test]
    fn test_query_defaults_region() {
        let query = PerformanceQuery::new(None, Some("Lucknow".to_string()))
            .expect("district present");
        assert_eq!(query.region(), DEFAULT_REGION);
        assert_eq!(query.sub_region(), "Lucknow");
    }

    #[test]
    fn test_query_requires_sub_region() {
        let err = PerformanceQuery::new(Some("Bihar".to_string()), None).unwrap_err();
        assert_eq!(
            err,
            ValidationError::RequiredFieldMissing {
                field: "district".to_string()
            }
        );
    }

    #[test]
    fn test_query_rejects_blank_sub_region() {
        assert!(PerformanceQuery::new(None, Some("   ".to_string())).is_err());
        assert!(PerformanceQuery::new(None, Some(String::new())).is_err());
    }

    #[test]
    fn test_query_blank_region_defaults_and_values_are_trimmed() {
        let query = PerformanceQuery::new(Some(" ".to_string()), Some(" Varanasi ".to_string()))
            .expect("district present");
        assert_eq!(query.region(), DEFAULT_REGION);
        assert_eq!(query.sub_region(), "Varanasi");
        assert_eq!(query.cache_key().as_str(), "uttar pradesh::varanasi");
    }

    #[test]
    fn test_query_keeps_display_spelling() {
        let query =
            PerformanceQuery::new(Some("Kerala".to_string()), Some("Wayanad".to_string()))
                .expect("valid query");
        assert_eq!(query.region(), "Kerala");
        assert_eq!(query.cache_key().as_str(), "kerala::wayanad");
    }

    proptest! {
        #[test]
        fn prop_key_ignores_ascii_case(region in "[A-Za-z ]{1,20}", district in "[A-Za-z]{1,20}") {
            let upper = CacheKey::new(&region.to_uppercase(), &district.to_uppercase());
            let lower = CacheKey::new(&region.to_lowercase(), &district.to_lowercase());
            prop_assert_eq!(upper, lower);
        }

        #[test]
        fn prop_key_keeps_separator(region in "[a-z]{1,12}", district in "[a-z]{1,12}") {
            let key = CacheKey::new(&region, &district);
            prop_assert_eq!(key.as_str(), format!("{}::{}", region, district));
        }
    }
}
