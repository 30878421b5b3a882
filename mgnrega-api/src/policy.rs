//! Freshness Policy
//!
//! Decides, per request, whether a district's performance data is served
//! from the record store, fetched from the upstream API, or synthesized as
//! demo data:
//!
//! 1. A record younger than the freshness window is returned as-is.
//! 2. Otherwise, without usable credentials, any existing record is returned
//!    with a warning; with no record, demo data is stored and returned.
//! 3. Otherwise the upstream is queried and the result overwrites the record.
//! 4. Any failure along the way is answered with the existing record when
//!    there is one. Only when nothing can be substituted does the caller see
//!    an error.
//!
//! A failed store read is retried once before any of the above; if the
//! store stays unreadable the lookup fails without contacting the upstream.
//!
//! Concurrent requests for the same key are not coordinated; both may fetch
//! and the last upsert wins.

use std::sync::Arc;

use chrono::Utc;
use mgnrega_core::{
    demo_payload, CacheKey, CachedRecord, DataSource, Envelope, FreshnessWindow,
    PerformanceQuery, StorageError, UpstreamCredentials, UpstreamError, UpstreamRequest,
    UpstreamSource,
};
use mgnrega_storage::RecordStore;
use thiserror::Error;

use crate::constants::DEFAULT_UPSTREAM_PAGE_LIMIT;
use crate::telemetry::metrics;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Settings the policy needs, built once at startup.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    /// `None` when the upstream is not configured.
    pub credentials: Option<UpstreamCredentials>,
    pub window: FreshnessWindow,
    /// Records requested per upstream call.
    pub page_limit: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            window: FreshnessWindow::default(),
            page_limit: DEFAULT_UPSTREAM_PAGE_LIMIT,
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Hard failure: the lookup failed and no cached record could stand in.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PolicyError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl PolicyError {
    /// Upstream response body accompanying the failure, if any.
    pub fn details(&self) -> Option<&serde_json::Value> {
        match self {
            PolicyError::Upstream(err) => err.details(),
            PolicyError::Storage(_) => None,
        }
    }
}

// ============================================================================
// POLICY
// ============================================================================

/// Cache-first resolver over an injected store and upstream.
#[derive(Clone)]
pub struct FreshnessPolicy {
    store: Arc<dyn RecordStore>,
    upstream: Arc<dyn UpstreamSource>,
    config: Arc<PolicyConfig>,
}

impl FreshnessPolicy {
    pub fn new(
        store: Arc<dyn RecordStore>,
        upstream: Arc<dyn UpstreamSource>,
        config: PolicyConfig,
    ) -> Self {
        Self {
            store,
            upstream,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Produce the response envelope for a validated query.
    pub async fn resolve(&self, query: &PerformanceQuery) -> Result<Envelope, PolicyError> {
        let key = query.cache_key();

        let cached = match self.store.get(&key).await {
            Ok(cached) => cached,
            Err(err) => self.reread_after_error(&key, err).await?,
        };

        let now = Utc::now();
        if let Some(record) = cached.as_ref() {
            if self.config.window.is_fresh(record.last_updated, now) {
                tracing::info!(
                    key = %key,
                    source = DataSource::Cache.as_str(),
                    age_minutes = record.age_minutes(now),
                    "Serving fresh cached record"
                );
                return Ok(Envelope::fresh_cache(record.clone(), now));
            }
        }

        let refreshed = match self.config.credentials.as_ref() {
            Some(credentials) => self.refresh(query, credentials).await,
            None => self.without_credentials(query, cached.as_ref()).await,
        };

        match refreshed {
            Ok(envelope) => Ok(envelope),
            Err(err) => stale_or_fail(&key, cached, err),
        }
    }

    /// Fetch from upstream and overwrite the stored record.
    async fn refresh(
        &self,
        query: &PerformanceQuery,
        credentials: &UpstreamCredentials,
    ) -> Result<Envelope, PolicyError> {
        let key = query.cache_key();
        tracing::info!(key = %key, "Fetching from upstream");

        let request = UpstreamRequest {
            credentials,
            region: query.region(),
            sub_region: query.sub_region(),
            limit: self.config.page_limit,
        };
        let fetched = self.upstream.fetch(request).await;
        metrics::record_upstream_fetch(upstream_outcome(&fetched));
        let payload = fetched?;

        let record = CachedRecord::new(query, payload, Utc::now());
        self.store.upsert(&record).await?;

        tracing::info!(key = %key, source = DataSource::Api.as_str(), "Stored upstream data");
        Ok(Envelope::from_api(record.payload, record.last_updated))
    }

    /// Serve the existing record, or store and serve demo data.
    ///
    /// A stored demo record is reused by later requests for the same key,
    /// even after credentials are configured, until it goes stale.
    async fn without_credentials(
        &self,
        query: &PerformanceQuery,
        cached: Option<&CachedRecord>,
    ) -> Result<Envelope, PolicyError> {
        if let Some(record) = cached {
            tracing::warn!(
                key = %record.key,
                source = DataSource::Cache.as_str(),
                "Upstream credentials not configured, serving cached record"
            );
            return Ok(Envelope::unconfigured_cache(record.clone()));
        }

        let record = CachedRecord::new(query, demo_payload(query), Utc::now());
        self.store.upsert(&record).await?;

        tracing::warn!(
            key = %record.key,
            source = DataSource::Demo.as_str(),
            "Upstream credentials not configured, serving demo data"
        );
        Ok(Envelope::demo(record.payload, record.last_updated))
    }

    /// The first read failed. Read once more; a successful retry resumes
    /// the normal freshness decision. A second failure is logged and the
    /// original error returned without contacting the upstream.
    async fn reread_after_error(
        &self,
        key: &CacheKey,
        err: StorageError,
    ) -> Result<Option<CachedRecord>, PolicyError> {
        tracing::error!(key = %key, error = %err, "Failed to read cached record");

        match self.store.get(key).await {
            Ok(cached) => {
                tracing::info!(key = %key, "Cached record read succeeded on retry");
                Ok(cached)
            }
            Err(retry_err) => {
                tracing::error!(
                    key = %key,
                    error = %retry_err,
                    "Failed to read cached record on retry"
                );
                Err(err.into())
            }
        }
    }
}

/// Substitute the existing record for a failed refresh, or surface the error.
fn stale_or_fail(
    key: &CacheKey,
    cached: Option<CachedRecord>,
    err: PolicyError,
) -> Result<Envelope, PolicyError> {
    match cached {
        Some(record) => {
            tracing::warn!(
                key = %key,
                source = DataSource::Cache.as_str(),
                error = %err,
                "Serving cached record after failure"
            );
            Ok(Envelope::stale_after_error(record, err.to_string()))
        }
        None => {
            tracing::error!(key = %key, error = %err, "No cached record to fall back on");
            Err(err)
        }
    }
}

fn upstream_outcome(result: &Result<serde_json::Value, UpstreamError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(UpstreamError::Timeout(_)) => "timeout",
        Err(UpstreamError::Status { .. }) => "status",
        Err(UpstreamError::Network(_)) => "network",
        Err(UpstreamError::InvalidResponse(_)) => "invalid_response",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_error_details_only_for_upstream_status() {
        let err = PolicyError::from(UpstreamError::Status {
            status: 502,
            body: Some(serde_json::json!({"error": "bad gateway"})),
        });
        assert_eq!(err.details(), Some(&serde_json::json!({"error": "bad gateway"})));

        let err = PolicyError::from(StorageError::LockPoisoned);
        assert!(err.details().is_none());
    }

    #[test]
    fn test_policy_error_message_is_transparent() {
        let err = PolicyError::from(UpstreamError::Network("connection reset".to_string()));
        assert_eq!(err.to_string(), "Network error: connection reset");
    }

    #[test]
    fn test_upstream_outcome_labels() {
        assert_eq!(upstream_outcome(&Ok(serde_json::json!({}))), "success");
        assert_eq!(
            upstream_outcome(&Err(UpstreamError::Timeout(std::time::Duration::from_secs(15)))),
            "timeout"
        );
    }

    #[test]
    fn test_default_config_is_unconfigured() {
        let config = PolicyConfig::default();
        assert!(config.credentials.is_none());
        assert_eq!(config.page_limit, 100);
    }
}
