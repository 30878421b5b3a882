//! MGNREGA Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - A scripted upstream that counts calls
//! - A record store that always fails
//! - Record fixtures with controllable age
//! - Proptest strategies for state / district names

pub use mgnrega_storage::InMemoryRecordStore;

pub use mgnrega_core::{
    CacheKey, CachedRecord, CachedRecordSummary, DataSource, Envelope, FreshnessWindow,
    PerformanceQuery, StorageError, StorageResult, UpstreamCredentials, UpstreamError,
    UpstreamRequest, UpstreamSource,
};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use mgnrega_storage::RecordStore;
use proptest::prelude::*;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// ============================================================================
// SCRIPTED UPSTREAM
// ============================================================================

/// Upstream fake that replays queued results and records every call.
///
/// When the queue is empty it answers with its fallback result.
#[derive(Debug)]
pub struct ScriptedUpstream {
    queue: Mutex<VecDeque<Result<serde_json::Value, UpstreamError>>>,
    fallback: Result<serde_json::Value, UpstreamError>,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, String, u32)>>,
}

impl ScriptedUpstream {
    /// Always succeeds with `payload`.
    pub fn succeeding(payload: serde_json::Value) -> Self {
        Self::with_fallback(Ok(payload))
    }

    /// Always fails with `error`.
    pub fn failing(error: UpstreamError) -> Self {
        Self::with_fallback(Err(error))
    }

    fn with_fallback(fallback: Result<serde_json::Value, UpstreamError>) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Queue a one-shot result ahead of the fallback.
    pub fn then(self, result: Result<serde_json::Value, UpstreamError>) -> Self {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(result);
        }
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(region, sub_region, limit)` for every call, in order.
    pub fn requests(&self) -> Vec<(String, String, u32)> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl UpstreamSource for ScriptedUpstream {
    async fn fetch(&self, request: UpstreamRequest<'_>) -> Result<serde_json::Value, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push((
                request.region.to_string(),
                request.sub_region.to_string(),
                request.limit,
            ));
        }

        let queued = self.queue.lock().ok().and_then(|mut q| q.pop_front());
        queued.unwrap_or_else(|| self.fallback.clone())
    }
}

// ============================================================================
// FAILING STORE
// ============================================================================

/// Record store whose every operation fails.
#[derive(Debug, Default, Clone)]
pub struct FailingStore;

fn unavailable(operation: &str) -> StorageError {
    StorageError::Query {
        operation: operation.to_string(),
        reason: "store unavailable".to_string(),
    }
}

#[async_trait]
impl RecordStore for FailingStore {
    async fn get(&self, _key: &CacheKey) -> StorageResult<Option<CachedRecord>> {
        Err(unavailable("get"))
    }

    async fn upsert(&self, _record: &CachedRecord) -> StorageResult<()> {
        Err(unavailable("upsert"))
    }

    async fn list_all(&self) -> StorageResult<Vec<CachedRecordSummary>> {
        Err(unavailable("list_all"))
    }

    async fn ping(&self) -> StorageResult<()> {
        Err(unavailable("ping"))
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub fn query(state: &str, district: &str) -> PerformanceQuery {
    PerformanceQuery::new(Some(state.to_string()), Some(district.to_string()))
        .unwrap_or_else(|e| panic!("invalid fixture query {}/{}: {}", state, district, e))
}

/// Record for `state`/`district` last written `age` ago.
pub fn record_aged(state: &str, district: &str, age: Duration) -> CachedRecord {
    CachedRecord::new(
        &query(state, district),
        serde_json::json!({
            "records": [{"state_name": state, "district_name": district, "month": "July"}],
            "total": 1,
            "count": 1,
        }),
        Utc::now() - age,
    )
}

pub fn test_credentials() -> UpstreamCredentials {
    UpstreamCredentials::from_parts(
        Some("real-looking-key".to_string()),
        Some("ee03643a-ee4c-48c2-ac30-9f2ff26ab722".to_string()),
    )
    .unwrap_or_else(|| panic!("fixture credentials must be accepted"))
}

/// Payload shaped like a data.gov.in resource response.
pub fn upstream_payload(state: &str, district: &str) -> serde_json::Value {
    serde_json::json!({
        "status": "ok",
        "total": 1,
        "count": 1,
        "records": [{
            "state_name": state,
            "district_name": district,
            "total_workers": "98000",
            "month": "November",
        }],
    })
}

// ============================================================================
// PROPTEST STRATEGIES
// ============================================================================

/// State names: ASCII words with single spaces.
pub fn state_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Uttar Pradesh".to_string()),
        Just("Madhya Pradesh".to_string()),
        Just("Tamil Nadu".to_string()),
        "[A-Z][a-z]{2,10}( [A-Z][a-z]{2,10})?",
    ]
}

/// District names: a capitalized ASCII word.
pub fn district_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Varanasi".to_string()),
        Just("Lucknow".to_string()),
        "[A-Z][a-z]{2,12}",
    ]
}

/// Re-case a string one character at a time.
pub fn mixed_case(input: &str, mask: &[bool]) -> String {
    input
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if mask.get(i % mask.len().max(1)).copied().unwrap_or(false) {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}
