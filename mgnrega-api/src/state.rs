//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use mgnrega_storage::RecordStore;

use crate::policy::FreshnessPolicy;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub policy: FreshnessPolicy,
    /// Same store the policy uses; read directly by the listing and readiness routes.
    pub store: Arc<dyn RecordStore>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(policy: FreshnessPolicy) -> Self {
        Self {
            store: Arc::clone(policy.store()),
            policy,
            start_time: Instant::now(),
        }
    }
}

crate::impl_from_ref!(FreshnessPolicy, policy);
crate::impl_from_ref!(Arc<dyn RecordStore>, store);
crate::impl_from_ref!(Instant, start_time);
