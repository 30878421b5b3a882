//! Freshness window for cached records.
//!
//! A record is fresh while `now - last_updated` is strictly below the window.
//! There is no partial grading: a record is either served as-is or refetched.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Default freshness window (24 hours).
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessWindow {
    max_age: Duration,
}

impl Default for FreshnessWindow {
    fn default() -> Self {
        Self {
            max_age: DEFAULT_MAX_AGE,
        }
    }
}

impl FreshnessWindow {
    pub fn new(max_age: Duration) -> Self {
        Self { max_age }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Returns true if a record written at `last_updated` may still be served
    /// without contacting the upstream.
    pub fn is_fresh(&self, last_updated: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let age = now - last_updated;
        match chrono::Duration::from_std(self.max_age) {
            Ok(max_age) => age < max_age,
            // Windows too large for chrono never expire.
            Err(_) => true,
        }
    }
}
