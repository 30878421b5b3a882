//! MGNREGA Core - Domain Types
//!
//! Data structures shared by the storage and API crates: the normalized
//! cache key, the cached record, the freshness window, the response
//! envelope and the upstream data-source seam. This crate performs no I/O.

pub mod demo;
pub mod envelope;
pub mod error;
pub mod freshness;
pub mod key;
pub mod record;
pub mod upstream;

pub use demo::demo_payload;
pub use envelope::{DataSource, Envelope};
pub use error::{StorageError, StorageResult, UpstreamError, ValidationError};
pub use freshness::FreshnessWindow;
pub use key::{CacheKey, PerformanceQuery, DEFAULT_REGION};
pub use record::{CachedRecord, CachedRecordSummary};
pub use upstream::{UpstreamCredentials, UpstreamRequest, UpstreamSource, PLACEHOLDER_API_KEYS};

