//! MGNREGA Storage - Record Store Trait and Implementations
//!
//! The freshness policy reads and writes cached records only through
//! [`RecordStore`]. Two implementations are provided:
//! - [`InMemoryRecordStore`] for tests and for running without a database
//! - [`PgRecordStore`] backed by PostgreSQL through a deadpool connection pool

pub mod memory;
pub mod postgres;

pub use memory::InMemoryRecordStore;
pub use postgres::{PgRecordStore, PgStoreConfig};

use async_trait::async_trait;
use mgnrega_core::{CacheKey, CachedRecord, CachedRecordSummary, StorageResult};

/// Persistence for cached records, one record per key.
///
/// Implementations must be safe to share across concurrent requests.
/// Concurrent upserts for the same key are not coordinated: the last write wins.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Look up the record for a key.
    async fn get(&self, key: &CacheKey) -> StorageResult<Option<CachedRecord>>;

    /// Insert the record, or overwrite the existing record with the same key.
    async fn upsert(&self, record: &CachedRecord) -> StorageResult<()>;

    /// Summaries of every cached record, most recently updated first.
    async fn list_all(&self) -> StorageResult<Vec<CachedRecordSummary>>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> StorageResult<()> {
        Ok(())
    }
}
