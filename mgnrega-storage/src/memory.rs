//! Process-local record store.

use async_trait::async_trait;
use mgnrega_core::{CacheKey, CachedRecord, CachedRecordSummary, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::RecordStore;

/// In-memory record store. Contents are lost on restart.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<HashMap<CacheKey, CachedRecord>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get(&self, key: &CacheKey) -> StorageResult<Option<CachedRecord>> {
        let records = self.records.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(records.get(key).cloned())
    }

    async fn upsert(&self, record: &CachedRecord) -> StorageResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StorageError::LockPoisoned)?;
        records.insert(record.key.clone(), record.clone());
        Ok(())
    }

    async fn list_all(&self) -> StorageResult<Vec<CachedRecordSummary>> {
        let records = self.records.read().map_err(|_| StorageError::LockPoisoned)?;
        let mut summaries: Vec<CachedRecordSummary> =
            records.values().map(CachedRecord::summary).collect();
        summaries.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
        Ok(summaries)
    }
}
