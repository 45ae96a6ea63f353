use crate::domain::ports::{RawRecord, RecordKind, StorageProvider};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A storage provider that keeps records in memory.
///
/// Clones share the same underlying map, so a test can hand one clone to
/// the service and inspect what was saved through another.
#[derive(Default, Clone)]
pub struct InMemoryStorage {
    records: Arc<RwLock<HashMap<RecordKind, Vec<RawRecord>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates one record kind.
    pub async fn seed(&self, kind: RecordKind, records: Vec<RawRecord>) {
        self.records.write().await.insert(kind, records);
    }
}

#[async_trait]
impl StorageProvider for InMemoryStorage {
    async fn load(&self, kind: RecordKind) -> Result<Option<Vec<RawRecord>>> {
        let records = self.records.read().await;
        Ok(records.get(&kind).cloned())
    }

    async fn save(&self, kind: RecordKind, records: Vec<RawRecord>) -> Result<()> {
        let mut stored = self.records.write().await;
        stored.insert(kind, records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_storage() {
        let storage = InMemoryStorage::new();
        assert!(storage.load(RecordKind::Slots).await.unwrap().is_none());

        let rows = vec![vec!["A01".to_string(), "1".to_string()]];
        storage.save(RecordKind::Slots, rows.clone()).await.unwrap();

        assert_eq!(storage.load(RecordKind::Slots).await.unwrap(), Some(rows));
        assert!(storage.load(RecordKind::Users).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_records() {
        let storage = InMemoryStorage::new();
        let view = storage.clone();
        storage.save(RecordKind::Ledger, vec![]).await.unwrap();
        assert_eq!(view.load(RecordKind::Ledger).await.unwrap(), Some(vec![]));
    }
}
