use crate::domain::ports::{RawRecord, RecordKind, StorageProvider};
use crate::error::{ParkingError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family holding one JSON document per record kind.
pub const CF_RECORDS: &str = "records";

/// A persistent storage provider backed by RocksDB.
///
/// Each record kind is stored under its name as a JSON array of rows, so a
/// save replaces the kind atomically.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStorage {
    db: Arc<DB>,
}

fn db_error(e: rocksdb::Error) -> ParkingError {
    ParkingError::storage(format!("RocksDB error: {e}"))
}

impl RocksDBStorage {
    /// Opens or creates a RocksDB instance at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_records = ColumnFamilyDescriptor::new(CF_RECORDS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_records]).map_err(db_error)?;

        Ok(Self { db: Arc::new(db) })
    }

    fn records_cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(CF_RECORDS)
            .ok_or_else(|| ParkingError::storage("Records column family not found"))
    }
}

#[async_trait]
impl StorageProvider for RocksDBStorage {
    async fn load(&self, kind: RecordKind) -> Result<Option<Vec<RawRecord>>> {
        let cf = self.records_cf()?;
        let Some(bytes) = self.db.get_cf(cf, kind.name()).map_err(db_error)? else {
            return Ok(None);
        };
        let records = serde_json::from_slice(&bytes)
            .map_err(|e| ParkingError::storage(format!("Deserialization error: {e}")))?;
        Ok(Some(records))
    }

    async fn save(&self, kind: RecordKind, records: Vec<RawRecord>) -> Result<()> {
        let cf = self.records_cf()?;
        let value = serde_json::to_vec(&records)
            .map_err(|e| ParkingError::storage(format!("Serialization error: {e}")))?;
        self.db.put_cf(cf, kind.name(), value).map_err(db_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let storage = RocksDBStorage::open(dir.path()).expect("Failed to open RocksDB");
        assert!(storage.db.cf_handle(CF_RECORDS).is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_round_trip() {
        let dir = tempdir().unwrap();
        let storage = RocksDBStorage::open(dir.path()).unwrap();
        assert!(storage.load(RecordKind::Slots).await.unwrap().is_none());

        let rows = vec![vec!["A01".to_string(), "1".to_string()]];
        storage.save(RecordKind::Slots, rows.clone()).await.unwrap();
        assert_eq!(storage.load(RecordKind::Slots).await.unwrap(), Some(rows));
    }

    #[tokio::test]
    async fn test_rocksdb_survives_reopen() {
        let dir = tempdir().unwrap();
        let rows = vec![vec!["admin".to_string(), "pw".to_string(), "A".to_string(), "0".to_string()]];
        {
            let storage = RocksDBStorage::open(dir.path()).unwrap();
            storage.save(RecordKind::Users, rows.clone()).await.unwrap();
        }
        let storage = RocksDBStorage::open(dir.path()).unwrap();
        assert_eq!(storage.load(RecordKind::Users).await.unwrap(), Some(rows));
    }
}
