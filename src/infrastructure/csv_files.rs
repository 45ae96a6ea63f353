use crate::domain::ports::{RawRecord, RecordKind, StorageProvider};
use crate::error::{ParkingError, Result};
use crate::interfaces::csv::record_io::{RecordReader, write_records};
use async_trait::async_trait;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Stores each record kind as a CSV file in a data directory:
/// `users.csv`, `slots.csv` and `parking_ledger.csv`.
///
/// Saves rewrite the whole file through a temporary file in the same
/// directory that is then renamed over the old one.
#[derive(Debug, Clone)]
pub struct CsvFileStorage {
    dir: PathBuf,
}

impl CsvFileStorage {
    /// Opens (and creates, if needed) the data directory.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, kind: RecordKind) -> PathBuf {
        self.dir.join(format!("{}.csv", kind.name()))
    }
}

#[async_trait]
impl StorageProvider for CsvFileStorage {
    async fn load(&self, kind: RecordKind) -> Result<Option<Vec<RawRecord>>> {
        let path = self.path_for(kind);
        if !path.exists() {
            return Ok(None);
        }
        let file = File::open(&path)?;
        let records = RecordReader::new(file)
            .records()
            .collect::<Result<Vec<_>>>()
            .map_err(|e| ParkingError::storage(format!("{}: {}", path.display(), e)))?;
        Ok(Some(records))
    }

    async fn save(&self, kind: RecordKind, records: Vec<RawRecord>) -> Result<()> {
        let path = self.path_for(kind);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        write_records(tmp.as_file_mut(), kind, &records)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| ParkingError::IoError(e.error))?;
        tracing::debug!(path = %path.display(), rows = records.len(), "Saved records");
        Ok(())
    }
}
