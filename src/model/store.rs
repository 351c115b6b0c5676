use std::path::{Path, PathBuf};

use crate::io::store_io::{self, StoreError};
use crate::model::record::Record;
use crate::parse::ParseWarning;

/// The loaded data file: its path and records in file order
#[derive(Debug, Clone)]
pub struct RecordStore {
    pub path: PathBuf,
    pub records: Vec<Record>,
}

impl RecordStore {
    /// Load the file at `path`, creating it if missing.
    /// Malformed rows are dropped and returned as warnings.
    pub fn open(path: &Path) -> Result<(RecordStore, Vec<ParseWarning>), StoreError> {
        let (records, warnings) = store_io::load_records(path)?;
        Ok((
            RecordStore {
                path: path.to_path_buf(),
                records,
            },
            warnings,
        ))
    }

    /// Write the current records back to disk.
    pub fn save(&self) -> Result<(), StoreError> {
        store_io::save_records(&self.path, &self.records)
    }

    /// Persist `records` and, only once the write succeeded, adopt them.
    pub fn commit(&mut self, records: Vec<Record>) -> Result<(), StoreError> {
        store_io::save_records(&self.path, &records)?;
        self.records = records;
        Ok(())
    }

    /// Index of the first record with exactly this key
    pub fn position(&self, key: &str) -> Option<usize> {
        self.records.iter().position(|r| r.key == key)
    }

    /// File name for display (falls back to the full path)
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
