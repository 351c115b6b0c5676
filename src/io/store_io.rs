use std::fs;
use std::path::{Path, PathBuf};

use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::record::Record;
use crate::parse::{ParseWarning, header_line, parse_records, serialize_records};

/// Error type for data file I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not encode records: {0}")]
    EncodeError(std::io::Error),
}

/// Load records from `path`.
///
/// A missing file is created holding only the header line. Malformed rows are
/// dropped, returned as warnings, and copied to the recovery log.
pub fn load_records(path: &Path) -> Result<(Vec<Record>, Vec<ParseWarning>), StoreError> {
    if !path.exists() {
        let header = format!("{}\n", header_line());
        recovery::atomic_write(path, header.as_bytes()).map_err(|e| StoreError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::info!(path = %path.display(), "created new data file");
        return Ok((Vec::new(), Vec::new()));
    }

    let source = fs::read_to_string(path).map_err(|e| StoreError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let (records, warnings) = parse_records(&source);

    for warning in &warnings {
        tracing::warn!(path = %path.display(), line = warning.line, "{}", warning.kind);
        recovery::log_recovery(
            path,
            RecoveryEntry::new(RecoveryCategory::Parser, "dropped row")
                .field("Source", path.display().to_string())
                .field("Line", warning.line.to_string())
                .field("Reason", warning.kind.to_string())
                .body(warning.content.join(",")),
        );
    }
    tracing::debug!(path = %path.display(), count = records.len(), "loaded records");

    Ok((records, warnings))
}

/// Save records to `path` atomically. On failure the previous file is left
/// untouched and the unsaved contents go to the recovery log.
pub fn save_records(path: &Path, records: &[Record]) -> Result<(), StoreError> {
    let content = serialize_records(records).map_err(StoreError::EncodeError)?;

    if let Err(e) = recovery::atomic_write(path, content.as_bytes()) {
        tracing::error!(path = %path.display(), error = %e, "save failed");
        recovery::log_recovery(
            path,
            RecoveryEntry::new(RecoveryCategory::Write, "save failed")
                .field("Target", path.display().to_string())
                .field("Error", e.to_string())
                .body(content),
        );
        return Err(StoreError::WriteError {
            path: path.to_path_buf(),
            source: e,
        });
    }

    tracing::debug!(path = %path.display(), count = records.len(), "saved records");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::recovery::read_recovery_entries;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_created_with_header() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("timeline.csv");

        let (records, warnings) = load_records(&path).unwrap();

        assert!(records.is_empty());
        assert!(warnings.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "# key,value,tags\n");
    }

    #[test]
    fn save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("timeline.csv");
        let records = vec![
            Record::new("1775-04-19", "Lexington, Concord", "#War"),
            Record::new("1776-07-04", "Independence", "#Founding"),
        ];

        save_records(&path, &records).unwrap();
        let (loaded, warnings) = load_records(&path).unwrap();

        assert!(warnings.is_empty());
        assert_eq!(loaded, records);
    }

    #[test]
    fn malformed_row_goes_to_recovery_log() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("timeline.csv");
        fs::write(&path, "# key,value,tags\n\"ok\",\"v\",\"t\"\n\"bad\",\"row\"\n").unwrap();

        let (records, warnings) = load_records(&path).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(warnings.len(), 1);
        let entries = read_recovery_entries(&path, None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].body, "bad,row");
    }

    #[test]
    fn failed_save_is_write_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("no-such-dir").join("timeline.csv");

        let err = save_records(&path, &[Record::new("a", "b", "c")]).unwrap_err();

        assert!(matches!(err, StoreError::WriteError { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn unreadable_path_is_read_error() {
        let tmp = TempDir::new().unwrap();
        // A directory exists at the path but cannot be read as a file
        let err = load_records(tmp.path()).unwrap_err();
        assert!(matches!(err, StoreError::ReadError { .. }));
    }
}
