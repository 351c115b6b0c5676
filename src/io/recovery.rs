use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

use crate::model::record::Record;
use crate::parse::serialize_rows;

/// Default number of days before entries are prunable.
pub const PRUNE_AGE_DAYS: i64 = 30;

/// Self-documenting header written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- timeline recovery log: append-only error recovery data
     Rows that could not be loaded, writes that failed, and deleted
     records end up here.
     View with: tl recovery
     Prune old entries: tl recovery prune
     Safe to delete if empty or stale. -->

---
";

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// Category of a recovery entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    Parser,
    Write,
    Delete,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Parser => write!(f, "parser"),
            RecoveryCategory::Write => write!(f, "write"),
            RecoveryCategory::Delete => write!(f, "delete"),
        }
    }
}

impl RecoveryCategory {
    pub fn parse_category(s: &str) -> Option<Self> {
        match s {
            "parser" => Some(RecoveryCategory::Parser),
            "write" => Some(RecoveryCategory::Write),
            "delete" => Some(RecoveryCategory::Delete),
            _ => None,
        }
    }
}

/// A single entry in the recovery log.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

impl RecoveryEntry {
    pub fn new(category: RecoveryCategory, description: impl Into<String>) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category,
            description: description.into(),
            fields: Vec::new(),
            body: String::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.push((key.to_string(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

// ---------------------------------------------------------------------------
// Path helper
// ---------------------------------------------------------------------------

/// Return the path to the recovery log kept beside `data_file`
/// (`timeline.csv` → `.timeline.csv.recovery.log`).
pub fn recovery_log_path(data_file: &Path) -> PathBuf {
    let name = data_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    sibling_dir(data_file).join(format!(".{}.recovery.log", name))
}

/// Directory containing `path`; `.` for bare file names.
pub fn sibling_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

// ---------------------------------------------------------------------------
// Atomic file write
// ---------------------------------------------------------------------------

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut tmp = NamedTempFile::new_in(sibling_dir(path))?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry formatting
// ---------------------------------------------------------------------------

impl RecoveryEntry {
    /// Format this entry as a markdown block for the recovery log.
    fn to_markdown(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "## {} {}: {}\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.description,
        ));
        out.push('\n');

        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }

        if !self.body.is_empty() {
            out.push('\n');
            out.push_str("```text\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }

        out.push('\n');
        out.push_str("---\n");
        out
    }

    /// Serialize to JSON value for `tl recovery --json`.
    pub fn to_json(&self) -> serde_json::Value {
        let fields: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();

        serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            "category": self.category.to_string(),
            "description": self.description,
            "fields": fields,
            "body": self.body,
        })
    }

    /// Format as human-readable raw markdown for display.
    pub fn to_display_markdown(&self) -> String {
        self.to_markdown()
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Append a recovery entry to the log beside `data_file`.
/// Errors are swallowed and reported through tracing.
pub fn log_recovery(data_file: &Path, entry: RecoveryEntry) {
    if let Err(e) = log_recovery_inner(data_file, entry) {
        tracing::warn!(error = %e, "could not write to recovery log");
    }
}

fn log_recovery_inner(data_file: &Path, entry: RecoveryEntry) -> io::Result<()> {
    let path = recovery_log_path(data_file);
    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())?;
    Ok(())
}

/// Log a deleted record so it can be restored by hand.
pub fn log_record_deletion(data_file: &Path, record: &Record) {
    let row = serialize_rows(std::slice::from_ref(record)).unwrap_or_default();
    log_recovery(
        data_file,
        RecoveryEntry::new(RecoveryCategory::Delete, format!("record {} deleted", record.key))
            .field("Key", record.key.clone())
            .body(row),
    );
}

// ---------------------------------------------------------------------------
// Reading entries
// ---------------------------------------------------------------------------

/// Read recovery entries, most recent first.
pub fn read_recovery_entries(data_file: &Path, limit: Option<usize>) -> Vec<RecoveryEntry> {
    let content = match std::fs::read_to_string(recovery_log_path(data_file)) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    let mut entries = parse_entries(&content);

    // Entries are parsed oldest-first
    if let Some(n) = limit {
        let skip = entries.len().saturating_sub(n);
        entries = entries.into_iter().skip(skip).collect();
    }

    entries.reverse();
    entries
}

/// Parse all entries from the log content string.
fn parse_entries(content: &str) -> Vec<RecoveryEntry> {
    let mut entries = Vec::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let Some(header) = line.strip_prefix("## ") else {
            continue;
        };
        let Some((timestamp, category, description)) = parse_entry_header(header) else {
            continue;
        };

        let mut fields = Vec::new();
        let mut body = String::new();
        let mut in_code_block = false;

        for line in lines.by_ref() {
            if in_code_block {
                if line == "```" {
                    in_code_block = false;
                } else {
                    if !body.is_empty() {
                        body.push('\n');
                    }
                    body.push_str(line);
                }
                continue;
            }

            if line == "---" {
                break;
            }
            if line.starts_with("```") {
                in_code_block = true;
                continue;
            }

            let trimmed = line.trim();
            if let Some((key, value)) = trimmed.split_once(": ") {
                fields.push((key.to_string(), value.to_string()));
            }
        }

        entries.push(RecoveryEntry {
            timestamp,
            category,
            description,
            fields,
            body,
        });
    }

    entries
}

/// Parse an entry header: `<timestamp> <category>: <description>`
fn parse_entry_header(header: &str) -> Option<(DateTime<Utc>, RecoveryCategory, String)> {
    let (timestamp_str, rest) = header.split_once(' ')?;
    let timestamp = DateTime::parse_from_rfc3339(timestamp_str)
        .ok()?
        .with_timezone(&Utc);

    let (category_str, description) = rest.split_once(": ")?;
    let category = RecoveryCategory::parse_category(category_str)?;

    Some((timestamp, category, description.to_string()))
}

// ---------------------------------------------------------------------------
// Pruning
// ---------------------------------------------------------------------------

/// Remove entries older than `PRUNE_AGE_DAYS` (or all of them).
/// Returns the number of entries removed.
pub fn prune_recovery(data_file: &Path, all: bool) -> io::Result<usize> {
    let path = recovery_log_path(data_file);
    if !path.exists() {
        return Ok(0);
    }

    let entries = parse_entries(&std::fs::read_to_string(&path)?);
    let cutoff = Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS);
    let (kept, removed): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|e| !all && e.timestamp >= cutoff);

    let mut content = FILE_HEADER.to_string();
    for entry in &kept {
        content.push_str(&entry.to_markdown());
    }
    atomic_write(&path, content.as_bytes())?;
    Ok(removed.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use tempfile::TempDir;

    fn make_entry(category: RecoveryCategory, desc: &str, body: &str) -> RecoveryEntry {
        RecoveryEntry::new(category, desc)
            .field("Source", "timeline.csv")
            .field("Line", "3")
            .body(body)
    }

    #[test]
    fn test_entry_formatting() {
        let entry = make_entry(RecoveryCategory::Parser, "dropped row", "\"a\",\"b\"");
        let md = entry.to_markdown();
        assert!(md.starts_with("## "));
        assert!(md.contains("parser: dropped row"));
        assert!(md.contains("Source: timeline.csv"));
        assert!(md.contains("```text\n\"a\",\"b\"\n```"));
        assert!(md.ends_with("---\n"));
    }

    #[test]
    fn test_log_and_read() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("timeline.csv");

        log_recovery(&data, make_entry(RecoveryCategory::Parser, "test1", "body1"));
        log_recovery(&data, make_entry(RecoveryCategory::Write, "test2", "body2"));

        let entries = read_recovery_entries(&data, None);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "test2");
        assert_eq!(entries[1].description, "test1");
    }

    #[test]
    fn test_read_with_limit() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("timeline.csv");

        for i in 0..5 {
            log_recovery(
                &data,
                make_entry(RecoveryCategory::Delete, &format!("entry{}", i), "x"),
            );
        }

        let entries = read_recovery_entries(&data, Some(2));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "entry4");
        assert_eq!(entries[1].description, "entry3");
    }

    #[test]
    fn test_round_trip_parse() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("timeline.csv");

        let original = RecoveryEntry::new(RecoveryCategory::Write, "save failed")
            .field("Target", "timeline.csv")
            .field("Error", "Permission denied")
            .body("# key,value,tags\n\"a\",\"b\",\"c\"\n");
        log_recovery(&data, original);

        let entries = read_recovery_entries(&data, None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, RecoveryCategory::Write);
        assert_eq!(entries[0].description, "save failed");
        assert_eq!(
            entries[0].fields,
            vec![
                ("Target".to_string(), "timeline.csv".to_string()),
                ("Error".to_string(), "Permission denied".to_string()),
            ]
        );
        assert_eq!(entries[0].body, "# key,value,tags\n\"a\",\"b\",\"c\"");
    }

    #[test]
    fn test_file_header_created_on_first_write() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("timeline.csv");

        log_recovery(&data, make_entry(RecoveryCategory::Parser, "test", "body"));

        let content = std::fs::read_to_string(recovery_log_path(&data)).unwrap();
        assert!(content.starts_with("<!-- timeline recovery log"));
        assert_eq!(content.matches("<!--").count(), 1);
    }

    #[test]
    fn test_record_deletion_keeps_row() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("timeline.csv");
        log_record_deletion(&data, &Record::new("1776-07-04", "Independence", "#Founding"));

        let entries = read_recovery_entries(&data, None);
        assert_eq!(entries[0].category, RecoveryCategory::Delete);
        assert_eq!(entries[0].description, "record 1776-07-04 deleted");
        assert_eq!(entries[0].body, "\"1776-07-04\",\"Independence\",\"#Founding\"");
    }

    #[test]
    fn test_prune_all() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("timeline.csv");
        log_recovery(&data, make_entry(RecoveryCategory::Parser, "test", "body"));

        assert_eq!(prune_recovery(&data, true).unwrap(), 1);
        assert!(read_recovery_entries(&data, None).is_empty());
    }

    #[test]
    fn test_prune_keeps_recent() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("timeline.csv");
        let mut old = make_entry(RecoveryCategory::Delete, "old", "x");
        old.timestamp = Utc::now() - chrono::Duration::days(60);
        log_recovery(&data, old);
        log_recovery(&data, make_entry(RecoveryCategory::Delete, "new", "y"));

        assert_eq!(prune_recovery(&data, false).unwrap(), 1);
        let entries = read_recovery_entries(&data, None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "new");
    }

    #[test]
    fn test_prune_no_log_file() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(prune_recovery(&tmp.path().join("t.csv"), true).unwrap(), 0);
    }

    #[test]
    fn test_atomic_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("test.txt");

        atomic_write(&path, b"hello world").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello world");

        atomic_write(&path, b"goodbye").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "goodbye");
    }

    #[test]
    fn test_entry_to_json() {
        let entry = make_entry(RecoveryCategory::Parser, "dropped row", "content");
        let json = entry.to_json();
        assert_eq!(json["category"], "parser");
        assert_eq!(json["description"], "dropped row");
        assert_eq!(json["body"], "content");
        assert_eq!(json["fields"]["Line"], "3");
    }

    #[test]
    fn test_parse_entry_header() {
        let (ts, cat, desc) = parse_entry_header("2026-02-10T14:32:05Z delete: record 1776-07-04")
            .unwrap();
        assert_eq!(cat, RecoveryCategory::Delete);
        assert_eq!(desc, "record 1776-07-04");
        assert_eq!(ts.year(), 2026);
    }

    #[test]
    fn test_parse_entry_header_invalid() {
        assert!(parse_entry_header("not a valid header").is_none());
        assert!(parse_entry_header("2026-02-10T14:32:05Z unknown: desc").is_none());
    }

    #[test]
    fn test_recovery_log_path() {
        assert_eq!(
            recovery_log_path(Path::new("/tmp/data/timeline.csv")),
            PathBuf::from("/tmp/data/.timeline.csv.recovery.log")
        );
        assert_eq!(
            recovery_log_path(Path::new("timeline.csv")),
            PathBuf::from("./.timeline.csv.recovery.log")
        );
    }

    #[test]
    fn test_read_nonexistent_returns_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(read_recovery_entries(&tmp.path().join("t.csv"), None).is_empty());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!(
            RecoveryCategory::parse_category("write"),
            Some(RecoveryCategory::Write)
        );
        assert_eq!(RecoveryCategory::parse_category("conflict"), None);
    }
}
