use serde::Serialize;

use crate::model::record::Record;
use crate::ops::check::CheckResult;
use crate::ops::search::SearchHit;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct RecordJson {
    /// 1-based position in the file
    pub line: usize,
    pub key: String,
    pub value: String,
    pub tags: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag_labels: Vec<String>,
}

#[derive(Serialize)]
pub struct RecordListJson {
    pub file: String,
    pub total: usize,
    pub records: Vec<RecordJson>,
}

#[derive(Serialize)]
pub struct SearchHitJson {
    pub line: usize,
    pub key: String,
    pub field: &'static str,
    pub spans: Vec<[usize; 2]>,
}

#[derive(Serialize)]
pub struct WriteResultJson {
    pub action: &'static str,
    pub record: RecordJson,
}

#[derive(Serialize)]
pub struct FmtResultJson {
    pub file: String,
    pub records: usize,
    pub changed: bool,
}

#[derive(Serialize)]
pub struct CheckJson<'a> {
    pub file: String,
    pub valid: bool,
    #[serde(flatten)]
    pub result: &'a CheckResult,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

pub fn record_to_json(index: usize, record: &Record) -> RecordJson {
    RecordJson {
        line: index + 1,
        key: record.key.clone(),
        value: record.value.clone(),
        tags: record.tags.clone(),
        tag_labels: record.tag_labels().into_iter().map(String::from).collect(),
    }
}

pub fn hit_to_json(hit: &SearchHit, records: &[Record]) -> SearchHitJson {
    SearchHitJson {
        line: hit.index + 1,
        key: records
            .get(hit.index)
            .map(|r| r.key.clone())
            .unwrap_or_default(),
        field: hit.field.as_str(),
        spans: hit.spans.iter().map(|s| [s.start, s.end]).collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// First line of a value, with a marker when more follow
fn value_summary(value: &str) -> String {
    let mut lines = value.lines();
    let first = lines.next().unwrap_or("");
    if lines.next().is_some() {
        format!("{} …", first)
    } else {
        first.to_string()
    }
}

/// Format a record as a one-line summary
pub fn format_record_line(record: &Record) -> String {
    let mut line = record.key.clone();
    let value = value_summary(&record.value);
    if !value.is_empty() {
        line.push_str("  ");
        line.push_str(&value);
    }
    if !record.tags.is_empty() {
        line.push_str("  ");
        line.push_str(&record.tags);
    }
    line
}

/// Format the detailed record view
pub fn format_record_detail(record: &Record) -> Vec<String> {
    let mut lines = vec![format!("key: {}", record.key)];
    if record.value.contains('\n') {
        lines.push("value:".to_string());
        for line in record.value.lines() {
            lines.push(format!("  {}", line));
        }
    } else {
        lines.push(format!("value: {}", record.value));
    }
    lines.push(format!("tags: {}", record.tags));
    lines
}

/// Format a check report
pub fn format_check(result: &CheckResult) -> Vec<String> {
    let mut lines = Vec::new();

    if !result.warnings.is_empty() {
        lines.push("Malformed rows:".to_string());
        for w in &result.warnings {
            lines.push(format!("  {}", w));
        }
    }
    if !result.duplicate_keys.is_empty() {
        lines.push("Duplicate keys:".to_string());
        for key in &result.duplicate_keys {
            lines.push(format!("  {}", key));
        }
    }
    if !result.empty_keys.is_empty() {
        lines.push("Blank keys:".to_string());
        for i in &result.empty_keys {
            lines.push(format!("  record {}", i + 1));
        }
    }
    if result.needs_format {
        lines.push("note: file is not in canonical form (run `tl fmt`)".to_string());
    }

    if result.is_valid() {
        lines.push(format!("✓ {} records, no problems", result.records));
    } else {
        lines.push(format!("✗ {} records, problems found", result.records));
    }
    lines
}
