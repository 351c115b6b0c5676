use std::fmt;

use serde::Serialize;

use crate::model::record::{FIELDS, Record};

/// Lines starting with this byte are comments (the header is one)
pub const COMMENT_MARKER: u8 = b'#';

/// A row that was dropped while parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    /// 1-based line where the row starts
    pub line: u64,
    /// The row's fields as read
    pub content: Vec<String>,
    pub kind: WarningKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum WarningKind {
    /// Fewer than three fields (count found)
    TooFewFields(usize),
    /// The CSV reader rejected the row
    Unreadable(String),
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::TooFewFields(n) => {
                write!(f, "expected {} fields, found {}", FIELDS.len(), n)
            }
            WarningKind::Unreadable(msg) => write!(f, "unreadable row: {}", msg),
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "skipping malformed row at line {} ({}): {}",
            self.line,
            self.kind,
            self.content.join(",")
        )
    }
}

/// Parse the contents of a data file.
///
/// Comment lines are skipped whatever follows the marker. Each remaining
/// non-empty row must have at least three fields; extra fields are ignored.
/// Rows with fewer fields are dropped and reported, never fatal.
pub fn parse_records(source: &str) -> (Vec<Record>, Vec<ParseWarning>) {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(COMMENT_MARKER))
        .from_reader(source.as_bytes());

    let mut records = Vec::new();
    let mut warnings = Vec::new();

    for result in reader.records() {
        match result {
            Ok(row) => {
                if row.len() < FIELDS.len() {
                    warnings.push(ParseWarning {
                        line: row.position().map_or(0, |p| record_line(source, p.byte())),
                        content: row.iter().map(str::to_string).collect(),
                        kind: WarningKind::TooFewFields(row.len()),
                    });
                    continue;
                }
                records.push(Record::new(
                    strip_enclosing_quotes(&row[0]),
                    strip_enclosing_quotes(&row[1]),
                    strip_enclosing_quotes(&row[2]),
                ));
            }
            Err(e) => {
                warnings.push(ParseWarning {
                    line: e.position().map_or(0, |p| record_line(source, p.byte())),
                    content: Vec::new(),
                    kind: WarningKind::Unreadable(e.to_string()),
                });
            }
        }
    }

    (records, warnings)
}

/// 1-based line of the record starting at `byte`, skipping any blank or
/// comment lines the reader consumed before it.
fn record_line(source: &str, byte: u64) -> u64 {
    let mut start = (byte as usize).min(source.len());
    while start < source.len() {
        let rest = &source[start..];
        let line_len = rest.find('\n').map_or(rest.len(), |i| i + 1);
        let line = rest[..line_len].trim_end_matches(['\r', '\n']);
        if !line.is_empty() && !line.starts_with(COMMENT_MARKER as char) {
            break;
        }
        start += line_len;
    }
    source.as_bytes()[..start].iter().filter(|&&b| b == b'\n').count() as u64 + 1
}

/// Remove quote characters left around a field after CSV unescaping,
/// e.g. from legacy files that double-quoted already quoted values.
fn strip_enclosing_quotes(field: &str) -> &str {
    field.trim_matches('"')
}
