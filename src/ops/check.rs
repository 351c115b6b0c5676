use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::io::store_io::StoreError;
use crate::ops::record_ops::duplicate_keys;
use crate::parse::{ParseWarning, parse_records, serialize_records};

/// Health report for a data file
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckResult {
    /// Records that loaded
    pub records: usize,
    /// Rows that would be dropped on load
    pub warnings: Vec<ParseWarning>,
    /// Keys held by more than one record
    pub duplicate_keys: Vec<String>,
    /// 0-based positions of records whose key is blank
    pub empty_keys: Vec<usize>,
    /// Whether saving would rewrite the file (unquoted fields, other header, CRLF...)
    pub needs_format: bool,
}

impl CheckResult {
    /// Problems that make the data inconsistent. Formatting alone is not one.
    pub fn is_valid(&self) -> bool {
        self.warnings.is_empty() && self.duplicate_keys.is_empty() && self.empty_keys.is_empty()
    }
}

/// Inspect a data file without modifying it.
pub fn check_file(path: &Path) -> Result<CheckResult, StoreError> {
    let source = fs::read_to_string(path).map_err(|e| StoreError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(check_source(&source))
}

/// Inspect the text of a data file.
pub fn check_source(source: &str) -> CheckResult {
    let (records, warnings) = parse_records(source);
    let needs_format = match serialize_records(&records) {
        Ok(canonical) => canonical != source,
        Err(_) => true,
    };
    CheckResult {
        records: records.len(),
        duplicate_keys: duplicate_keys(&records),
        empty_keys: records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.key.trim().is_empty())
            .map(|(i, _)| i)
            .collect(),
        warnings,
        needs_format,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn canonical_file_is_clean() {
        let result = check_source("# key,value,tags\n\"a\",\"b\",\"c\"\n");
        assert!(result.is_valid());
        assert!(!result.needs_format);
        assert_eq!(result.records, 1);
    }

    #[test]
    fn reports_every_problem_kind() {
        let source = "\
# key,value,tags
a,1,x
a,2,y
\"\",\"blank\",\"\"
\"short\"
";
        let result = check_source(source);
        assert!(!result.is_valid());
        assert_eq!(result.records, 3);
        assert_eq!(result.duplicate_keys, vec!["a"]);
        assert_eq!(result.empty_keys, vec![2]);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.needs_format);
    }

    #[test]
    fn unquoted_file_needs_format_but_is_valid() {
        let result = check_source("# key,value,tags\na,b,c\n");
        assert!(result.is_valid());
        assert!(result.needs_format);
    }

    #[test]
    fn check_does_not_create_missing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("timeline.csv");
        assert!(check_file(&path).is_err());
        assert!(!path.exists());
    }
}
