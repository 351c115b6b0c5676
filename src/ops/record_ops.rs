use crate::model::record::Record;

/// Why a candidate record was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("key cannot be empty")]
    EmptyKey,
    #[error("key must be unique: {0} already exists")]
    DuplicateKey(String),
}

/// Error type for record mutations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("{0}")]
    Invalid(#[from] ValidationError),
    #[error("record index out of range: {0}")]
    NotFound(usize),
}

/// Check `candidate` against `records`.
///
/// The key must be non-empty after trimming and must not equal (exactly,
/// case-sensitively) the key of any record other than the one at `exclude`.
pub fn validate(
    records: &[Record],
    candidate: &Record,
    exclude: Option<usize>,
) -> Result<(), ValidationError> {
    if candidate.key.trim().is_empty() {
        return Err(ValidationError::EmptyKey);
    }
    let duplicate = records
        .iter()
        .enumerate()
        .any(|(i, r)| Some(i) != exclude && r.key == candidate.key);
    if duplicate {
        return Err(ValidationError::DuplicateKey(candidate.key.clone()));
    }
    Ok(())
}

/// Append `record`. Returns the new sequence; the caller saves it.
pub fn create(records: &[Record], record: Record) -> Result<Vec<Record>, RecordError> {
    validate(records, &record, None)?;
    let mut next = records.to_vec();
    next.push(record);
    Ok(next)
}

/// Replace the record at `index` in place.
pub fn update(records: &[Record], index: usize, record: Record) -> Result<Vec<Record>, RecordError> {
    if index >= records.len() {
        return Err(RecordError::NotFound(index));
    }
    validate(records, &record, Some(index))?;
    let mut next = records.to_vec();
    next[index] = record;
    Ok(next)
}

/// Remove the record at `index`; later records shift down by one.
pub fn delete(records: &[Record], index: usize) -> Result<Vec<Record>, RecordError> {
    if index >= records.len() {
        return Err(RecordError::NotFound(index));
    }
    let mut next = records.to_vec();
    next.remove(index);
    Ok(next)
}

/// Keys that appear more than once, each reported once, in first-seen order
pub fn duplicate_keys(records: &[Record]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut dups: Vec<String> = Vec::new();
    for r in records {
        if !seen.insert(r.key.as_str()) && !dups.contains(&r.key) {
            dups.push(r.key.clone());
        }
    }
    dups
}
