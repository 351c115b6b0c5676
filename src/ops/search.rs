use std::ops::Range;

use regex::Regex;

use crate::model::record::Record;

/// Which field of a record matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Key,
    Value,
    Tags,
}

impl MatchField {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchField::Key => "key",
            MatchField::Value => "value",
            MatchField::Tags => "tags",
        }
    }
}

/// A search hit: a record index, the field that matched, and the match spans
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub index: usize,
    pub field: MatchField,
    pub spans: Vec<Range<usize>>,
}

/// Case-insensitive substring match on key, value, or tags.
/// An empty term matches everything.
pub fn matches(record: &Record, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    record
        .fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Indices of matching records, in store order
pub fn filter_indices(records: &[Record], term: &str) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| matches(r, term))
        .map(|(i, _)| i)
        .collect()
}

/// Case-insensitive literal regex for highlighting `term`. None for an empty term.
pub fn highlight_regex(term: &str) -> Option<Regex> {
    if term.is_empty() {
        return None;
    }
    Regex::new(&format!("(?i){}", regex::escape(term))).ok()
}

/// Collect all non-overlapping match byte-ranges for a regex in the given text.
fn find_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}

/// Hits for every record matching `term`, in store order.
///
/// A record gets one hit per field containing the term. A matching record
/// with no highlightable span (an empty term, or case folding the regex does
/// not share) gets a single key hit with no spans.
pub fn search_records(records: &[Record], term: &str) -> Vec<SearchHit> {
    let re = highlight_regex(term);

    let mut hits = Vec::new();
    for index in filter_indices(records, term) {
        let record = &records[index];
        let before = hits.len();
        if let Some(re) = &re {
            for (field, text) in [
                (MatchField::Key, &record.key),
                (MatchField::Value, &record.value),
                (MatchField::Tags, &record.tags),
            ] {
                let spans = find_matches(re, text);
                if !spans.is_empty() {
                    hits.push(SearchHit {
                        index,
                        field,
                        spans,
                    });
                }
            }
        }
        if hits.len() == before {
            hits.push(SearchHit {
                index,
                field: MatchField::Key,
                spans: Vec::new(),
            });
        }
    }
    hits
}
