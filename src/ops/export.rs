use crate::model::record::Record;

/// Clipboard text for a record. Values are wrapped in quotes as-is.
pub fn clipboard_text(record: &Record) -> String {
    format!(
        "Key: \"{}\"\nValue: \"{}\"\nTags: \"{}\"",
        record.key, record.value, record.tags
    )
}
