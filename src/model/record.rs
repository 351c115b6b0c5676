use serde::{Deserialize, Serialize};

/// Column names, in file order
pub const FIELDS: [&str; 3] = ["key", "value", "tags"];

/// A single key/value/tags entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier (e.g. a date like `1776-07-04`)
    pub key: String,
    /// Free text; may contain commas and newlines
    pub value: String,
    /// Free text, conventionally a comma-separated label list
    pub tags: String,
}

impl Record {
    pub fn new(key: impl Into<String>, value: impl Into<String>, tags: impl Into<String>) -> Self {
        Record {
            key: key.into(),
            value: value.into(),
            tags: tags.into(),
        }
    }

    /// Fields in file order
    pub fn fields(&self) -> [&str; 3] {
        [self.key.as_str(), self.value.as_str(), self.tags.as_str()]
    }

    /// Split `tags` into labels for display. Commas and whitespace both separate.
    pub fn tag_labels(&self) -> Vec<&str> {
        self.tags
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_labels_split_on_commas_and_spaces() {
        let r = Record::new("k", "v", "#Founding, #War  #1776,,");
        assert_eq!(r.tag_labels(), vec!["#Founding", "#War", "#1776"]);
    }

    #[test]
    fn tag_labels_empty() {
        let r = Record::new("k", "v", "");
        assert!(r.tag_labels().is_empty());
    }
}
