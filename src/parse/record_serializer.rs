use std::io;

use crate::model::record::{FIELDS, Record};
use crate::parse::record_parser::COMMENT_MARKER;

/// Canonical header line, without the line terminator
pub fn header_line() -> String {
    format!("{} {}", COMMENT_MARKER as char, FIELDS.join(","))
}

/// Serialize records to the canonical file form: the comment header, then
/// one row per record with every field quoted.
pub fn serialize_records(records: &[Record]) -> io::Result<String> {
    let mut out = header_line();
    out.push('\n');
    out.push_str(&serialize_rows(records)?);
    Ok(out)
}

/// Serialize records as quoted rows with no header.
pub fn serialize_rows(records: &[Record]) -> io::Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for record in records {
        writer.write_record(record.fields())?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_records;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_store_is_header_only() {
        assert_eq!(serialize_records(&[]).unwrap(), "# key,value,tags\n");
    }

    #[test]
    fn every_field_is_quoted() {
        let records = vec![
            Record::new("1776-07-04", "Independence", "#Founding"),
            Record::new("1787-09-17", "", ""),
        ];
        assert_eq!(
            serialize_records(&records).unwrap(),
            "\
# key,value,tags
\"1776-07-04\",\"Independence\",\"#Founding\"
\"1787-09-17\",\"\",\"\"
"
        );
    }

    #[test]
    fn quotes_are_doubled_and_newlines_kept() {
        let records = vec![Record::new("k", "line one\nline, two", "say \"hi\" now")];
        assert_eq!(
            serialize_rows(&records).unwrap(),
            "\"k\",\"line one\nline, two\",\"say \"\"hi\"\" now\"\n"
        );
    }

    #[test]
    fn canonical_text_round_trips() {
        let source = "\
# key,value,tags
\"1775-04-19\",\"Lexington and Concord, MA\",\"#War,#Revolution\"
\"1776-07-04\",\"Declaration\nsigned\",\"#Founding\"
";
        let (records, warnings) = parse_records(source);
        assert!(warnings.is_empty());
        assert_eq!(serialize_records(&records).unwrap(), source);
    }
}
