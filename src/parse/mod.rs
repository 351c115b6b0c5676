pub mod record_parser;
pub mod record_serializer;

pub use record_parser::{COMMENT_MARKER, ParseWarning, WarningKind, parse_records};
pub use record_serializer::{header_line, serialize_records, serialize_rows};
