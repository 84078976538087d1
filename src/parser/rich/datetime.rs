//! ISO 8601 timestamp parser.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::{json, Value};

use crate::error::{ErrorCode, ParseError, SimpleParseError};
use crate::interop::SchemaContext;
use crate::parser::traits::Parser;

/// Offset formats tried after RFC 3339, for offsets written without a colon.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Formats without an offset; the result is taken to be UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses an ISO 8601 timestamp string into a UTC datetime.
///
/// Timestamps carrying an offset are converted to UTC; timestamps without one
/// are read as UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeValue;

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(text, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

impl Parser for DateTimeValue {
    type Output = DateTime<Utc>;

    fn try_parse(&self, raw: &Value) -> Result<DateTime<Utc>, ParseError> {
        let text = raw
            .as_str()
            .ok_or_else(|| SimpleParseError::new("str", raw))?;
        parse_timestamp(text).ok_or_else(|| {
            SimpleParseError::new("str", raw)
                .with_code(ErrorCode::InvalidFormat)
                .with_detail("can't be parsed as an ISO 8601 datetime")
                .into()
        })
    }

    fn to_open_api(&self, _ctx: &mut SchemaContext) -> Value {
        json!({"type": "string", "format": "date-time"})
    }

    fn describe(&self) -> String {
        "DateTime".to_string()
    }
}
