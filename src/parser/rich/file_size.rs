//! File size parser.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Value};

use crate::error::{ErrorCode, ParseError, SimpleParseError};
use crate::interop::SchemaContext;
use crate::parser::traits::Parser;

const PATTERN: &str = r"^(\d+)(k|m|g)?b$";

static FILE_SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PATTERN).expect("file size pattern is valid"));

/// A size in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ByteSize(pub u64);

impl ByteSize {
    pub fn bytes(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}b", self.0)
    }
}

/// Parses strings like `512b`, `10kb`, `3mb` or `1gb` into a [`ByteSize`].
///
/// Units are powers of 1024. Anything else, `tb` included, is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSizeValue;

impl Parser for FileSizeValue {
    type Output = ByteSize;

    fn try_parse(&self, raw: &Value) -> Result<ByteSize, ParseError> {
        let text = raw
            .as_str()
            .ok_or_else(|| SimpleParseError::new("str", raw))?;

        let captures = FILE_SIZE.captures(text).ok_or_else(|| {
            SimpleParseError::new("str", raw)
                .with_code(ErrorCode::InvalidFormat)
                .with_detail("is not a file size like 512b, 10kb, 3mb or 1gb")
        })?;

        let too_large = || {
            SimpleParseError::new("str", raw)
                .with_code(ErrorCode::OutOfRange)
                .with_detail("is too large to be a file size")
        };
        let count: u64 = captures[1].parse().map_err(|_| too_large())?;
        let multiplier: u64 = match captures.get(2).map(|unit| unit.as_str()) {
            Some("k") => 1 << 10,
            Some("m") => 1 << 20,
            Some("g") => 1 << 30,
            _ => 1,
        };

        count
            .checked_mul(multiplier)
            .map(ByteSize)
            .ok_or_else(|| too_large().into())
    }

    fn to_open_api(&self, _ctx: &mut SchemaContext) -> Value {
        json!({"type": "string", "pattern": PATTERN})
    }

    fn describe(&self) -> String {
        "FileSize".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<ByteSize, ParseError> {
        FileSizeValue.try_parse(&json!(text))
    }

    #[test]
    fn test_units() {
        assert_eq!(parse("512b").unwrap(), ByteSize(512));
        assert_eq!(parse("5kb").unwrap().bytes(), 5 * 1024);
        assert_eq!(parse("3mb").unwrap().bytes(), 3 * 1024 * 1024);
        assert_eq!(parse("1gb").unwrap().bytes(), 1024 * 1024 * 1024);
    }

    #[test]
    fn test_rejects_unknown_units() {
        for text in ["5tb", "5", "kb", "5 kb", "5KB", "-5kb"] {
            let error = parse(text).unwrap_err();
            assert_eq!(
                error.iter().next().unwrap().code,
                ErrorCode::InvalidFormat,
                "{text}"
            );
        }
    }

    #[test]
    fn test_overflow_out_of_range() {
        let error = parse("18446744073709551615gb").unwrap_err();
        assert_eq!(error.iter().next().unwrap().code, ErrorCode::OutOfRange);
    }

    #[test]
    fn test_non_string() {
        let error = FileSizeValue.try_parse(&json!(1024)).unwrap_err();
        assert_eq!(error.iter().next().unwrap().code, ErrorCode::InvalidType);
    }
}
