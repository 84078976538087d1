//! UUID parser.

use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{ErrorCode, ParseError, SimpleParseError};
use crate::interop::SchemaContext;
use crate::parser::traits::Parser;

/// Parses a UUID string, hyphenated or as 32 hex digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidValue;

impl Parser for UuidValue {
    type Output = Uuid;

    fn try_parse(&self, raw: &Value) -> Result<Uuid, ParseError> {
        let text = raw
            .as_str()
            .ok_or_else(|| SimpleParseError::new("str", raw))?;
        Uuid::try_parse(text).map_err(|_| {
            SimpleParseError::new("str", raw)
                .with_code(ErrorCode::InvalidFormat)
                .with_detail("can't be parsed as a valid uuid")
                .into()
        })
    }

    fn to_open_api(&self, _ctx: &mut SchemaContext) -> Value {
        json!({"type": "string", "format": "uuid"})
    }

    fn describe(&self) -> String {
        "UUID".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";

    #[test]
    fn test_hyphenated_and_simple_forms() {
        let expected = Uuid::parse_str(ID).unwrap();
        assert_eq!(UuidValue.try_parse(&json!(ID)).unwrap(), expected);
        assert_eq!(
            UuidValue
                .try_parse(&json!("67e5504410b1426f9247bb680e5fe0c8"))
                .unwrap(),
            expected
        );
    }

    #[test]
    fn test_invalid_string() {
        let error = UuidValue.try_parse(&json!("not-a-uuid")).unwrap_err();
        assert!(error
            .to_string()
            .ends_with("which can't be parsed as a valid uuid"));
        assert_eq!(error.iter().next().unwrap().code, ErrorCode::InvalidFormat);
    }

    #[test]
    fn test_non_string() {
        let error = UuidValue.try_parse(&json!(42)).unwrap_err();
        assert_eq!(error.iter().next().unwrap().code, ErrorCode::InvalidType);
    }
}
