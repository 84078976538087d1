//! Nullable wrapper.

use serde_json::Value;

use crate::error::{ErrorCode, ParseError};
use crate::interop::{make_nullable, SchemaContext};

use super::traits::Parser;

/// Accepts `null`, otherwise delegates to the inner parser.
///
/// A top-level type mismatch is reported against `Union[None, T]`; errors
/// from deeper inside the inner parser are passed through unchanged.
///
/// # Example
///
/// ```rust
/// use reqshape::{Parser, Shape};
/// use serde_json::json;
///
/// let name = Shape::nullable(Shape::string());
///
/// assert_eq!(name.try_parse(&json!(null)).unwrap(), None);
/// assert_eq!(name.try_parse(&json!("Ada")).unwrap().as_deref(), Some("Ada"));
/// assert!(name.try_parse(&json!(5)).unwrap_err().to_string().contains("Union[None, str]"));
/// ```
#[derive(Debug, Clone)]
pub struct Nullable<P> {
    inner: P,
}

impl<P: Parser> Nullable<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: Parser> Parser for Nullable<P> {
    type Output = Option<P::Output>;

    fn try_parse(&self, raw: &Value) -> Result<Self::Output, ParseError> {
        if raw.is_null() {
            return Ok(None);
        }
        self.inner.try_parse(raw).map(Some).map_err(|error| match error {
            ParseError::Simple(mut e)
                if e.location.is_root()
                    && matches!(e.code, ErrorCode::InvalidType | ErrorCode::InvalidShape) =>
            {
                e.expected = self.describe();
                ParseError::Simple(e)
            }
            other => other,
        })
    }

    fn to_open_api(&self, ctx: &mut SchemaContext) -> Value {
        make_nullable(self.inner.to_open_api(ctx))
    }

    fn describe(&self) -> String {
        format!("Union[None, {}]", self.inner.describe())
    }
}
