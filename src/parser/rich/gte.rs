//! Lower-bound refinement.

use std::fmt::Display;

use serde_json::Value;

use crate::error::{ErrorCode, ParseError, SimpleParseError};
use crate::interop::SchemaContext;
use crate::parser::traits::Parser;
use crate::value::Parsed;

/// Wraps a parser and requires its output to be at least `minimum`.
///
/// Type failures come from the inner parser unchanged; a value below the
/// bound fails with [`ErrorCode::OutOfRange`].
///
/// # Example
///
/// ```rust
/// use reqshape::{Parser, RichValue, Shape};
/// use serde_json::json;
///
/// let page = RichValue::gte(Shape::integer(), 1);
///
/// assert_eq!(page.try_parse(&json!(3)).unwrap(), 3);
/// let error = page.try_parse(&json!(0)).unwrap_err();
/// assert!(error.to_string().contains("minimum 1"));
/// ```
pub struct ValueGte<P: Parser> {
    inner: P,
    minimum: P::Output,
}

impl<P: Parser> ValueGte<P> {
    pub fn new(inner: P, minimum: P::Output) -> Self {
        Self { inner, minimum }
    }

    pub fn minimum(&self) -> &P::Output {
        &self.minimum
    }
}

impl<P> Parser for ValueGte<P>
where
    P: Parser,
    P::Output: PartialOrd + Display + Clone + Send + Sync,
{
    type Output = P::Output;

    fn try_parse(&self, raw: &Value) -> Result<P::Output, ParseError> {
        let value = self.inner.try_parse(raw)?;
        if value >= self.minimum {
            return Ok(value);
        }
        Err(SimpleParseError::new(self.describe(), raw)
            .with_code(ErrorCode::OutOfRange)
            .with_detail(format!("is less than the minimum {}", self.minimum))
            .into())
    }

    fn to_open_api(&self, ctx: &mut SchemaContext) -> Value {
        let mut fragment = self.inner.to_open_api(ctx);
        let bound: Parsed = self.minimum.clone().into();
        let bound = bound.to_json();
        let numeric = matches!(
            fragment.get("type").and_then(Value::as_str),
            Some("integer" | "number")
        );
        if numeric && bound.is_number() {
            if let Some(object) = fragment.as_object_mut() {
                object.insert("minimum".to_string(), bound);
            }
        }
        fragment
    }

    fn describe(&self) -> String {
        format!("{} >= {}", self.inner.describe(), self.minimum)
    }
}
