//! Homogeneous list parser.

use serde_json::{json, Value};

use crate::error::{ErrorCode, ParseError, SimpleParseError};
use crate::interop::SchemaContext;
use crate::location::Segment;

use super::traits::Parser;

/// A parser for JSON arrays whose items all satisfy one inner parser.
///
/// Every item is checked; failures are collected with their index and raised
/// together once the whole array has been visited.
///
/// # Example
///
/// ```rust
/// use reqshape::{Parser, Shape};
/// use serde_json::json;
///
/// let ids = Shape::list(Shape::integer());
///
/// let error = ids.try_parse(&json!([1, "two", 3, "four"])).unwrap_err();
/// assert_eq!(error.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct List<P> {
    inner: P,
}

impl<P: Parser> List<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    /// Returns the item parser.
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: Parser> Parser for List<P> {
    type Output = Vec<P::Output>;

    fn try_parse(&self, raw: &Value) -> Result<Self::Output, ParseError> {
        let items = raw.as_array().ok_or_else(|| {
            SimpleParseError::new(self.describe(), raw).with_code(ErrorCode::InvalidShape)
        })?;

        let mut errors = Vec::new();
        let mut parsed = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match self.inner.try_parse(item) {
                Ok(value) => parsed.push(value),
                Err(e) => errors.extend(e.add_location(Segment::index(index))),
            }
        }

        ParseError::collected(errors)?;
        Ok(parsed)
    }

    fn to_open_api(&self, ctx: &mut SchemaContext) -> Value {
        json!({
            "type": "array",
            "items": self.inner.to_open_api(ctx),
        })
    }

    fn describe(&self) -> String {
        format!("List[{}]", self.inner.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::simple::SimpleValue;

    #[test]
    fn test_parses_all_items() {
        let parser = List::new(SimpleValue::string());
        assert_eq!(
            parser.try_parse(&json!(["a", "b"])).unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_empty_list() {
        let parser = List::new(SimpleValue::integer());
        assert!(parser.try_parse(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_non_list_is_single_shape_error() {
        let parser = List::new(SimpleValue::integer());
        match parser.try_parse(&json!({"0": 1})) {
            Err(ParseError::Simple(e)) => {
                assert_eq!(e.code, ErrorCode::InvalidShape);
                assert_eq!(e.expected, "List[int]");
            }
            other => panic!("expected simple error, got {:?}", other),
        }
    }

    #[test]
    fn test_collects_every_bad_item_with_index() {
        let parser = List::new(SimpleValue::integer());
        let error = parser.try_parse(&json!(["x", 1, "y"])).unwrap_err();
        let paths: Vec<_> = error.iter().map(|e| e.location.to_string()).collect();
        assert_eq!(paths, vec!["0", "2"]);
    }

    #[test]
    fn test_nested_locations() {
        let parser = List::new(List::new(SimpleValue::integer()));
        let error = parser.try_parse(&json!([[1], [2, "x"]])).unwrap_err();
        assert_eq!(error.len(), 1);
        assert_eq!(error.iter().next().unwrap().location.to_string(), "1[1]");
    }

    #[test]
    fn test_open_api() {
        let mut ctx = SchemaContext::new();
        assert_eq!(
            List::new(SimpleValue::string()).to_open_api(&mut ctx),
            json!({"type": "array", "items": {"type": "string"}})
        );
    }
}
