//! Open string-keyed mapping parser.

use indexmap::IndexMap;
use serde_json::{json, Value};

use crate::error::{ErrorCode, ParseError, SimpleParseError};
use crate::interop::SchemaContext;
use crate::location::Segment;

use super::traits::Parser;

/// A parser for JSON objects with arbitrary keys and homogeneous values.
///
/// Keys in a decoded JSON object are always strings, so only values are
/// checked. Errors from every entry are collected before failing, each
/// located at its key. The result is a fresh map in input order.
///
/// # Example
///
/// ```rust
/// use reqshape::{Parser, Shape};
/// use serde_json::json;
///
/// let scores = Shape::lookup(Shape::integer());
///
/// let parsed = scores.try_parse(&json!({"ada": 3, "bob": 5})).unwrap();
/// assert_eq!(parsed["bob"], 5);
/// ```
#[derive(Debug, Clone)]
pub struct LookupMapping<P> {
    values: P,
}

impl<P: Parser> LookupMapping<P> {
    pub fn new(values: P) -> Self {
        Self { values }
    }
}

impl<P: Parser> Parser for LookupMapping<P> {
    type Output = IndexMap<String, P::Output>;

    fn try_parse(&self, raw: &Value) -> Result<Self::Output, ParseError> {
        let object = raw.as_object().ok_or_else(|| {
            SimpleParseError::new(self.describe(), raw).with_code(ErrorCode::InvalidShape)
        })?;

        let mut errors = Vec::new();
        let mut parsed = IndexMap::with_capacity(object.len());
        for (key, value) in object {
            match self.values.try_parse(value) {
                Ok(v) => {
                    parsed.insert(key.clone(), v);
                }
                Err(e) => errors.extend(e.add_location(Segment::key(key.as_str()))),
            }
        }

        ParseError::collected(errors)?;
        Ok(parsed)
    }

    fn to_open_api(&self, ctx: &mut SchemaContext) -> Value {
        json!({
            "type": "object",
            "additionalProperties": self.values.to_open_api(ctx),
        })
    }

    fn describe(&self) -> String {
        format!("Mapping[str, {}]", self.values.describe())
    }
}
