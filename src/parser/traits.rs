//! Traits shared by every parser.
//!
//! [`Parser`] is the statically typed interface. [`DynParser`] erases the
//! output type so records and unions can hold parsers of different outputs.

use std::sync::Arc;

use serde_json::Value;
use stillwater::Validation;

use crate::error::ParseError;
use crate::interop::SchemaContext;
use crate::value::Parsed;

use super::simple::Primitive;

/// A validator that turns a raw JSON value into a typed value.
///
/// Parsers are built once at startup and then shared; `try_parse` takes
/// `&self` and keeps no state between calls, so the `Send + Sync` bounds let
/// one parser serve many request threads.
///
/// # Example
///
/// ```rust
/// use reqshape::{Parser, Shape};
/// use serde_json::json;
///
/// let tags = Shape::list(Shape::string());
///
/// assert_eq!(tags.try_parse(&json!(["a", "b"])).unwrap(), vec!["a", "b"]);
/// assert_eq!(tags.describe(), "List[str]");
/// ```
pub trait Parser: Send + Sync {
    /// The type produced by a successful parse.
    type Output: Into<Parsed>;

    /// Parses `raw`, failing with every problem found.
    fn try_parse(&self, raw: &Value) -> Result<Self::Output, ParseError>;

    /// Describes the accepted shape as an OpenAPI Schema Object fragment.
    fn to_open_api(&self, ctx: &mut SchemaContext) -> Value;

    /// A short human-readable name for the accepted shape, e.g. `List[int]`.
    fn describe(&self) -> String;

    /// Parses `raw` into a `Validation`, for accumulating across independent
    /// parses with `Validation::and`.
    fn validate(&self, raw: &Value) -> Validation<Self::Output, ParseError> {
        match self.try_parse(raw) {
            Ok(value) => Validation::Success(value),
            Err(error) => Validation::Failure(error),
        }
    }

    /// The primitive kinds this parser accepts, if it is a plain primitive
    /// or a union of plain primitives. Unions use this to pick the
    /// primitive-only strategy and to flatten nested unions.
    fn primitive_kinds(&self) -> Option<Vec<Primitive>> {
        None
    }
}

/// A parser with its output erased to [`Parsed`].
///
/// Implemented for every [`Parser`].
pub trait DynParser: Send + Sync {
    fn parse_dynamic(&self, raw: &Value) -> Result<Parsed, ParseError>;
    fn open_api(&self, ctx: &mut SchemaContext) -> Value;
    fn name(&self) -> String;
    fn kinds(&self) -> Option<Vec<Primitive>>;
}

impl<P: Parser> DynParser for P {
    fn parse_dynamic(&self, raw: &Value) -> Result<Parsed, ParseError> {
        self.try_parse(raw).map(Into::into)
    }

    fn open_api(&self, ctx: &mut SchemaContext) -> Value {
        self.to_open_api(ctx)
    }

    fn name(&self) -> String {
        self.describe()
    }

    fn kinds(&self) -> Option<Vec<Primitive>> {
        self.primitive_kinds()
    }
}

/// A shared, type-erased parser handle.
pub type SharedParser = Arc<dyn DynParser>;

/// Lets a shared handle be used wherever a `Parser` is expected.
///
/// Calls go through `**self` to reach the erased parser; `self.name()` would
/// resolve to this very impl via the blanket `DynParser` impl.
impl Parser for SharedParser {
    type Output = Parsed;

    fn try_parse(&self, raw: &Value) -> Result<Parsed, ParseError> {
        (**self).parse_dynamic(raw)
    }

    fn to_open_api(&self, ctx: &mut SchemaContext) -> Value {
        (**self).open_api(ctx)
    }

    fn describe(&self) -> String {
        (**self).name()
    }

    fn primitive_kinds(&self) -> Option<Vec<Primitive>> {
        (**self).kinds()
    }
}

/// Erases a parser into a [`SharedParser`].
pub fn shared<P: Parser + 'static>(parser: P) -> SharedParser {
    Arc::new(parser)
}
