//! Union combinator.
//!
//! A [`Union`] accepts a value if any alternative does. When every
//! alternative is a primitive (or a union of primitives) the union switches to
//! a primitive-only strategy: exact type matches first, then integer to float
//! widening, then a single error naming every kind.

use std::ops::BitOr;

use serde_json::{json, Value};

use crate::error::{ParseError, SimpleParseError};
use crate::interop::SchemaContext;
use crate::value::Parsed;

use super::simple::{mismatch, Primitive, PrimitiveType, SimpleValue};
use super::traits::{shared, Parser, SharedParser};

#[derive(Clone)]
enum Strategy {
    /// Flattened, de-duplicated primitive kinds in declaration order.
    Primitives(Vec<Primitive>),
    /// Arbitrary parsers tried in declaration order.
    Alternatives(Vec<SharedParser>),
}

/// A parser accepting any one of several alternatives.
///
/// Generic alternatives are tried in order and the first success wins; there
/// is no best-match scoring between differently shaped alternatives.
///
/// # Example
///
/// ```rust
/// use reqshape::{Parsed, Parser, Shape};
/// use serde_json::json;
///
/// let id = Shape::string() | Shape::integer();
///
/// assert_eq!(id.try_parse(&json!(5)).unwrap(), Parsed::Int(5));
/// assert_eq!(id.try_parse(&json!("5")).unwrap(), Parsed::Str("5".into()));
/// assert!(id.try_parse(&json!(true)).is_err());
/// ```
#[derive(Clone)]
pub struct Union {
    strategy: Strategy,
}

impl Union {
    /// Creates a union, flattening nested primitive unions.
    pub fn new(alternatives: Vec<SharedParser>) -> Self {
        let kinds: Option<Vec<Vec<Primitive>>> =
            alternatives.iter().map(|alt| alt.kinds()).collect();

        let strategy = match kinds {
            Some(kinds) if !alternatives.is_empty() => {
                let mut flat: Vec<Primitive> = Vec::new();
                for kind in kinds.into_iter().flatten() {
                    if !flat.contains(&kind) {
                        flat.push(kind);
                    }
                }
                Strategy::Primitives(flat)
            }
            _ => Strategy::Alternatives(alternatives),
        };

        Self { strategy }
    }

    /// Returns a union with `other` appended as the last alternative.
    pub fn or<P: Parser + 'static>(self, other: P) -> Union {
        let mut alternatives = self.into_alternatives();
        alternatives.push(shared(other));
        Union::new(alternatives)
    }

    /// Returns true when the primitive-only strategy is in use.
    pub fn is_primitive(&self) -> bool {
        matches!(self.strategy, Strategy::Primitives(_))
    }

    /// Returns the number of alternatives after flattening.
    pub fn len(&self) -> usize {
        match &self.strategy {
            Strategy::Primitives(kinds) => kinds.len(),
            Strategy::Alternatives(alts) => alts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn into_alternatives(self) -> Vec<SharedParser> {
        match self.strategy {
            Strategy::Primitives(kinds) => kinds.into_iter().map(primitive_parser).collect(),
            Strategy::Alternatives(alts) => alts,
        }
    }

    fn parse_primitive(&self, kinds: &[Primitive], raw: &Value) -> Result<Parsed, ParseError> {
        if let Some(parsed) = kinds.iter().find_map(|kind| kind.exact(raw)) {
            return Ok(parsed);
        }

        let is_integer = raw.is_i64() || raw.is_u64();
        if is_integer && kinds.contains(&Primitive::Float) {
            if let Some(f) = raw.as_f64() {
                return Ok(Parsed::Float(f));
            }
        }

        Err(mismatch(self.describe(), kinds, raw))
    }
}

fn primitive_parser(kind: Primitive) -> SharedParser {
    match kind {
        Primitive::Str => shared(SimpleValue::string()),
        Primitive::Int => shared(SimpleValue::integer()),
        Primitive::Float => shared(SimpleValue::float()),
        Primitive::Bool => shared(SimpleValue::boolean()),
    }
}

impl Parser for Union {
    type Output = Parsed;

    fn try_parse(&self, raw: &Value) -> Result<Parsed, ParseError> {
        match &self.strategy {
            Strategy::Primitives(kinds) => self.parse_primitive(kinds, raw),
            Strategy::Alternatives(alts) => alts
                .iter()
                .find_map(|alt| alt.parse_dynamic(raw).ok())
                .ok_or_else(|| SimpleParseError::new(self.describe(), raw).into()),
        }
    }

    fn to_open_api(&self, ctx: &mut SchemaContext) -> Value {
        let fragments: Vec<Value> = match &self.strategy {
            Strategy::Primitives(kinds) => kinds.iter().map(Primitive::open_api).collect(),
            Strategy::Alternatives(alts) => alts.iter().map(|alt| alt.open_api(ctx)).collect(),
        };
        match <[Value; 1]>::try_from(fragments) {
            Ok([only]) => only,
            Err(fragments) => json!({ "anyOf": fragments }),
        }
    }

    fn describe(&self) -> String {
        let names: Vec<String> = match &self.strategy {
            Strategy::Primitives(kinds) => kinds.iter().map(|k| k.name().to_string()).collect(),
            Strategy::Alternatives(alts) => alts.iter().map(|alt| alt.name()).collect(),
        };
        format!("Union[{}]", names.join(", "))
    }

    fn primitive_kinds(&self) -> Option<Vec<Primitive>> {
        match &self.strategy {
            Strategy::Primitives(kinds) => Some(kinds.clone()),
            Strategy::Alternatives(_) => None,
        }
    }
}

impl std::fmt::Debug for Union {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

impl<T, P> BitOr<P> for SimpleValue<T>
where
    T: PrimitiveType,
    P: Parser + 'static,
{
    type Output = Union;

    fn bitor(self, rhs: P) -> Union {
        Union::new(vec![shared(self), shared(rhs)])
    }
}

impl<P: Parser + 'static> BitOr<P> for Union {
    type Output = Union;

    fn bitor(self, rhs: P) -> Union {
        self.or(rhs)
    }
}

/// Union building for every parser.
pub trait ParserExt: Parser + Sized + 'static {
    /// Returns a union trying `self` first, then `other`.
    fn or<P: Parser + 'static>(self, other: P) -> Union {
        Union::new(vec![shared(self), shared(other)])
    }
}

impl<T: Parser + Sized + 'static> ParserExt for T {}
