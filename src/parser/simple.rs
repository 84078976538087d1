//! Exact-type primitive parsers.
//!
//! This module provides [`SimpleValue`], one parser per JSON primitive. A
//! value is accepted only when its runtime type matches exactly: booleans are
//! never numbers and numbers are never strings. The single widening allowed is
//! integer to float.

use std::fmt;
use std::marker::PhantomData;

use serde_json::{json, Value};

use crate::error::{ErrorCode, ParseError, SimpleParseError};
use crate::interop::SchemaContext;
use crate::value::Parsed;

use super::traits::Parser;

/// The four primitive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Str,
    Int,
    Float,
    Bool,
}

impl Primitive {
    /// The name used in descriptions and messages.
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Str => "str",
            Primitive::Int => "int",
            Primitive::Float => "float",
            Primitive::Bool => "bool",
        }
    }

    /// The OpenAPI fragment for this kind.
    pub fn open_api(&self) -> Value {
        match self {
            Primitive::Str => json!({"type": "string"}),
            Primitive::Int => json!({"type": "integer"}),
            Primitive::Float => json!({"type": "number"}),
            Primitive::Bool => json!({"type": "boolean"}),
        }
    }

    /// Returns the value if its runtime type is exactly this kind.
    ///
    /// Integers do not match `Float` here; widening is the caller's decision.
    pub(crate) fn exact(&self, raw: &Value) -> Option<Parsed> {
        match (self, raw) {
            (Primitive::Str, Value::String(s)) => Some(Parsed::Str(s.clone())),
            (Primitive::Int, Value::Number(n)) => n.as_i64().map(Parsed::Int),
            (Primitive::Float, Value::Number(n)) if n.is_f64() => n.as_f64().map(Parsed::Float),
            (Primitive::Bool, Value::Bool(b)) => Some(Parsed::Bool(*b)),
            _ => None,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The error for a value none of `kinds` accepts.
///
/// A whole number above `i64::MAX` has the right type for an integer kind,
/// so it is reported as out of range rather than as a type mismatch.
pub(crate) fn mismatch(
    expected: impl Into<String>,
    kinds: &[Primitive],
    raw: &Value,
) -> ParseError {
    let error = SimpleParseError::new(expected, raw);
    if kinds.contains(&Primitive::Int) && raw.is_u64() && raw.as_i64().is_none() {
        return error
            .with_code(ErrorCode::OutOfRange)
            .with_detail(format!("is larger than the maximum {}", i64::MAX))
            .into();
    }
    error.into()
}

/// A Rust type that a [`SimpleValue`] can produce.
pub trait PrimitiveType: Sized + Into<Parsed> + Send + Sync + 'static {
    const KIND: Primitive;

    /// Extracts the value, honouring exact-type matching.
    fn extract(raw: &Value) -> Option<Self>;
}

impl PrimitiveType for String {
    const KIND: Primitive = Primitive::Str;

    fn extract(raw: &Value) -> Option<Self> {
        raw.as_str().map(str::to_string)
    }
}

impl PrimitiveType for i64 {
    const KIND: Primitive = Primitive::Int;

    fn extract(raw: &Value) -> Option<Self> {
        raw.as_i64()
    }
}

impl PrimitiveType for f64 {
    const KIND: Primitive = Primitive::Float;

    // Any JSON number, so integers widen.
    fn extract(raw: &Value) -> Option<Self> {
        raw.as_f64()
    }
}

impl PrimitiveType for bool {
    const KIND: Primitive = Primitive::Bool;

    fn extract(raw: &Value) -> Option<Self> {
        raw.as_bool()
    }
}

/// A parser for one primitive kind.
///
/// # Example
///
/// ```rust
/// use reqshape::{Parser, Shape};
/// use serde_json::json;
///
/// assert_eq!(Shape::integer().try_parse(&json!(5)).unwrap(), 5);
/// assert!(Shape::integer().try_parse(&json!(true)).is_err());
/// assert_eq!(Shape::float().try_parse(&json!(5)).unwrap(), 5.0);
/// ```
pub struct SimpleValue<T> {
    _output: PhantomData<fn() -> T>,
}

impl<T: PrimitiveType> SimpleValue<T> {
    pub fn new() -> Self {
        Self {
            _output: PhantomData,
        }
    }

    /// The kind this parser accepts.
    pub fn kind(&self) -> Primitive {
        T::KIND
    }
}

impl SimpleValue<String> {
    pub fn string() -> Self {
        Self::new()
    }
}

impl SimpleValue<i64> {
    pub fn integer() -> Self {
        Self::new()
    }
}

impl SimpleValue<f64> {
    pub fn float() -> Self {
        Self::new()
    }
}

impl SimpleValue<bool> {
    pub fn boolean() -> Self {
        Self::new()
    }
}

impl<T: PrimitiveType> Default for SimpleValue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SimpleValue<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SimpleValue<T> {}

impl<T: PrimitiveType> fmt::Debug for SimpleValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SimpleValue({})", T::KIND)
    }
}

impl<T: PrimitiveType> Parser for SimpleValue<T> {
    type Output = T;

    fn try_parse(&self, raw: &Value) -> Result<T, ParseError> {
        T::extract(raw).ok_or_else(|| mismatch(T::KIND.name(), &[T::KIND], raw))
    }

    fn to_open_api(&self, _ctx: &mut SchemaContext) -> Value {
        T::KIND.open_api()
    }

    fn describe(&self) -> String {
        T::KIND.name().to_string()
    }

    fn primitive_kinds(&self) -> Option<Vec<Primitive>> {
        Some(vec![T::KIND])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message<T: PrimitiveType>(parser: SimpleValue<T>, raw: Value) -> String {
        parser.try_parse(&raw).err().unwrap().to_string()
    }

    #[test]
    fn test_exact_matches() {
        assert_eq!(SimpleValue::string().try_parse(&json!("s")).unwrap(), "s");
        assert_eq!(SimpleValue::integer().try_parse(&json!(-3)).unwrap(), -3);
        assert_eq!(SimpleValue::float().try_parse(&json!(2.5)).unwrap(), 2.5);
        assert!(SimpleValue::boolean().try_parse(&json!(false)).is_ok());
    }

    #[test]
    fn test_bool_is_not_a_number() {
        assert!(SimpleValue::integer().try_parse(&json!(true)).is_err());
        assert!(SimpleValue::float().try_parse(&json!(false)).is_err());
    }

    #[test]
    fn test_number_is_not_a_string() {
        assert_eq!(
            message(SimpleValue::string(), json!(5)),
            "a str is required, but got 5, which is of type int"
        );
    }

    #[test]
    fn test_float_is_not_an_integer() {
        assert_eq!(
            message(SimpleValue::integer(), json!(5.5)),
            "an int is required, but got 5.5, which is of type float"
        );
    }

    #[test]
    fn test_integer_above_i64_max_out_of_range() {
        let error = SimpleValue::integer().try_parse(&json!(u64::MAX)).unwrap_err();
        let first = error.iter().next().unwrap();
        assert_eq!(first.code, ErrorCode::OutOfRange);
        assert_eq!(
            first.to_string(),
            "an int is required, but got 18446744073709551615, \
             which is larger than the maximum 9223372036854775807"
        );
        assert_eq!(SimpleValue::float().try_parse(&json!(u64::MAX)).unwrap(), u64::MAX as f64);
    }

    #[test]
    fn test_integer_widens_to_float() {
        assert_eq!(SimpleValue::float().try_parse(&json!(7)).unwrap(), 7.0);
    }

    #[test]
    fn test_error_is_simple_type_error() {
        match SimpleValue::boolean().try_parse(&json!("true")) {
            Err(ParseError::Simple(e)) => assert_eq!(e.code, ErrorCode::InvalidType),
            other => panic!("expected simple error, got {:?}", other),
        }
    }

    #[test]
    fn test_exact_excludes_widening() {
        assert_eq!(Primitive::Float.exact(&json!(1)), None);
        assert_eq!(Primitive::Float.exact(&json!(1.0)), Some(Parsed::Float(1.0)));
        assert_eq!(Primitive::Int.exact(&json!(true)), None);
    }

    #[test]
    fn test_open_api_and_describe() {
        let mut ctx = SchemaContext::new();
        assert_eq!(SimpleValue::integer().to_open_api(&mut ctx), json!({"type": "integer"}));
        assert_eq!(SimpleValue::boolean().describe(), "bool");
        assert_eq!(SimpleValue::float().primitive_kinds(), Some(vec![Primitive::Float]));
    }
}
