//! Parse error types.
//!
//! This module provides [`SimpleParseError`] for a single rejected value,
//! [`MultipleParseErrors`] for the failures a composite parser collected, and
//! [`ParseError`], the type every `try_parse` fails with.

use std::fmt::{self, Display};

use serde_json::{json, Value};
use stillwater::prelude::*;

use crate::location::{Location, Segment};

/// Machine-readable classification of a simple failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A list or object was required and something else arrived.
    InvalidShape,
    /// A primitive of the wrong runtime type.
    InvalidType,
    /// Right type, but the content does not follow the expected grammar.
    InvalidFormat,
    /// Right type and format, but outside the allowed range.
    OutOfRange,
    /// A required key was absent.
    Missing,
}

impl ErrorCode {
    /// Returns the snake_case wire name of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidShape => "invalid_shape",
            ErrorCode::InvalidType => "invalid_type",
            ErrorCode::InvalidFormat => "invalid_format",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::Missing => "missing",
        }
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a parser actually received.
#[derive(Debug, Clone, PartialEq)]
pub enum Got {
    /// A concrete value, rendered as compact JSON, with its runtime type name.
    Value {
        repr: String,
        type_name: &'static str,
    },
    /// The key was not present at all.
    Nothing,
    /// The value must not be echoed back (passwords).
    Redacted,
}

impl Got {
    /// Captures a raw value for error reporting.
    pub fn from_value(value: &Value) -> Self {
        Got::Value {
            repr: value.to_string(),
            type_name: type_name(value),
        }
    }
}

impl Display for Got {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Got::Value { repr, .. } => f.write_str(repr),
            Got::Nothing => f.write_str("Nothing"),
            Got::Redacted => f.write_str("REDACTED"),
        }
    }
}

/// A single value rejected by a single parser.
///
/// # Example
///
/// ```rust
/// use reqshape::{ErrorCode, SimpleParseError, Segment};
/// use serde_json::json;
///
/// let error = SimpleParseError::new("str", &json!(5)).add_location(Segment::key("name"));
///
/// assert_eq!(error.code, ErrorCode::InvalidType);
/// assert_eq!(
///     error.to_string(),
///     "at index \"name\" a str is required, but got 5, which is of type int"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleParseError {
    /// Description of the accepted shape, e.g. `str` or `Union[None, int]`.
    pub expected: String,
    /// The rejected input.
    pub got: Got,
    /// Replaces the default "is of type ..." tail when set.
    pub detail: Option<String>,
    /// Classification for programmatic handling.
    pub code: ErrorCode,
    /// Where the rejected value sits in the payload.
    pub location: Location,
}

impl SimpleParseError {
    /// Creates a type error for `value`, at the root location.
    pub fn new(expected: impl Into<String>, value: &Value) -> Self {
        Self {
            expected: expected.into(),
            got: Got::from_value(value),
            detail: None,
            code: ErrorCode::InvalidType,
            location: Location::root(),
        }
    }

    /// Creates an error for a required key that was absent.
    pub fn missing(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            got: Got::Nothing,
            detail: None,
            code: ErrorCode::Missing,
            location: Location::root(),
        }
    }

    /// Sets the error code and returns self for chaining.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = code;
        self
    }

    /// Sets the explanatory tail (rendered after ", which ") and returns self.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Replaces the rejected value with a `REDACTED` marker.
    pub fn redacted(mut self) -> Self {
        self.got = Got::Redacted;
        self
    }

    /// Returns this error with `segment` pushed as the new outermost location.
    pub fn add_location(mut self, segment: Segment) -> Self {
        self.location = self.location.prepend(segment);
        self
    }

    /// Renders the message without the location prefix.
    pub fn message(&self) -> String {
        let mut message = format!(
            "{} {} is required, but got {}",
            article(&self.expected),
            self.expected,
            self.got
        );
        match (&self.detail, &self.got) {
            (Some(detail), _) => {
                message.push_str(", which ");
                message.push_str(detail);
            }
            (None, Got::Value { type_name, .. }) => {
                message.push_str(", which is of type ");
                message.push_str(type_name);
            }
            (None, _) => {}
        }
        message
    }

    /// Returns a structured representation for API error responses.
    pub fn to_json(&self) -> Value {
        json!({
            "location": self.location.to_json(),
            "path": self.location.to_string(),
            "code": self.code.as_str(),
            "message": self.message(),
        })
    }
}

impl Display for SimpleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.location.is_root() {
            write!(f, "at index \"{}\" ", self.location)?;
        }
        f.write_str(&self.message())
    }
}

impl std::error::Error for SimpleParseError {}

/// The ordered failures collected by one composite parse.
///
/// Children keep the order in which they were checked. Nested aggregates are
/// flattened on collection, so each child is a located [`SimpleParseError`].
#[derive(Debug, Clone, PartialEq)]
pub struct MultipleParseErrors(NonEmptyVec<SimpleParseError>);

impl MultipleParseErrors {
    /// Creates an aggregate from collected errors, or None when there are none.
    pub fn from_vec(errors: Vec<SimpleParseError>) -> Option<Self> {
        let mut iter = errors.into_iter();
        let first = iter.next()?;
        let collected = iter.fold(NonEmptyVec::singleton(first), |acc, error| {
            acc.combine(NonEmptyVec::singleton(error))
        });
        Some(Self(collected))
    }

    /// Returns the number of child errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; an aggregate holds at least one error.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates over child errors in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &SimpleParseError> {
        self.0.iter()
    }

    /// Returns the first collected error.
    pub fn first(&self) -> &SimpleParseError {
        self.0.head()
    }

    /// Converts into the child errors.
    pub fn into_vec(self) -> Vec<SimpleParseError> {
        self.0.into_vec()
    }

    fn add_location(self, segment: Segment) -> Self {
        let errors: Vec<_> = self
            .0
            .into_vec()
            .into_iter()
            .map(|e| e.add_location(segment.clone()))
            .collect();
        // Non-empty in, non-empty out.
        match Self::from_vec(errors) {
            Some(errors) => errors,
            None => unreachable!("aggregate lost its errors while relocating"),
        }
    }
}

impl Semigroup for MultipleParseErrors {
    fn combine(self, other: Self) -> Self {
        MultipleParseErrors(self.0.combine(other.0))
    }
}

impl Display for MultipleParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Parsing failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for MultipleParseErrors {}

/// The error every parser fails with.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A leaf rejection; leaf parsers fail immediately with one of these.
    Simple(SimpleParseError),
    /// Everything a container collected before giving up.
    Multiple(MultipleParseErrors),
}

impl ParseError {
    /// Returns this error with `segment` pushed as the outermost location of
    /// every contained failure.
    pub fn add_location(self, segment: Segment) -> Self {
        match self {
            ParseError::Simple(e) => ParseError::Simple(e.add_location(segment)),
            ParseError::Multiple(e) => ParseError::Multiple(e.add_location(segment)),
        }
    }

    /// Returns the number of leaf failures.
    pub fn len(&self) -> usize {
        match self {
            ParseError::Simple(_) => 1,
            ParseError::Multiple(e) => e.len(),
        }
    }

    /// Always false; a parse error describes at least one failure.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns true for aggregates.
    pub fn is_multiple(&self) -> bool {
        matches!(self, ParseError::Multiple(_))
    }

    /// Iterates over leaf failures.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &SimpleParseError> + '_> {
        match self {
            ParseError::Simple(e) => Box::new(std::iter::once(e)),
            ParseError::Multiple(e) => Box::new(e.iter()),
        }
    }

    /// Returns the leaf failures found at `location`.
    pub fn at(&self, location: &Location) -> Vec<&SimpleParseError> {
        self.iter().filter(|e| &e.location == location).collect()
    }

    /// Returns the leaf failures with `code`.
    pub fn with_code(&self, code: ErrorCode) -> Vec<&SimpleParseError> {
        self.iter().filter(|e| e.code == code).collect()
    }

    /// Returns a structured payload: `{"errors": [{location, path, code, message}, ...]}`.
    pub fn to_json(&self) -> Value {
        json!({
            "errors": self.iter().map(SimpleParseError::to_json).collect::<Vec<_>>()
        })
    }

    /// Raises the collected child errors as one aggregate, if there are any.
    pub(crate) fn collected(errors: Vec<SimpleParseError>) -> Result<(), ParseError> {
        match MultipleParseErrors::from_vec(errors) {
            Some(errors) => Err(ParseError::Multiple(errors)),
            None => Ok(()),
        }
    }
}

impl From<SimpleParseError> for ParseError {
    fn from(error: SimpleParseError) -> Self {
        ParseError::Simple(error)
    }
}

impl From<MultipleParseErrors> for ParseError {
    fn from(errors: MultipleParseErrors) -> Self {
        ParseError::Multiple(errors)
    }
}

impl Semigroup for ParseError {
    fn combine(self, other: Self) -> Self {
        let mut errors = self.into_iter().collect::<Vec<_>>();
        errors.extend(other);
        match MultipleParseErrors::from_vec(errors) {
            Some(errors) => ParseError::Multiple(errors),
            None => unreachable!("combining two parse errors yields at least two failures"),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Simple(e) => Display::fmt(e, f),
            ParseError::Multiple(e) => Display::fmt(e, f),
        }
    }
}

impl std::error::Error for ParseError {}

impl IntoIterator for ParseError {
    type Item = SimpleParseError;
    type IntoIter = std::vec::IntoIter<SimpleParseError>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            ParseError::Simple(e) => vec![e].into_iter(),
            ParseError::Multiple(e) => e.into_vec().into_iter(),
        }
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ParseError>();
    assert_sync::<ParseError>();
};

/// Returns the runtime type name used in messages.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "None",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn article(word: &str) -> &'static str {
    match word.chars().next() {
        Some(c) if "aeiouAEIOU".contains(c) => "an",
        _ => "a",
    }
}
