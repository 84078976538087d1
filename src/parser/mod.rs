//! Parsers for request payloads.
//!
//! Every parser turns a decoded JSON value into a typed value, or fails with
//! every problem it found, each located within the payload. Parsers compose:
//! lists, mappings, nullables, unions and records all wrap other parsers.
//!
//! # Example
//!
//! ```rust
//! use reqshape::{Argument, Parser, Shape};
//! use serde_json::json;
//!
//! let user = Shape::fixed(vec![
//!     Argument::required("name", Shape::string()),
//!     Argument::optional("tags", Shape::list(Shape::string())),
//! ])
//! .unwrap();
//!
//! let record = user.try_parse(&json!({"name": "ada"})).unwrap();
//! assert_eq!(record.get("name").unwrap().as_str(), Some("ada"));
//! ```

mod fixed;
mod lazy;
mod list;
mod lookup;
mod nullable;
pub mod rich;
mod simple;
mod traits;
mod union;

pub use fixed::{Argument, FixedMapping};
pub use lazy::Lazy;
pub use list::List;
pub use lookup::LookupMapping;
pub use nullable::Nullable;
pub use rich::RichValue;
pub use simple::{Primitive, PrimitiveType, SimpleValue};
pub use traits::{shared, DynParser, Parser, SharedParser};
pub use union::{ParserExt, Union};

use crate::error::DefinitionError;

/// Entry point for building parsers.
///
/// `Shape` provides factory methods for every structural parser. Rich
/// semantic parsers live on [`RichValue`].
///
/// # Example
///
/// ```rust
/// use reqshape::{Parsed, Parser, Shape};
/// use serde_json::json;
///
/// let scores = Shape::lookup(Shape::nullable(Shape::integer()));
///
/// let parsed = scores.try_parse(&json!({"ada": 3, "bob": null})).unwrap();
/// assert_eq!(parsed["ada"], Some(3));
/// assert_eq!(parsed["bob"], None);
/// ```
pub struct Shape;

impl Shape {
    /// Accepts strings only.
    pub fn string() -> SimpleValue<String> {
        SimpleValue::string()
    }

    /// Accepts integers only. Booleans and floats are rejected.
    pub fn integer() -> SimpleValue<i64> {
        SimpleValue::integer()
    }

    /// Accepts floats, widening integers.
    pub fn float() -> SimpleValue<f64> {
        SimpleValue::float()
    }

    /// Accepts booleans only.
    pub fn boolean() -> SimpleValue<bool> {
        SimpleValue::boolean()
    }

    /// Accepts arrays whose every item satisfies `inner`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use reqshape::{Parser, Shape};
    /// use serde_json::json;
    ///
    /// let error = Shape::list(Shape::integer())
    ///     .try_parse(&json!([1, "x", 3]))
    ///     .unwrap_err();
    ///
    /// assert_eq!(error.iter().next().unwrap().location.to_string(), "1");
    /// ```
    pub fn list<P: Parser>(inner: P) -> List<P> {
        List::new(inner)
    }

    /// Accepts objects with arbitrary keys whose values satisfy `values`.
    pub fn lookup<P: Parser>(values: P) -> LookupMapping<P> {
        LookupMapping::new(values)
    }

    /// Accepts `null` or whatever `inner` accepts.
    pub fn nullable<P: Parser>(inner: P) -> Nullable<P> {
        Nullable::new(inner)
    }

    /// Defers building a parser until first use, for recursive shapes.
    pub fn lazy<P, F>(factory: F) -> Lazy<P>
    where
        P: Parser,
        F: Fn() -> P + Send + Sync + 'static,
    {
        Lazy::new(factory)
    }

    /// Accepts a value satisfying any of `alternatives`.
    ///
    /// `Shape::string() | Shape::integer()` and [`ParserExt::or`] build the
    /// same thing from two parsers.
    pub fn union(alternatives: Vec<SharedParser>) -> Union {
        Union::new(alternatives)
    }

    /// Accepts objects with a fixed set of keys.
    ///
    /// Fails if two arguments share a key.
    pub fn fixed(arguments: Vec<Argument>) -> Result<FixedMapping, DefinitionError> {
        FixedMapping::new(arguments)
    }
}
