//! # Reqshape
//!
//! A parser-combinator library for untrusted request payloads that reports
//! ALL validation errors, each with its exact location, instead of stopping at
//! the first one.
//!
//! ## Overview
//!
//! Parsers are declared once at startup and turn decoded JSON into typed
//! values. Composite parsers (lists, mappings, records) check every child
//! before failing and raise one aggregate error, so a client learns about
//! every problem in a single round trip. Every parser can also describe
//! itself as an OpenAPI Schema Object, so documentation follows the code.
//!
//! ## Core Types
//!
//! - [`Parser`]: The contract every parser implements
//! - [`Shape`]: Entry point for primitive and structural parsers
//! - [`RichValue`]: Semantic parsers (UUID, datetime, duration, ...)
//! - [`FixedMapping`]: Closed records with required, optional and tag fields
//! - [`ParseError`]: One located failure, or all failures of a composite parse
//! - [`SchemaContext`]: Collects named schemas during OpenAPI export
//!
//! ## Example
//!
//! ```rust
//! use reqshape::{Argument, Parser, Shape};
//! use serde_json::json;
//!
//! let schema = Shape::fixed(vec![
//!     Argument::required("a", Shape::integer()),
//!     Argument::required("b", Shape::string()),
//!     Argument::optional("c", Shape::boolean()),
//! ])
//! .unwrap();
//!
//! let error = schema.try_parse(&json!({"a": 5, "c": true})).unwrap_err();
//! assert!(error
//!     .to_string()
//!     .contains("at index \"b\" a str is required, but got Nothing"));
//! ```

pub mod error;
pub mod interop;
pub mod location;
pub mod multipart;
pub mod parser;
pub mod registry;
pub mod value;

pub use error::{
    DefinitionError, ErrorCode, Got, MultipleParseErrors, ParseError, SimpleParseError,
};
pub use interop::SchemaContext;
pub use location::{Location, Segment};
pub use multipart::{MultipartForm, MultipartUpload, Upload, UploadedFile};
pub use parser::rich::{ByteSize, EmailAddress, Password, ValueGte};
pub use parser::{
    shared, Argument, DynParser, FixedMapping, Lazy, List, LookupMapping, Nullable, Parser,
    ParserExt, Primitive, RichValue, Shape, SharedParser, SimpleValue, Union,
};
pub use registry::{RegistryError, SchemaRegistry};
pub use value::{FieldValue, Parsed, Record, RecordError};

/// Result of a single parse.
pub type ParseResult<T> = Result<T, ParseError>;
