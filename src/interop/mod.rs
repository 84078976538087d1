//! OpenAPI schema export.
//!
//! Every parser can describe itself as an OpenAPI 3.0.3 Schema Object
//! fragment. Named schemas are collected in a [`SchemaContext`] that callers
//! assemble into `components.schemas`.

pub mod open_api;

pub use open_api::{add_description, make_nullable, SchemaContext, MAX_UNNAMED_LAZY_DEPTH};
