//! Error types.
//!
//! Parse failures ([`ParseError`] and its parts) are per-request and carry
//! locations; [`DefinitionError`] covers parser declarations that are invalid
//! before any input is seen.

mod definition_error;
mod parse_error;

pub use definition_error::DefinitionError;
pub use parse_error::{ErrorCode, Got, MultipleParseErrors, ParseError, SimpleParseError};
