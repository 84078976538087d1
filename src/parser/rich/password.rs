//! Password parser.

use std::fmt;

use serde_json::{json, Value};

use crate::error::{ParseError, SimpleParseError};
use crate::interop::SchemaContext;
use crate::parser::traits::Parser;

/// A secret string. `Debug` and `Display` never show the content.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Returns the secret itself.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(REDACTED)")
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("REDACTED")
    }
}

/// Parses a string into a [`Password`], redacting the input on failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordValue;

impl Parser for PasswordValue {
    type Output = Password;

    fn try_parse(&self, raw: &Value) -> Result<Password, ParseError> {
        match raw {
            Value::String(secret) => Ok(Password(secret.clone())),
            _ => Err(SimpleParseError::new("str", raw).redacted().into()),
        }
    }

    fn to_open_api(&self, _ctx: &mut SchemaContext) -> Value {
        json!({"type": "string", "format": "password"})
    }

    fn describe(&self) -> String {
        "Password".to_string()
    }
}
