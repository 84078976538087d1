//! Email address list parser.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Value};

use crate::error::{ErrorCode, ParseError, SimpleParseError};
use crate::interop::SchemaContext;
use crate::parser::traits::Parser;

static ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is valid")
});

/// A mailbox: an address with an optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress {
    pub name: Option<String>,
    pub address: String,
}

impl EmailAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            name: None,
            address: address.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) if name.contains([',', ';', '"']) => {
                write!(f, "\"{}\" <{}>", name.replace('"', "'"), self.address)
            }
            Some(name) => write!(f, "{} <{}>", name, self.address),
            None => f.write_str(&self.address),
        }
    }
}

/// Parses a string holding one or more mailboxes separated by `,` or `;`.
///
/// Each entry is either a bare address or `Display Name <address>`; display
/// names may be double-quoted to contain separators. Empty entries are
/// skipped, but a single malformed entry rejects the whole value.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailListValue;

/// Splits on unquoted separators.
fn split_entries(text: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut quoted = false;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ',' | ';' if !quoted => {
                entries.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    entries.push(&text[start..]);
    entries
}

fn parse_entry(entry: &str) -> Option<EmailAddress> {
    let (name, address) = match (entry.rfind('<'), entry.strip_suffix('>')) {
        (Some(open), Some(body)) => {
            let name = entry[..open].trim();
            let name = name
                .strip_prefix('"')
                .and_then(|n| n.strip_suffix('"'))
                .unwrap_or(name);
            let name = (!name.is_empty()).then(|| name.to_string());
            (name, body[open + 1..].trim())
        }
        _ => (None, entry),
    };

    ADDRESS.is_match(address).then(|| EmailAddress {
        name,
        address: address.to_string(),
    })
}

impl Parser for EmailListValue {
    type Output = Vec<EmailAddress>;

    fn try_parse(&self, raw: &Value) -> Result<Vec<EmailAddress>, ParseError> {
        let text = raw
            .as_str()
            .ok_or_else(|| SimpleParseError::new("str", raw))?;
        let invalid = || {
            SimpleParseError::new("str", raw)
                .with_code(ErrorCode::InvalidFormat)
                .with_detail("can't be parsed as a list of email addresses")
        };

        let addresses = split_entries(text)
            .into_iter()
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(parse_entry)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;

        if addresses.is_empty() {
            return Err(invalid().into());
        }
        Ok(addresses)
    }

    fn to_open_api(&self, _ctx: &mut SchemaContext) -> Value {
        json!({
            "type": "string",
            "description": "Email addresses separated by ',' or ';'",
        })
    }

    fn describe(&self) -> String {
        "EmailList".to_string()
    }
}
