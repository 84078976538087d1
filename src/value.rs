//! Typed values produced by parsers.
//!
//! Statically typed parsers return their own output types (`String`, `Vec<T>`,
//! `uuid::Uuid`, ...). Records and generic unions mix outputs of different
//! types, so they hold [`Parsed`], a closed enum every output converts into.

use chrono::{DateTime, TimeDelta, Utc};
use indexmap::IndexMap;
use serde_json::{Map, Number, Value};
use uuid::Uuid;

use crate::parser::rich::{ByteSize, EmailAddress, Password};

/// A successfully parsed value of any supported type.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Password(Password),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Duration(TimeDelta),
    FileSize(ByteSize),
    Email(EmailAddress),
    List(Vec<Parsed>),
    Map(IndexMap<String, Parsed>),
    Record(Record),
}

impl Parsed {
    pub fn is_null(&self) -> bool {
        matches!(self, Parsed::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Parsed::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Parsed::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float; integers widen.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Parsed::Float(f) => Some(*f),
            Parsed::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Parsed::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_password(&self) -> Option<&Password> {
        match self {
            Parsed::Password(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Parsed::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Parsed::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<TimeDelta> {
        match self {
            Parsed::Duration(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_file_size(&self) -> Option<ByteSize> {
        match self {
            Parsed::FileSize(size) => Some(*size),
            _ => None,
        }
    }

    pub fn as_email(&self) -> Option<&EmailAddress> {
        match self {
            Parsed::Email(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Parsed]> {
        match self {
            Parsed::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Parsed>> {
        match self {
            Parsed::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Parsed::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Renders the value back to JSON.
    ///
    /// Passwords render as `"REDACTED"`, durations as signed seconds, file
    /// sizes as a byte count, and absent optional record fields are omitted.
    pub fn to_json(&self) -> Value {
        match self {
            Parsed::Null => Value::Null,
            Parsed::Bool(b) => Value::Bool(*b),
            Parsed::Int(i) => Value::from(*i),
            Parsed::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            Parsed::Str(s) => Value::String(s.clone()),
            Parsed::Password(_) => Value::String("REDACTED".to_string()),
            Parsed::Uuid(u) => Value::String(u.hyphenated().to_string()),
            Parsed::DateTime(dt) => Value::String(dt.to_rfc3339()),
            Parsed::Duration(d) => d
                .num_microseconds()
                .and_then(|micros| Number::from_f64(micros as f64 / 1_000_000.0))
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Parsed::FileSize(size) => Value::from(size.bytes()),
            Parsed::Email(e) => Value::String(e.to_string()),
            Parsed::List(items) => Value::Array(items.iter().map(Parsed::to_json).collect()),
            Parsed::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<_, _>>(),
            ),
            Parsed::Record(record) => record.to_json(),
        }
    }
}

impl From<bool> for Parsed {
    fn from(value: bool) -> Self {
        Parsed::Bool(value)
    }
}

impl From<i64> for Parsed {
    fn from(value: i64) -> Self {
        Parsed::Int(value)
    }
}

impl From<f64> for Parsed {
    fn from(value: f64) -> Self {
        Parsed::Float(value)
    }
}

impl From<String> for Parsed {
    fn from(value: String) -> Self {
        Parsed::Str(value)
    }
}

impl From<&str> for Parsed {
    fn from(value: &str) -> Self {
        Parsed::Str(value.to_string())
    }
}

impl From<Password> for Parsed {
    fn from(value: Password) -> Self {
        Parsed::Password(value)
    }
}

impl From<Uuid> for Parsed {
    fn from(value: Uuid) -> Self {
        Parsed::Uuid(value)
    }
}

impl From<DateTime<Utc>> for Parsed {
    fn from(value: DateTime<Utc>) -> Self {
        Parsed::DateTime(value)
    }
}

impl From<TimeDelta> for Parsed {
    fn from(value: TimeDelta) -> Self {
        Parsed::Duration(value)
    }
}

impl From<ByteSize> for Parsed {
    fn from(value: ByteSize) -> Self {
        Parsed::FileSize(value)
    }
}

impl From<EmailAddress> for Parsed {
    fn from(value: EmailAddress) -> Self {
        Parsed::Email(value)
    }
}

impl From<Record> for Parsed {
    fn from(value: Record) -> Self {
        Parsed::Record(value)
    }
}

impl<T: Into<Parsed>> From<Vec<T>> for Parsed {
    fn from(items: Vec<T>) -> Self {
        Parsed::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Parsed>> From<IndexMap<String, T>> for Parsed {
    fn from(map: IndexMap<String, T>) -> Self {
        Parsed::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

/// `None` is the JSON `null` a `Nullable` accepted.
impl<T: Into<Parsed>> From<Option<T>> for Parsed {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Parsed::Null,
        }
    }
}

/// One field of a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A required argument or a tag; always holds a value.
    Required(Parsed),
    /// An optional argument; `None` means the key was absent.
    Optional(Option<Parsed>),
}

/// Misuse of a [`Record`] accessor.
///
/// Distinct from [`ParseError`](crate::ParseError): the input was fine, the
/// caller asked for something the record does not declare.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("record has no field '{0}'")]
    UnknownField(String),

    #[error("field '{0}' is optional; use `maybe` to read it")]
    NotRequired(String),

    #[error("field '{0}' is required; use `get` to read it")]
    NotOptional(String),
}

/// The read-only result of a [`FixedMapping`](crate::FixedMapping) parse.
///
/// # Example
///
/// ```rust
/// use reqshape::{Argument, Parser, Shape};
/// use serde_json::json;
///
/// let user = Shape::fixed(vec![
///     Argument::required("name", Shape::string()),
///     Argument::optional("nickname", Shape::nullable(Shape::string())),
/// ])
/// .unwrap();
///
/// let record = user.try_parse(&json!({"name": "Ada", "nickname": null})).unwrap();
/// assert_eq!(record.get("name").unwrap().as_str(), Some("Ada"));
/// // Present but null is not the same as absent.
/// assert!(record.maybe("nickname").unwrap().unwrap().is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.insert(key.into(), value);
    }

    /// Returns a required field or tag.
    pub fn get(&self, key: &str) -> Result<&Parsed, RecordError> {
        match self.field(key)? {
            FieldValue::Required(value) => Ok(value),
            FieldValue::Optional(_) => Err(RecordError::NotRequired(key.to_string())),
        }
    }

    /// Returns an optional field's presence indicator.
    pub fn maybe(&self, key: &str) -> Result<Option<&Parsed>, RecordError> {
        match self.field(key)? {
            FieldValue::Optional(value) => Ok(value.as_ref()),
            FieldValue::Required(_) => Err(RecordError::NotOptional(key.to_string())),
        }
    }

    /// Returns an optional field's value, or `default` when it was absent.
    pub fn maybe_or(&self, key: &str, default: Parsed) -> Result<Parsed, RecordError> {
        Ok(self.maybe(key)?.cloned().unwrap_or(default))
    }

    /// Returns the raw field entry.
    pub fn field(&self, key: &str) -> Result<&FieldValue, RecordError> {
        self.fields
            .get(key)
            .ok_or_else(|| RecordError::UnknownField(key.to_string()))
    }

    /// Returns true if the record declares `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Iterates over field names in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Renders present fields as a JSON object.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        for (key, field) in &self.fields {
            match field {
                FieldValue::Required(value) | FieldValue::Optional(Some(value)) => {
                    object.insert(key.clone(), value.to_json());
                }
                FieldValue::Optional(None) => {}
            }
        }
        Value::Object(object)
    }
}
