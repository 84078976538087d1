//! Semantic parsers layered on the primitives.
//!
//! Each rich parser first requires the right primitive type, then checks and
//! converts its content: passwords are redacted in errors, UUIDs, ISO 8601
//! timestamps and durations, file sizes, address lists, and lower bounds.

mod datetime;
mod duration;
mod email;
mod file_size;
mod gte;
mod identifier;
mod password;

pub use datetime::DateTimeValue;
pub use duration::TimeDeltaValue;
pub use email::{EmailAddress, EmailListValue};
pub use file_size::{ByteSize, FileSizeValue};
pub use gte::ValueGte;
pub use identifier::UuidValue;
pub use password::{Password, PasswordValue};

use super::traits::Parser;

/// Factory for the rich parsers.
///
/// # Example
///
/// ```rust
/// use reqshape::{Parser, RichValue};
/// use serde_json::json;
///
/// let size = RichValue::file_size().try_parse(&json!("5kb")).unwrap();
/// assert_eq!(size.bytes(), 5 * 1024);
/// ```
pub struct RichValue;

impl RichValue {
    /// A string whose value never appears in error messages.
    pub fn password() -> PasswordValue {
        PasswordValue
    }

    /// A UUID in hyphenated or 32-hex-digit form.
    pub fn uuid() -> UuidValue {
        UuidValue
    }

    /// An ISO 8601 timestamp, normalized to UTC.
    pub fn datetime() -> DateTimeValue {
        DateTimeValue
    }

    /// Seconds as a number, or an ISO 8601 duration string.
    pub fn timedelta() -> TimeDeltaValue {
        TimeDeltaValue
    }

    /// A size such as `512b`, `10kb`, `3mb` or `1gb` (1024-based).
    pub fn file_size() -> FileSizeValue {
        FileSizeValue
    }

    /// One or more addresses separated by `,` or `;`.
    pub fn email_list() -> EmailListValue {
        EmailListValue
    }

    /// `inner`, additionally requiring the parsed value to be at least `minimum`.
    pub fn gte<P>(inner: P, minimum: P::Output) -> ValueGte<P>
    where
        P: Parser,
    {
        ValueGte::new(inner, minimum)
    }
}
