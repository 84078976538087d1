//! Integration tests for the rich value parsers.

use chrono::{TimeDelta, TimeZone, Utc};
use reqshape::{ByteSize, ErrorCode, Parsed, Parser, RichValue, Shape};
use serde_json::json;

#[test]
fn test_timedelta() {
    let parser = RichValue::timedelta();
    assert_eq!(parser.try_parse(&json!("PT15M")).unwrap(), TimeDelta::minutes(15));
    assert_eq!(parser.try_parse(&json!("-PT15M")).unwrap(), -TimeDelta::minutes(15));
    assert_eq!(
        parser.try_parse(&json!("P15DT01S")).unwrap(),
        TimeDelta::days(15) + TimeDelta::seconds(1)
    );
    assert_eq!(parser.try_parse(&json!(1.5)).unwrap(), TimeDelta::milliseconds(1500));

    let error = parser.try_parse(&json!("PINVALID")).unwrap_err();
    assert!(error.to_string().contains("Union[str, float]"));
}

#[test]
fn test_file_size() {
    let parser = RichValue::file_size();
    assert_eq!(parser.try_parse(&json!("5kb")).unwrap(), ByteSize(5 * 1024));
    assert!(parser.try_parse(&json!("5tb")).is_err());
}

#[test]
fn test_password_never_echoed() {
    let parser = Shape::list(RichValue::password());
    let parsed = parser.try_parse(&json!(["s3cret"])).unwrap();
    assert_eq!(parsed[0].expose(), "s3cret");
    assert_eq!(Parsed::from(parsed).to_json(), json!(["REDACTED"]));

    let error = parser.try_parse(&json!(["ok", 31337])).unwrap_err();
    let payload = error.to_json().to_string();
    assert!(!payload.contains("31337"));
    assert!(payload.contains("REDACTED"));
}

#[test]
fn test_uuid() {
    let parser = RichValue::uuid();
    let parsed = parser
        .try_parse(&json!("a8098c1a-f86e-11da-bd1a-00112444be1e"))
        .unwrap();
    assert_eq!(parsed.to_string(), "a8098c1a-f86e-11da-bd1a-00112444be1e");

    let error = parser.try_parse(&json!("a8098c1a")).unwrap_err();
    assert_eq!(
        error.to_string(),
        "a str is required, but got \"a8098c1a\", which can't be parsed as a valid uuid"
    );
}

#[test]
fn test_datetime() {
    let parser = RichValue::datetime();
    assert_eq!(
        parser.try_parse(&json!("2020-01-02T03:04:05+01:00")).unwrap(),
        Utc.with_ymd_and_hms(2020, 1, 2, 2, 4, 5).unwrap()
    );
    assert!(parser.try_parse(&json!("now")).is_err());
}

#[test]
fn test_email_list() {
    let parser = RichValue::email_list();
    let parsed = parser
        .try_parse(&json!("ada@example.com; Grace <grace@example.com>"))
        .unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[1].name.as_deref(), Some("Grace"));

    let error = parser.try_parse(&json!("ada@example.com; nope")).unwrap_err();
    assert_eq!(error.iter().next().unwrap().code, ErrorCode::InvalidFormat);
}

#[test]
fn test_gte() {
    let parser = RichValue::gte(Shape::integer(), 5);
    assert_eq!(parser.try_parse(&json!(5)).unwrap(), 5);

    let error = parser.try_parse(&json!(4)).unwrap_err();
    let first = error.iter().next().unwrap();
    assert_eq!(first.code, ErrorCode::OutOfRange);
    assert!(first.message().contains("minimum 5"));
}

#[test]
fn test_gte_on_durations() {
    let parser = RichValue::gte(RichValue::timedelta(), TimeDelta::zero());
    assert!(parser.try_parse(&json!("PT1S")).is_ok());
    assert!(parser.try_parse(&json!("-PT1S")).is_err());
}

#[test]
fn test_rich_values_inside_lists_locate_errors() {
    let parser = Shape::list(RichValue::uuid());
    let error = parser
        .try_parse(&json!(["a8098c1a-f86e-11da-bd1a-00112444be1e", "x"]))
        .unwrap_err();
    assert_eq!(error.iter().next().unwrap().location.to_string(), "1");
}
