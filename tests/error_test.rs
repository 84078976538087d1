//! Integration tests for error rendering and composition.

use reqshape::{
    Argument, ErrorCode, FixedMapping, Got, ParseError, Parser, Segment, Shape, SimpleParseError,
};
use serde_json::json;
use stillwater::prelude::*;

fn abc() -> FixedMapping {
    Shape::fixed(vec![
        Argument::required("a", Shape::integer()),
        Argument::required("b", Shape::string()),
        Argument::optional("c", Shape::boolean()),
    ])
    .unwrap()
}

#[test]
fn test_to_json_payload() {
    let error = abc().try_parse(&json!({"a": "x", "c": true})).unwrap_err();
    assert_eq!(
        error.to_json(),
        json!({
            "errors": [
                {
                    "location": ["a"],
                    "path": "a",
                    "code": "invalid_type",
                    "message": "an int is required, but got \"x\", which is of type str",
                },
                {
                    "location": ["b"],
                    "path": "b",
                    "code": "missing",
                    "message": "a str is required, but got Nothing",
                },
            ]
        })
    );
}

#[test]
fn test_multiple_display_lists_every_error() {
    let error = abc().try_parse(&json!({})).unwrap_err();
    let rendered = error.to_string();
    assert!(rendered.starts_with("Parsing failed with 2 error(s):"));
    assert!(rendered.contains("1. at index \"a\""));
    assert!(rendered.contains("2. at index \"b\""));
}

#[test]
fn test_add_location_prepends() {
    let error = SimpleParseError::new("int", &json!("x"))
        .add_location(Segment::index(5))
        .add_location(Segment::key("b"))
        .add_location(Segment::index(4));
    assert_eq!(error.location.to_string(), "4.b[5]");
    assert_eq!(error.location.to_json(), json!([4, "b", 5]));
}

#[test]
fn test_missing_has_no_type_tail() {
    let error = SimpleParseError::missing("str");
    assert_eq!(error.got, Got::Nothing);
    assert_eq!(error.to_string(), "a str is required, but got Nothing");
}

#[test]
fn test_semigroup_combines_and_flattens() {
    let first = Shape::integer().try_parse(&json!("x")).unwrap_err();
    let second = abc().try_parse(&json!({})).unwrap_err();

    let combined = first.combine(second);
    assert!(combined.is_multiple());
    assert_eq!(combined.len(), 3);
}

#[test]
fn test_validate_accumulates_independent_parses() {
    let name = Shape::string().validate(&json!(1));
    let age = Shape::integer().validate(&json!("x"));

    let errors = name.and(age).into_result().unwrap_err();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.with_code(ErrorCode::InvalidType).len(), 2);
}

#[test]
fn test_into_iter_yields_leaves() {
    let error = abc().try_parse(&json!({"a": 1})).unwrap_err();
    let leaves: Vec<SimpleParseError> = error.into_iter().collect();
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].code, ErrorCode::Missing);
}

#[test]
fn test_is_std_error() {
    fn boxed(error: ParseError) -> Box<dyn std::error::Error + Send + Sync> {
        Box::new(error)
    }
    let error = boxed(Shape::boolean().try_parse(&json!(1)).unwrap_err());
    assert!(error.to_string().contains("bool"));
}
