//! Integration tests for unions.

use reqshape::{shared, Parsed, Parser, ParserExt, Shape};
use serde_json::json;

#[test]
fn test_string_or_int() {
    let parser = Shape::string() | Shape::integer();

    assert_eq!(parser.try_parse(&json!(5)).unwrap(), Parsed::Int(5));
    assert_eq!(parser.try_parse(&json!("5")).unwrap(), Parsed::Str("5".to_string()));

    let error = parser.try_parse(&json!(true)).unwrap_err();
    assert!(!error.is_multiple());
    assert!(error.to_string().contains("Union[str, int]"));
}

#[test]
fn test_string_or_float_widens_int() {
    let parser = Shape::string() | Shape::float();
    assert_eq!(parser.try_parse(&json!(5)).unwrap(), Parsed::Float(5.0));
}

#[test]
fn test_flattening_is_associative() {
    let a = (Shape::string() | Shape::integer()) | Shape::boolean();
    let b = Shape::string() | (Shape::integer() | Shape::boolean());
    let c = Shape::union(vec![
        shared(Shape::string()),
        shared(Shape::integer()),
        shared(Shape::boolean()),
    ]);

    for raw in [json!("s"), json!(1), json!(true), json!(1.5), json!(null)] {
        assert_eq!(a.try_parse(&raw).is_ok(), b.try_parse(&raw).is_ok());
        assert_eq!(a.try_parse(&raw).is_ok(), c.try_parse(&raw).is_ok());
    }
    assert_eq!(a.describe(), c.describe());
}

#[test]
fn test_generic_union_first_success_wins() {
    let parser = Shape::list(Shape::integer()).or(Shape::lookup(Shape::integer()));

    assert_eq!(
        parser.try_parse(&json!([1])).unwrap(),
        Parsed::List(vec![Parsed::Int(1)])
    );
    assert!(matches!(
        parser.try_parse(&json!({"a": 1})).unwrap(),
        Parsed::Map(_)
    ));
    assert!(parser.try_parse(&json!("neither")).is_err());
}

#[test]
fn test_or_on_nullable() {
    let parser = Shape::nullable(Shape::integer()).or(Shape::string());
    assert_eq!(parser.try_parse(&json!(null)).unwrap(), Parsed::Null);
    assert_eq!(parser.try_parse(&json!("x")).unwrap(), Parsed::Str("x".to_string()));
}
