//! Integration tests for OpenAPI schema export.

use reqshape::interop::add_description;
use reqshape::{Argument, FixedMapping, Parser, RichValue, SchemaContext, Shape};
use serde_json::json;

fn comment() -> FixedMapping {
    Shape::fixed(vec![
        Argument::required("text", Shape::string()),
        Argument::optional("replies", Shape::list(Shape::lazy(comment))),
    ])
    .unwrap()
    .named("Comment")
}

#[test]
fn test_recursive_schema_terminates() {
    let mut ctx = SchemaContext::new();
    let fragment = comment().to_open_api(&mut ctx);

    assert_eq!(fragment, json!({"$ref": "#/components/schemas/Comment"}));
    assert_eq!(
        ctx.get("Comment").unwrap(),
        &json!({
            "type": "object",
            "properties": {
                "text": {"type": "string"},
                "replies": {
                    "type": "array",
                    "items": {"$ref": "#/components/schemas/Comment"},
                },
            },
            "required": ["text"],
        })
    );
    assert!(!ctx.is_placeholder("Comment"));
}

#[test]
fn test_recursive_parse() {
    let thread = json!({
        "text": "root",
        "replies": [{"text": "child", "replies": [{"text": 5}]}],
    });
    let error = comment().try_parse(&thread).unwrap_err();
    assert_eq!(
        error.iter().next().unwrap().location.to_string(),
        "replies[0].replies[0].text"
    );
}

#[test]
fn test_mutual_recursion() {
    fn folder() -> FixedMapping {
        Shape::fixed(vec![
            Argument::required("name", Shape::string()),
            Argument::required("files", Shape::list(Shape::lazy(file))),
        ])
        .unwrap()
        .named("Folder")
    }

    fn file() -> FixedMapping {
        Shape::fixed(vec![
            Argument::required("name", Shape::string()),
            Argument::optional("parent", Shape::lazy(folder)),
        ])
        .unwrap()
        .named("File")
    }

    let mut ctx = SchemaContext::new();
    folder().to_open_api(&mut ctx);

    let names: Vec<_> = ctx.components().keys().cloned().collect();
    assert_eq!(names, vec!["Folder", "File"]);
    assert_eq!(
        ctx.get("File").unwrap()["properties"]["parent"],
        json!({"$ref": "#/components/schemas/Folder"})
    );
}

#[test]
fn test_argument_docs() {
    let address = Shape::fixed(vec![Argument::required("city", Shape::string())])
        .unwrap()
        .named("Address");
    let person = Shape::fixed(vec![
        Argument::required("age", Shape::integer()).doc("Age in years"),
        Argument::optional("address", address).doc("Postal address"),
    ])
    .unwrap()
    .description("A person");

    let schema = person.to_open_api(&mut SchemaContext::new());
    assert_eq!(
        schema,
        json!({
            "type": "object",
            "properties": {
                "age": {"type": "integer", "description": "Age in years"},
                "address": {
                    "allOf": [{"$ref": "#/components/schemas/Address"}],
                    "description": "Postal address",
                },
            },
            "required": ["age"],
            "description": "A person",
        })
    );
}

#[test]
fn test_nullable_reference() {
    let node = Shape::fixed(vec![]).unwrap().named("Node");
    let schema = Shape::nullable(node).to_open_api(&mut SchemaContext::new());
    assert_eq!(
        schema,
        json!({"allOf": [{"$ref": "#/components/schemas/Node"}], "nullable": true})
    );
}

#[test]
fn test_rich_fragments() {
    let mut ctx = SchemaContext::new();
    assert_eq!(
        RichValue::uuid().to_open_api(&mut ctx),
        json!({"type": "string", "format": "uuid"})
    );
    assert_eq!(
        RichValue::datetime().to_open_api(&mut ctx),
        json!({"type": "string", "format": "date-time"})
    );
    assert_eq!(
        RichValue::password().to_open_api(&mut ctx),
        json!({"type": "string", "format": "password"})
    );
    assert_eq!(
        RichValue::gte(Shape::integer(), 1).to_open_api(&mut ctx),
        json!({"type": "integer", "minimum": 1})
    );
    assert_eq!(
        RichValue::timedelta().to_open_api(&mut ctx)["anyOf"][1],
        json!({"type": "number"})
    );
}

#[test]
fn test_lookup_and_union_fragments() {
    let parser = Shape::lookup(Shape::string() | Shape::integer());
    assert_eq!(
        parser.to_open_api(&mut SchemaContext::new()),
        json!({
            "type": "object",
            "additionalProperties": {"anyOf": [{"type": "string"}, {"type": "integer"}]},
        })
    );
}

#[test]
fn test_add_description_helper() {
    assert_eq!(
        add_description(json!({"type": "boolean"}), "flag"),
        json!({"type": "boolean", "description": "flag"})
    );
}
