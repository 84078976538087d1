//! Closed record parser.
//!
//! This module provides [`FixedMapping`], built from [`Argument`]
//! declarations. Every declared key is checked on every parse and all field
//! errors are reported together. Undeclared input keys are ignored.

use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{DefinitionError, ErrorCode, ParseError, SimpleParseError};
use crate::interop::{add_description, SchemaContext};
use crate::location::Segment;
use crate::value::{FieldValue, Parsed, Record};

use super::traits::{shared, Parser, SharedParser};

/// One declared field of a [`FixedMapping`].
#[derive(Clone)]
pub struct Argument {
    key: String,
    parser: SharedParser,
    required: bool,
    doc: Option<String>,
}

impl Argument {
    /// Declares a field that must be present.
    pub fn required<P: Parser + 'static>(key: impl Into<String>, parser: P) -> Self {
        Self {
            key: key.into(),
            parser: shared(parser),
            required: true,
            doc: None,
        }
    }

    /// Declares a field that may be absent.
    ///
    /// The parsed record reports it through [`Record::maybe`].
    pub fn optional<P: Parser + 'static>(key: impl Into<String>, parser: P) -> Self {
        Self {
            key: key.into(),
            parser: shared(parser),
            required: false,
            doc: None,
        }
    }

    /// Sets the field documentation, exported as the property description.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    fn describe(&self) -> String {
        let marker = if self.required { "" } else { "?" };
        format!("{}{}: {}", self.key, marker, self.parser.name())
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// A parser for objects with a fixed set of named fields.
///
/// # Example
///
/// ```rust
/// use reqshape::{Argument, Parser, Shape};
/// use serde_json::json;
///
/// let schema = Shape::fixed(vec![
///     Argument::required("a", Shape::integer()),
///     Argument::required("b", Shape::string()),
///     Argument::optional("c", Shape::boolean()),
/// ])
/// .unwrap();
///
/// let error = schema.try_parse(&json!({"a": 5, "c": true})).unwrap_err();
/// assert!(error
///     .to_string()
///     .contains("at index \"b\" a str is required, but got Nothing"));
/// ```
#[derive(Clone)]
pub struct FixedMapping {
    arguments: IndexMap<String, Argument>,
    tags: IndexMap<String, Parsed>,
    name: Option<String>,
    description: Option<String>,
}

impl FixedMapping {
    /// Creates a record parser, rejecting duplicate keys.
    pub fn new(arguments: Vec<Argument>) -> Result<Self, DefinitionError> {
        let mut declared = IndexMap::with_capacity(arguments.len());
        for argument in arguments {
            if declared.contains_key(&argument.key) {
                return Err(DefinitionError::DuplicateKey(argument.key));
            }
            declared.insert(argument.key.clone(), argument);
        }
        Ok(Self {
            arguments: declared,
            tags: IndexMap::new(),
            name: None,
            description: None,
        })
    }

    /// Registers the schema under `name` when exported.
    ///
    /// Named records export as a `$ref`; this is required for records that
    /// contain themselves.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the description of the exported object schema.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns a record with the fields of both, failing if any key overlaps.
    ///
    /// The result is unnamed.
    pub fn combine(&self, other: &FixedMapping) -> Result<FixedMapping, DefinitionError> {
        for key in other.arguments.keys().chain(other.tags.keys()) {
            if self.arguments.contains_key(key) || self.tags.contains_key(key) {
                return Err(DefinitionError::OverlappingKey(key.clone()));
            }
        }

        let mut arguments = self.arguments.clone();
        arguments.extend(other.arguments.clone());
        let mut tags = self.tags.clone();
        tags.extend(other.tags.clone());

        Ok(FixedMapping {
            arguments,
            tags,
            name: None,
            description: None,
        })
    }

    /// Returns a record that always carries `key: value`.
    ///
    /// The tag is never read from input, overrides a same-named input key,
    /// and is left out of the exported schema. The result is unnamed.
    pub fn add_tag(
        &self,
        key: impl Into<String>,
        value: impl Into<Parsed>,
    ) -> Result<FixedMapping, DefinitionError> {
        let key = key.into();
        if self.arguments.contains_key(&key) {
            return Err(DefinitionError::TagConflict(key));
        }

        let mut tagged = self.clone();
        tagged.tags.insert(key, value.into());
        tagged.name = None;
        Ok(tagged)
    }

    /// Returns the registered schema name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the declared arguments in declaration order.
    pub fn arguments(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.values()
    }

    /// Returns the tag keys.
    pub fn tag_keys(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    fn object_schema(&self, ctx: &mut SchemaContext) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for (key, argument) in &self.arguments {
            let mut fragment = argument.parser.open_api(ctx);
            if let Some(doc) = &argument.doc {
                fragment = add_description(fragment, doc);
            }
            properties.insert(key.clone(), fragment);
            if argument.required {
                required.push(Value::String(key.clone()));
            }
        }

        let mut schema = Map::new();
        schema.insert("type".to_string(), Value::String("object".to_string()));
        schema.insert("properties".to_string(), Value::Object(properties));
        // OpenAPI 3.0 forbids an empty `required` array.
        if !required.is_empty() {
            schema.insert("required".to_string(), Value::Array(required));
        }
        if let Some(description) = &self.description {
            schema.insert(
                "description".to_string(),
                Value::String(description.clone()),
            );
        }
        Value::Object(schema)
    }
}

impl Parser for FixedMapping {
    type Output = Record;

    fn try_parse(&self, raw: &Value) -> Result<Record, ParseError> {
        let object = raw.as_object().ok_or_else(|| {
            SimpleParseError::new(self.describe(), raw).with_code(ErrorCode::InvalidShape)
        })?;

        let mut errors = Vec::new();
        let mut record = Record::new();

        for (key, argument) in &self.arguments {
            match object.get(key) {
                Some(value) => match argument.parser.parse_dynamic(value) {
                    Ok(parsed) if argument.required => {
                        record.insert(key.as_str(), FieldValue::Required(parsed));
                    }
                    Ok(parsed) => {
                        record.insert(key.as_str(), FieldValue::Optional(Some(parsed)));
                    }
                    Err(e) => errors.extend(e.add_location(Segment::key(key.as_str()))),
                },
                None if argument.required => {
                    errors.push(
                        SimpleParseError::missing(argument.parser.name())
                            .add_location(Segment::key(key.as_str())),
                    );
                }
                None => record.insert(key.as_str(), FieldValue::Optional(None)),
            }
        }

        ParseError::collected(errors)?;

        for (key, value) in &self.tags {
            record.insert(key.as_str(), FieldValue::Required(value.clone()));
        }
        Ok(record)
    }

    fn to_open_api(&self, ctx: &mut SchemaContext) -> Value {
        match &self.name {
            Some(name) => ctx.define(name, |ctx| self.object_schema(ctx)),
            None => self.object_schema(ctx),
        }
    }

    fn describe(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        let fields: Vec<String> = self.arguments.values().map(Argument::describe).collect();
        format!("FixedMapping[{}]", fields.join(", "))
    }
}

impl fmt::Debug for FixedMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedMapping")
            .field("name", &self.name)
            .field("arguments", &self.arguments.values().collect::<Vec<_>>())
            .field("tags", &self.tags)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::list::List;
    use crate::parser::nullable::Nullable;
    use crate::parser::simple::SimpleValue;
    use serde_json::json;

    fn abc() -> FixedMapping {
        FixedMapping::new(vec![
            Argument::required("a", SimpleValue::integer()),
            Argument::required("b", SimpleValue::string()),
            Argument::optional("c", SimpleValue::boolean()),
        ])
        .unwrap()
    }

    #[test]
    fn test_parses_required_and_optional() {
        let record = abc().try_parse(&json!({"a": 1, "b": "x", "c": false})).unwrap();
        assert_eq!(record.get("a").unwrap(), &Parsed::Int(1));
        assert_eq!(record.get("b").unwrap().as_str(), Some("x"));
        assert_eq!(record.maybe("c").unwrap(), Some(&Parsed::Bool(false)));
    }

    #[test]
    fn test_absent_optional_is_nothing() {
        let record = abc().try_parse(&json!({"a": 1, "b": "x"})).unwrap();
        assert_eq!(record.maybe("c").unwrap(), None);
        assert_eq!(record.maybe_or("c", Parsed::Bool(true)).unwrap(), Parsed::Bool(true));
    }

    #[test]
    fn test_explicit_null_differs_from_absent() {
        let parser = FixedMapping::new(vec![Argument::optional(
            "n",
            Nullable::new(SimpleValue::integer()),
        )])
        .unwrap();
        let present = parser.try_parse(&json!({"n": null})).unwrap();
        let absent = parser.try_parse(&json!({})).unwrap();
        assert_eq!(present.maybe("n").unwrap(), Some(&Parsed::Null));
        assert_eq!(absent.maybe("n").unwrap(), None);
    }

    #[test]
    fn test_missing_required_message() {
        let error = abc().try_parse(&json!({"a": 5, "c": true})).unwrap_err();
        assert!(error.is_multiple());
        assert!(error
            .to_string()
            .contains("at index \"b\" a str is required, but got Nothing"));
    }

    #[test]
    fn test_collects_every_field_error_in_declaration_order() {
        let error = abc().try_parse(&json!({"a": "x", "c": 1})).unwrap_err();
        let paths: Vec<_> = error.iter().map(|e| e.location.to_string()).collect();
        assert_eq!(paths, vec!["a", "b", "c"]);
        assert_eq!(error.with_code(ErrorCode::Missing).len(), 1);
    }

    #[test]
    fn test_extra_keys_ignored() {
        let record = abc().try_parse(&json!({"a": 1, "b": "x", "zzz": []})).unwrap();
        assert!(!record.contains("zzz"));
    }

    #[test]
    fn test_non_object_fails_immediately() {
        let error = abc().try_parse(&json!([1])).unwrap_err();
        assert!(!error.is_multiple());
        assert_eq!(error.iter().next().unwrap().code, ErrorCode::InvalidShape);
    }

    #[test]
    fn test_duplicate_keys_rejected_at_construction() {
        let result = FixedMapping::new(vec![
            Argument::required("a", SimpleValue::integer()),
            Argument::optional("a", SimpleValue::string()),
        ]);
        assert_eq!(result.unwrap_err(), DefinitionError::DuplicateKey("a".to_string()));
    }

    #[test]
    fn test_combine_merges_fields() {
        let left = FixedMapping::new(vec![Argument::required("a", SimpleValue::integer())]).unwrap();
        let right = FixedMapping::new(vec![Argument::optional("b", SimpleValue::string())]).unwrap();
        let both = left.combine(&right).unwrap();
        let record = both.try_parse(&json!({"a": 1})).unwrap();
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_combine_overlap_fails() {
        let left = FixedMapping::new(vec![Argument::required("a", SimpleValue::integer())]).unwrap();
        let right = FixedMapping::new(vec![Argument::required("a", SimpleValue::string())]).unwrap();
        assert_eq!(
            left.combine(&right).unwrap_err(),
            DefinitionError::OverlappingKey("a".to_string())
        );
    }

    #[test]
    fn test_tag_overrides_input() {
        let tagged = abc().add_tag("tag", "v").unwrap();
        let record = tagged
            .try_parse(&json!({"a": 1, "b": "x", "tag": "ignored"}))
            .unwrap();
        assert_eq!(record.get("tag").unwrap().as_str(), Some("v"));
    }

    #[test]
    fn test_tag_on_declared_key_fails() {
        assert_eq!(
            abc().add_tag("a", 1i64).unwrap_err(),
            DefinitionError::TagConflict("a".to_string())
        );
    }

    #[test]
    fn test_tag_hidden_from_schema() {
        let tagged = abc().add_tag("tag", "v").unwrap();
        let mut ctx = SchemaContext::new();
        let schema = tagged.to_open_api(&mut ctx);
        assert!(schema["properties"].get("tag").is_none());
        assert_eq!(schema["required"], json!(["a", "b"]));
    }

    #[test]
    fn test_nested_error_locations() {
        let inner = FixedMapping::new(vec![Argument::required(
            "b",
            List::new(SimpleValue::integer()),
        )])
        .unwrap();
        let outer = List::new(inner);
        let error = outer
            .try_parse(&json!([{"b": []}, {"b": []}, {"b": []}, {"b": []}, {"b": [0, 1, 2, 3, 4, "x"]}]))
            .unwrap_err();
        assert_eq!(error.len(), 1);
        assert_eq!(error.iter().next().unwrap().location.to_string(), "4.b[5]");
    }

    #[test]
    fn test_named_schema_exports_reference() {
        let mut ctx = SchemaContext::new();
        let schema = abc().named("Abc").to_open_api(&mut ctx);
        assert_eq!(schema, json!({"$ref": "#/components/schemas/Abc"}));
        assert_eq!(ctx.get("Abc").unwrap()["type"], "object");
    }

    #[test]
    fn test_argument_doc_becomes_description() {
        let parser = FixedMapping::new(vec![
            Argument::required("a", SimpleValue::integer()).doc("the a")
        ])
        .unwrap();
        let mut ctx = SchemaContext::new();
        let schema = parser.to_open_api(&mut ctx);
        assert_eq!(
            schema["properties"]["a"],
            json!({"type": "integer", "description": "the a"})
        );
    }

    #[test]
    fn test_describe() {
        assert_eq!(abc().describe(), "FixedMapping[a: int, b: str, c?: bool]");
        assert_eq!(abc().named("Abc").describe(), "Abc");
    }
}
