//! Schema context and fragment helpers.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};

/// Default location of named schemas inside an OpenAPI document.
pub const DEFAULT_REF_PREFIX: &str = "#/components/schemas/";

const PLACEHOLDER_KEY: &str = "x-reqshape-placeholder";

/// How many lazy parsers may nest outside any named schema before export
/// stops expanding them. Only an unnamed recursive record gets this deep.
pub const MAX_UNNAMED_LAZY_DEPTH: usize = 4;

/// Named schema fragments collected during one documentation pass.
///
/// The context is threaded through every `to_open_api` call. Named schemas
/// go through [`define`](Self::define), which registers a placeholder before
/// building the body so that a schema referring to itself gets a `$ref`
/// instead of recursing forever.
///
/// # Example
///
/// ```rust
/// use reqshape::SchemaContext;
/// use serde_json::json;
///
/// let mut ctx = SchemaContext::new();
/// let reference = ctx.define("Node", |ctx| {
///     // A self reference while "Node" is still being built.
///     let child = ctx.define("Node", |_| unreachable!());
///     json!({"type": "object", "properties": {"child": child}})
/// });
///
/// assert_eq!(reference, json!({"$ref": "#/components/schemas/Node"}));
/// assert_eq!(
///     ctx.get("Node").unwrap()["properties"]["child"],
///     json!({"$ref": "#/components/schemas/Node"})
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SchemaContext {
    components: IndexMap<String, Value>,
    ref_prefix: String,
    lazy_depth: usize,
}

impl SchemaContext {
    /// Creates an empty context using `#/components/schemas/` references.
    pub fn new() -> Self {
        Self {
            components: IndexMap::new(),
            ref_prefix: DEFAULT_REF_PREFIX.to_string(),
            lazy_depth: 0,
        }
    }

    /// Sets the prefix used when building `$ref` strings.
    pub fn with_ref_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.ref_prefix = prefix.into();
        self
    }

    /// Returns a `$ref` fragment pointing at `name`.
    pub fn reference(&self, name: &str) -> Value {
        json!({ "$ref": format!("{}{}", self.ref_prefix, name) })
    }

    /// Registers the schema `name`, building it with `build` the first time.
    ///
    /// Returns a `$ref` to the schema. If `name` is already known (finished
    /// or still being built) `build` is not called.
    pub fn define<F>(&mut self, name: &str, build: F) -> Value
    where
        F: FnOnce(&mut SchemaContext) -> Value,
    {
        if self.components.contains_key(name) {
            return self.reference(name);
        }

        tracing::debug!(schema = name, "registering schema placeholder");
        self.components
            .insert(name.to_string(), json!({ PLACEHOLDER_KEY: true }));

        let outer_depth = std::mem::take(&mut self.lazy_depth);
        let body = build(self);
        self.lazy_depth = outer_depth;
        self.components.insert(name.to_string(), body);
        tracing::debug!(schema = name, "schema backfilled");

        self.reference(name)
    }

    /// Enters a lazy parser, returning false once the unnamed nesting limit
    /// is reached. A successful call must be paired with `leave_lazy`.
    pub(crate) fn enter_lazy(&mut self) -> bool {
        if self.lazy_depth >= MAX_UNNAMED_LAZY_DEPTH {
            return false;
        }
        self.lazy_depth += 1;
        true
    }

    pub(crate) fn leave_lazy(&mut self) {
        self.lazy_depth = self.lazy_depth.saturating_sub(1);
    }

    /// Returns true if `name` is registered but its body is not built yet.
    pub fn is_placeholder(&self, name: &str) -> bool {
        self.components
            .get(name)
            .and_then(|schema| schema.get(PLACEHOLDER_KEY))
            .is_some()
    }

    /// Returns a registered schema body.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.components.get(name)
    }

    /// Returns all registered schemas in registration order.
    pub fn components(&self) -> &IndexMap<String, Value> {
        &self.components
    }

    /// Consumes the context, returning the registered schemas.
    pub fn into_components(self) -> IndexMap<String, Value> {
        self.components
    }

    /// Returns `{"components": {"schemas": {...}}}`.
    pub fn to_document(&self) -> Value {
        let schemas: Map<String, Value> = self
            .components
            .iter()
            .map(|(name, schema)| (name.clone(), schema.clone()))
            .collect();
        json!({ "components": { "schemas": schemas } })
    }
}

impl Default for SchemaContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Attaches a description to a fragment.
///
/// OpenAPI ignores siblings of `$ref`, so references are wrapped in `allOf`.
pub fn add_description(fragment: Value, description: &str) -> Value {
    wrap_or_insert(fragment, "description", Value::String(description.to_string()))
}

/// Marks a fragment as accepting `null`, wrapping references in `allOf`.
pub fn make_nullable(fragment: Value) -> Value {
    wrap_or_insert(fragment, "nullable", Value::Bool(true))
}

fn wrap_or_insert(fragment: Value, key: &str, value: Value) -> Value {
    match fragment {
        Value::Object(object) if object.contains_key("$ref") => {
            let mut wrapper = Map::new();
            wrapper.insert("allOf".to_string(), json!([Value::Object(object)]));
            wrapper.insert(key.to_string(), value);
            Value::Object(wrapper)
        }
        Value::Object(mut object) => {
            object.insert(key.to_string(), value);
            Value::Object(object)
        }
        other => other,
    }
}
