//! Registry of named parsers.
//!
//! This module provides the [`SchemaRegistry`] type that stores the parsers
//! an application declares at startup under stable names, parses payloads by
//! name and exports every registered shape as one components document.

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;

use crate::error::ParseError;
use crate::interop::SchemaContext;
use crate::parser::{shared, Parser, SharedParser};
use crate::value::Parsed;
use stillwater::Validation;

/// Type alias for the parser storage map.
type ParserMap = Arc<RwLock<IndexMap<String, SharedParser>>>;

/// A thread-safe registry of named parsers.
///
/// Registration happens while routes are declared; afterwards the registry is
/// only read, from any number of request threads.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>` for thread-safe access:
/// - Multiple threads can parse concurrently (read-only access)
/// - Registration operations are serialized (write access)
///
/// Clones share the same storage.
///
/// # Example
///
/// ```rust
/// use reqshape::{Argument, SchemaRegistry, Shape};
/// use serde_json::json;
///
/// let registry = SchemaRegistry::new();
/// registry
///     .register(
///         "User",
///         Shape::fixed(vec![Argument::required("name", Shape::string())]).unwrap(),
///     )
///     .unwrap();
///
/// let result = registry.parse("User", &json!({"name": "ada"})).unwrap();
/// assert!(result.is_success());
///
/// let document = registry.to_open_api();
/// assert_eq!(
///     document["components"]["schemas"]["User"]["required"],
///     json!(["name"])
/// );
/// ```
pub struct SchemaRegistry {
    parsers: ParserMap,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            parsers: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Registers a parser under `name`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateName` if the name is already registered.
    pub fn register<P>(&self, name: impl Into<String>, parser: P) -> Result<(), RegistryError>
    where
        P: Parser + 'static,
    {
        let name = name.into();
        let mut parsers = self.parsers.write();

        if parsers.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        tracing::debug!(name = %name, shape = %parser.describe(), "registered parser");
        parsers.insert(name, shared(parser));
        Ok(())
    }

    /// Retrieves a parser by name.
    pub fn get(&self, name: &str) -> Option<SharedParser> {
        self.parsers.read().get(name).cloned()
    }

    /// Returns true if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.parsers.read().contains_key(name)
    }

    /// Returns the registered names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.parsers.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.parsers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.read().is_empty()
    }

    /// Parses `raw` with the parser registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if the name doesn't exist. Parse
    /// failures are reported inside the returned `Validation`.
    pub fn parse(
        &self,
        name: &str,
        raw: &Value,
    ) -> Result<Validation<Parsed, ParseError>, RegistryError> {
        let parser = self
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;

        let result = parser.validate(raw);
        if let Validation::Failure(errors) = &result {
            tracing::trace!(name = %name, errors = errors.len(), "payload rejected");
        }
        Ok(result)
    }

    /// Exports every registered parser under `components.schemas`.
    ///
    /// Each parser is stored under its registered name. Named records it
    /// reaches are stored under their own names and referenced with `$ref`.
    pub fn to_open_api(&self) -> Value {
        self.to_open_api_with(SchemaContext::new())
    }

    /// Like [`to_open_api`](Self::to_open_api), starting from `ctx`, e.g.
    /// one with a custom reference prefix.
    pub fn to_open_api_with(&self, mut ctx: SchemaContext) -> Value {
        let parsers = self.parsers.read();

        for (name, parser) in parsers.iter() {
            let fragment = parser.open_api(&mut ctx);
            // A record named like its registration already defined itself.
            if fragment != ctx.reference(name) {
                ctx.define(name, |_| fragment);
            }
        }

        ctx.to_document()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SchemaRegistry {
    fn clone(&self) -> Self {
        Self {
            parsers: Arc::clone(&self.parsers),
        }
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a parser with a name that already exists.
    #[error("parser '{0}' already registered")]
    DuplicateName(String),

    /// Attempted to parse with a name that doesn't exist.
    #[error("parser '{0}' not found")]
    NotFound(String),
}
