//! Errors raised while declaring parsers.

/// A parser declaration that can never be valid.
///
/// These are programmer errors caught at startup, when parsers are built,
/// never while parsing a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    /// Two arguments of one record share a key.
    #[error("key '{0}' is declared more than once")]
    DuplicateKey(String),

    /// `combine` was given two records that both declare a key.
    #[error("cannot combine records: key '{0}' is declared by both")]
    OverlappingKey(String),

    /// `add_tag` named a key that is already a declared argument.
    #[error("tag '{0}' collides with a declared argument")]
    TagConflict(String),
}
