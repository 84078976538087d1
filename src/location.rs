//! Error locations inside nested payloads.
//!
//! This module provides [`Location`] and [`Segment`]. Locations are built
//! outward-in: a leaf parser fails with an empty location and every container
//! the error travels through prepends the key or index it was looking at.

use std::fmt::{self, Display};

use serde_json::Value;

/// One step of a [`Location`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A record or mapping key (e.g. `email`).
    Key(String),
    /// A list index (e.g. `[3]`).
    Index(usize),
}

impl Segment {
    /// Creates a key segment.
    pub fn key(name: impl Into<String>) -> Self {
        Segment::Key(name.into())
    }

    /// Creates an index segment.
    pub fn index(idx: usize) -> Self {
        Segment::Index(idx)
    }

    /// Returns the segment as a JSON value (string for keys, number for indices).
    pub fn to_json(&self) -> Value {
        match self {
            Segment::Key(name) => Value::String(name.clone()),
            Segment::Index(idx) => Value::from(*idx),
        }
    }
}

impl From<&str> for Segment {
    fn from(name: &str) -> Self {
        Segment::Key(name.to_string())
    }
}

impl From<String> for Segment {
    fn from(name: String) -> Self {
        Segment::Key(name)
    }
}

impl From<usize> for Segment {
    fn from(idx: usize) -> Self {
        Segment::Index(idx)
    }
}

/// The path from the root of a payload to the value an error is about.
///
/// Rendering puts the outermost segment first without decoration, then
/// `.key` for keys and `[n]` for indices:
///
/// ```rust
/// use reqshape::{Location, Segment};
///
/// let loc = Location::root()
///     .prepend(Segment::index(5))
///     .prepend(Segment::key("b"))
///     .prepend(Segment::index(4));
///
/// assert_eq!(loc.to_string(), "4.b[5]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Location {
    segments: Vec<Segment>,
}

impl Location {
    /// Creates an empty location pointing at the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a location from outer-to-inner segments.
    pub fn from_segments(segments: impl IntoIterator<Item = Segment>) -> Self {
        Self {
            segments: segments.into_iter().collect(),
        }
    }

    /// Returns a new location with `segment` as the new outermost step.
    ///
    /// The receiver is left untouched.
    pub fn prepend(&self, segment: Segment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.push(segment);
        segments.extend(self.segments.iter().cloned());
        Self { segments }
    }

    /// Returns true if this is the root location.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if there are no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterates over segments, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Returns the outermost segment, or None at the root.
    pub fn first(&self) -> Option<&Segment> {
        self.segments.first()
    }

    /// Returns the innermost segment, or None at the root.
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Returns the segments as a JSON array, e.g. `[4, "b", 5]`.
    pub fn to_json(&self) -> Value {
        Value::Array(self.segments.iter().map(Segment::to_json).collect())
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(name) if i == 0 => write!(f, "{}", name)?,
                Segment::Key(name) => write!(f, ".{}", name)?,
                Segment::Index(idx) if i == 0 => write!(f, "{}", idx)?,
                Segment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}
