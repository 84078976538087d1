//! Deferred parser construction.

use std::cell::Cell;
use std::fmt;
use std::sync::OnceLock;

use serde_json::{json, Value};

use crate::error::ParseError;
use crate::interop::{SchemaContext, MAX_UNNAMED_LAZY_DEPTH};

use super::traits::Parser;

type Factory<P> = Box<dyn Fn() -> P + Send + Sync>;

thread_local! {
    static DESCRIBE_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Restores the describe depth on drop, including during unwinding.
struct DescribeGuard {
    outer: usize,
}

impl DescribeGuard {
    fn enter() -> Option<Self> {
        let outer = DESCRIBE_DEPTH.with(Cell::get);
        if outer >= MAX_UNNAMED_LAZY_DEPTH {
            return None;
        }
        DESCRIBE_DEPTH.with(|depth| depth.set(outer + 1));
        Some(Self { outer })
    }
}

impl Drop for DescribeGuard {
    fn drop(&mut self) {
        DESCRIBE_DEPTH.with(|depth| depth.set(self.outer));
    }
}

/// Builds the real parser on first use.
///
/// The factory runs at most once, even when the first uses race on several
/// threads; every later call goes to the cached parser. This is how a record
/// refers to itself.
///
/// Building a union never forces a lazy alternative, so a lazy parser is
/// always treated as a generic alternative.
///
/// A record that refers to itself should be `.named`: its schema then
/// becomes a `$ref` and its description is just the name. An unnamed
/// recursive record is expanded [`MAX_UNNAMED_LAZY_DEPTH`] levels deep by
/// `describe` and `to_open_api`, which then emit `...` and `{}`.
///
/// # Example
///
/// ```rust
/// use reqshape::{Argument, FixedMapping, Parser, Shape};
/// use serde_json::json;
///
/// fn comment() -> FixedMapping {
///     Shape::fixed(vec![
///         Argument::required("text", Shape::string()),
///         Argument::optional("replies", Shape::list(Shape::lazy(comment))),
///     ])
///     .unwrap()
///     .named("Comment")
/// }
///
/// let thread = json!({"text": "hi", "replies": [{"text": "hello"}]});
/// assert!(comment().try_parse(&thread).is_ok());
/// ```
pub struct Lazy<P> {
    factory: Factory<P>,
    parser: OnceLock<P>,
}

impl<P: Parser> Lazy<P> {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> P + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            parser: OnceLock::new(),
        }
    }

    /// Returns true once the factory has run.
    pub fn is_initialized(&self) -> bool {
        self.parser.get().is_some()
    }

    /// Returns the inner parser, building it if needed.
    pub fn force(&self) -> &P {
        self.parser.get_or_init(|| {
            tracing::debug!("building lazily declared parser");
            (self.factory)()
        })
    }
}

impl<P: Parser> Parser for Lazy<P> {
    type Output = P::Output;

    fn try_parse(&self, raw: &Value) -> Result<P::Output, ParseError> {
        self.force().try_parse(raw)
    }

    fn to_open_api(&self, ctx: &mut SchemaContext) -> Value {
        if !ctx.enter_lazy() {
            tracing::debug!("unnamed recursive schema cut off");
            return json!({});
        }
        let fragment = self.force().to_open_api(ctx);
        ctx.leave_lazy();
        fragment
    }

    fn describe(&self) -> String {
        match DescribeGuard::enter() {
            Some(_guard) => self.force().describe(),
            None => "...".to_string(),
        }
    }
}

impl<P> fmt::Debug for Lazy<P>
where
    P: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lazy")
            .field("parser", &self.parser.get())
            .finish()
    }
}
