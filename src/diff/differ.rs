use serde::Serialize;

use super::{diff, Differences};
use crate::context::Context;
use crate::errors::Result;
use crate::parser::{parse, parse_literal};

/// Number of diff passes run by [`Differ::compare`].
///
/// The first pass lets every extractor bind, the second reports against those
/// bindings. Expressions that depend on each other in a cycle are not settled
/// by further passes.
pub const DIFF_PASSES: usize = 2;

/// Compares host values against a context it borrows for its lifetime.
///
/// # Examples
///
/// ```rust
/// use jsonx::{Context, Differ};
/// use serde_json::json;
/// let mut ctx = Context::with_seed(1);
/// let mut differ = Differ::new(&mut ctx);
/// let differences = differ
///     .compare(
///         &json!({"id": "$(id)", "self": "/items/${id}"}),
///         &json!({"id": 7, "self": "/items/7"}),
///     )
///     .unwrap();
/// assert!(differences.is_empty());
/// ```
pub struct Differ<'c> {
    context: &'c mut Context,
}

impl<'c> Differ<'c> {
    pub fn new(context: &'c mut Context) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &Context {
        self.context
    }

    /// Parses both values and diffs them twice, returning the second result.
    ///
    /// `expected` is scanned for placeholders; `actual` is taken literally.
    pub fn compare<E, A>(&mut self, expected: &E, actual: &A) -> Result<Differences>
    where
        E: Serialize + ?Sized,
        A: Serialize + ?Sized,
    {
        let actual = parse_literal(actual)?;
        let expected = parse(expected)?;

        let mut differences = Differences::default();
        for pass in 1..=DIFF_PASSES {
            differences = diff(&expected, &actual, self.context)?;
            tracing::trace!(pass, differences = differences.len(), "diff pass");
        }
        Ok(differences)
    }
}

/// Shorthand for [`Differ::compare`] with a borrowed context.
pub fn compare<E, A>(expected: &E, actual: &A, context: &mut Context) -> Result<Differences>
where
    E: Serialize + ?Sized,
    A: Serialize + ?Sized,
{
    Differ::new(context).compare(expected, actual)
}
