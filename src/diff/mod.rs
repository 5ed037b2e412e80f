//! Structural comparison of an expected fixture against an actual value.
//!
//! The walk is driven by the expected node. Extractors capture whatever the
//! actual value holds at their position, expressions are evaluated before
//! being compared, and composites recurse while prefixing paths. Mismatches
//! are collected, never raised: only a misused expression aborts the walk.

use std::fmt;
use std::ops::Deref;

use crate::context::{Binding, Context};
use crate::errors::EvalError;
use crate::eval::eval;
use crate::node::Node;

mod differ;

pub use differ::{compare, Differ};

// ============================================================================
// DIFFERENCES
// ============================================================================

/// Why two values differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifferenceKind {
    Different,
    ExpectedArray,
    DifferentArrayLengths,
    MissingValue,
    ExtraValue,
    ExpectedMap,
}

impl DifferenceKind {
    pub const fn message(&self) -> &'static str {
        match self {
            DifferenceKind::Different => "different",
            DifferenceKind::ExpectedArray => "expected array",
            DifferenceKind::DifferentArrayLengths => "different array lengths",
            DifferenceKind::MissingValue => "missing value",
            DifferenceKind::ExtraValue => "extra value",
            DifferenceKind::ExpectedMap => "expected map",
        }
    }
}

impl fmt::Display for DifferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// One mismatch found while comparing.
#[derive(Debug, Clone, PartialEq)]
pub struct Difference {
    /// Segments innermost-first, as they were pushed while unwinding.
    pub path: Vec<String>,
    /// The expected node as written in the fixture.
    pub expected_raw: Node,
    /// The expected node after evaluation.
    pub expected: Node,
    pub actual: Node,
    pub kind: DifferenceKind,
}

impl Difference {
    fn new(kind: DifferenceKind, expected: Node, actual: Node) -> Self {
        Self {
            path: Vec::new(),
            expected_raw: expected.clone(),
            expected,
            actual,
            kind,
        }
    }

    pub fn message(&self) -> &'static str {
        self.kind.message()
    }

    /// Path segments outermost-first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.iter().rev().map(String::as_str)
    }

    /// Path outermost-first joined with `.`, or `<root>` when empty.
    pub fn display_path(&self) -> String {
        if self.path.is_empty() {
            return "<root>".to_string();
        }
        self.segments().collect::<Vec<_>>().join(".")
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}. Expected: {}, Actual: {}",
            self.display_path(),
            self.kind,
            self.expected,
            self.actual
        )
    }
}

/// Ordered list of differences; empty means the values match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Differences(Vec<Difference>);

impl Differences {
    pub fn into_vec(self) -> Vec<Difference> {
        self.0
    }

    fn push(&mut self, difference: Difference) {
        self.0.push(difference);
    }

    fn extend_at(&mut self, segment: &str, nested: Differences) {
        self.0.extend(nested.0.into_iter().map(|mut d| {
            d.path.push(segment.to_string());
            d
        }));
    }
}

impl Deref for Differences {
    type Target = [Difference];

    fn deref(&self) -> &[Difference] {
        &self.0
    }
}

impl IntoIterator for Differences {
    type Item = Difference;
    type IntoIter = std::vec::IntoIter<Difference>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Differences {
    type Item = &'a Difference;
    type IntoIter = std::slice::Iter<'a, Difference>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One line per difference.
impl fmt::Display for Differences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for difference in &self.0 {
            writeln!(f, "{difference}")?;
        }
        Ok(())
    }
}

// ============================================================================
// DIFF
// ============================================================================

/// Compares `expected` against `actual` in a single pass.
///
/// Extractors met along the way bind the actual value into `ctx`. An
/// expression that refers to a variable bound by a later extractor sees the
/// previous binding; use [`Differ`] to get the settled result.
///
/// # Examples
///
/// ```rust
/// use jsonx::{diff, parse, Context, DifferenceKind};
/// let expected = parse(&serde_json::json!(["hello", "world"])).unwrap();
/// let actual = parse(&serde_json::json!(["hello", "moon"])).unwrap();
/// let differences = diff(&expected, &actual, &mut Context::with_seed(1)).unwrap();
/// assert_eq!(differences.len(), 1);
/// assert_eq!(differences[0].path, ["1"]);
/// assert_eq!(differences[0].kind, DifferenceKind::Different);
/// ```
pub fn diff(expected: &Node, actual: &Node, ctx: &mut Context) -> Result<Differences, EvalError> {
    let mut out = Differences::default();
    match expected {
        Node::Extractor(name) => {
            ctx.set(name.as_str(), Binding::Node(actual.clone()));
        }
        Node::VarExpansion(_) | Node::Concatenation(_) | Node::RandomValue { .. } => {
            let resolved = eval(expected, ctx)?;
            if resolved != *actual {
                out.push(Difference {
                    path: Vec::new(),
                    expected_raw: expected.clone(),
                    expected: resolved,
                    actual: actual.clone(),
                    kind: DifferenceKind::Different,
                });
            }
        }
        Node::Array(items) => match actual {
            Node::Array(others) if others.len() == items.len() => {
                for (index, (item, other)) in items.iter().zip(others).enumerate() {
                    let nested = diff(item, other, ctx)?;
                    out.extend_at(&index.to_string(), nested);
                }
            }
            Node::Array(_) => out.push(Difference::new(
                DifferenceKind::DifferentArrayLengths,
                expected.clone(),
                actual.clone(),
            )),
            _ => out.push(Difference::new(
                DifferenceKind::ExpectedArray,
                expected.clone(),
                actual.clone(),
            )),
        },
        Node::Map(entries) => {
            let Node::Map(others) = actual else {
                out.push(Difference::new(
                    DifferenceKind::ExpectedMap,
                    expected.clone(),
                    actual.clone(),
                ));
                return Ok(out);
            };
            for (key, value) in entries {
                match others.get(key) {
                    Some(other) => {
                        let nested = diff(value, other, ctx)?;
                        out.extend_at(key, nested);
                    }
                    None => {
                        let mut missing = Difference::new(
                            DifferenceKind::MissingValue,
                            value.clone(),
                            Node::Null,
                        );
                        missing.path.push(key.clone());
                        out.push(missing);
                    }
                }
            }
            for (key, other) in others {
                if !entries.contains_key(key) {
                    let mut extra =
                        Difference::new(DifferenceKind::ExtraValue, Node::Null, other.clone());
                    extra.path.push(key.clone());
                    out.push(extra);
                }
            }
        }
        Node::Null | Node::Bool(_) | Node::Int(_) | Node::String(_) => {
            if expected != actual {
                out.push(Difference::new(
                    DifferenceKind::Different,
                    expected.clone(),
                    actual.clone(),
                ));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, parse_literal};
    use serde_json::json;

    fn run(expected: serde_json::Value, actual: serde_json::Value) -> Differences {
        let mut ctx = Context::with_seed(3);
        diff(&parse(&expected).unwrap(), &parse_literal(&actual).unwrap(), &mut ctx).unwrap()
    }

    #[test]
    fn equal_values_have_no_differences() {
        let value = json!({"a": [1, "two", null, {"b": false}]});
        assert!(run(value.clone(), value).is_empty());
    }

    #[test]
    fn scalar_mismatch_at_root() {
        let diffs = run(json!("a"), json!("b"));
        assert_eq!(diffs.len(), 1);
        assert!(diffs[0].path.is_empty());
        assert_eq!(diffs[0].display_path(), "<root>");
        assert_eq!(diffs[0].to_string(), "<root>: different. Expected: a, Actual: b");
    }

    #[test]
    fn type_mismatch_is_different() {
        let diffs = run(json!(1), json!("1"));
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, DifferenceKind::Different);
    }

    #[test]
    fn array_against_scalar_stops() {
        let diffs = run(json!([1, 2]), json!({"a": 1}));
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, DifferenceKind::ExpectedArray);
    }

    #[test]
    fn map_against_array() {
        let diffs = run(json!({"a": 1}), json!([1]));
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, DifferenceKind::ExpectedMap);
        assert_eq!(diffs[0].expected_raw, diffs[0].expected);
    }

    #[test]
    fn nested_paths_are_innermost_first() {
        let diffs = run(
            json!({"user": {"tags": ["a", "b"]}}),
            json!({"user": {"tags": ["a", "c"]}}),
        );
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].path, ["1", "tags", "user"]);
        assert_eq!(diffs[0].display_path(), "user.tags.1");
    }

    #[test]
    fn siblings_are_still_compared_after_a_mismatch() {
        let diffs = run(
            json!({"a": 1, "b": [1], "c": "x", "d": true}),
            json!({"a": 2, "b": [1, 2], "c": "y", "e": false}),
        );
        let summary: Vec<(String, DifferenceKind)> =
            diffs.iter().map(|d| (d.display_path(), d.kind)).collect();
        assert_eq!(
            summary,
            [
                ("a".to_string(), DifferenceKind::Different),
                ("b".to_string(), DifferenceKind::DifferentArrayLengths),
                ("c".to_string(), DifferenceKind::Different),
                ("d".to_string(), DifferenceKind::MissingValue),
                ("e".to_string(), DifferenceKind::ExtraValue),
            ]
        );
    }

    #[test]
    fn expression_differences_keep_the_raw_node() {
        let mut ctx = Context::with_seed(3);
        ctx.set("who", "Holden");
        let expected = parse(&json!("${who}")).unwrap();
        let diffs = diff(&expected, &Node::from("Naomi"), &mut ctx).unwrap();
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].expected_raw, Node::VarExpansion("who".into()));
        assert_eq!(diffs[0].expected, Node::from("Holden"));
    }

    #[test]
    fn extractor_captures_any_shape() {
        let mut ctx = Context::with_seed(3);
        let actual = parse_literal(&json!({"id": [1, {"x": "y"}]})).unwrap();
        let expected = parse(&json!({"id": "$(captured)"})).unwrap();
        let diffs = diff(&expected, &actual, &mut ctx).unwrap();
        assert!(diffs.is_empty());
        let captured = actual.as_map().unwrap()["id"].clone();
        assert_eq!(ctx.get("captured"), Some(&Binding::Node(captured)));
    }

    #[test]
    fn extractor_inside_concatenation_is_an_error() {
        let mut ctx = Context::with_seed(3);
        let expected = parse(&json!("id-$(id)")).unwrap();
        let err = diff(&expected, &Node::from("id-1"), &mut ctx).unwrap_err();
        assert!(matches!(err, EvalError::Extractor { .. }));
    }
}
