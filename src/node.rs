//! The value algebra every fixture is parsed into.
//!
//! A [`Node`] is either a literal (null, bool, int, string, array, map) or an
//! expression still waiting for a [`crate::Context`] (concatenation, variable
//! expansion, extractor, random value). Nodes are immutable: evaluation and
//! diffing build new trees and never rewrite one in place.

use std::fmt;

use im::OrdMap;
use serde::{Serialize, Serializer};

use crate::generators::GeneratorKind;

/// Newtype-struct name under which a literal string travels through serde, so
/// the parser can take it verbatim instead of scanning it for placeholders.
pub(crate) const LITERAL_TOKEN: &str = "$jsonx::private::Literal";

/// Newtype-struct name under which an expression node travels through serde as
/// its canonical placeholder source.
pub(crate) const EXPRESSION_TOKEN: &str = "$jsonx::private::Expression";

/// Newtype-struct name wrapping the fragments of a concatenation. Human-readable
/// formats receive the source text; the parser receives the fragment sequence
/// so literal fragments are never re-split.
pub(crate) const CONCATENATION_TOKEN: &str = "$jsonx::private::Concatenation";

/// A parsed fixture value.
///
/// # Examples
///
/// ```rust
/// use jsonx::Node;
/// let n = Node::from("hello");
/// assert_eq!(n.type_name(), "string");
/// assert!(n.is_literal());
/// assert!(Node::default().is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    String(String),
    Array(Vec<Node>),
    /// Keys iterate in sorted order; insertion order is irrelevant for equality.
    Map(OrdMap<String, Node>),
    /// Fragments of one source string split on placeholder boundaries.
    /// Always holds at least two fragments.
    Concatenation(Vec<Node>),
    /// `$name` or `${name}`.
    VarExpansion(String),
    /// `$(name)`: captures the actual value during a diff.
    Extractor(String),
    /// `${bind:kind:config}`.
    RandomValue {
        bind: Option<String>,
        kind: GeneratorKind,
        config: String,
    },
}

impl Node {
    /// Builds a concatenation, collapsing degenerate fragment lists.
    ///
    /// No fragments yield an empty string and a single fragment is returned as is.
    pub fn concatenation(mut fragments: Vec<Node>) -> Node {
        match fragments.len() {
            0 => Node::String(String::new()),
            1 => fragments.remove(0),
            _ => Node::Concatenation(fragments),
        }
    }

    pub fn map<K, I>(entries: I) -> Node
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Node)>,
    {
        Node::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "bool",
            Node::Int(_) => "int",
            Node::String(_) => "string",
            Node::Array(_) => "array",
            Node::Map(_) => "map",
            Node::Concatenation(_) => "concatenation",
            Node::VarExpansion(_) => "varExpansion",
            Node::Extractor(_) => "extractor",
            Node::RandomValue { .. } => "randomValue",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    /// True when no expression node remains anywhere in the tree.
    pub fn is_literal(&self) -> bool {
        match self {
            Node::Null | Node::Bool(_) | Node::Int(_) | Node::String(_) => true,
            Node::Array(items) => items.iter().all(Node::is_literal),
            Node::Map(entries) => entries.values().all(Node::is_literal),
            Node::Concatenation(_)
            | Node::VarExpansion(_)
            | Node::Extractor(_)
            | Node::RandomValue { .. } => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Node::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Node]> {
        match self {
            Node::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&OrdMap<String, Node>> {
        match self {
            Node::Map(entries) => Some(entries),
            _ => None,
        }
    }

    fn fmt_random(
        f: &mut fmt::Formatter<'_>,
        bind: Option<&str>,
        kind: GeneratorKind,
        config: &str,
    ) -> fmt::Result {
        write!(f, "${{{}:{}", bind.unwrap_or_default(), kind)?;
        if config.is_empty() {
            f.write_str("}")
        } else if config.starts_with('/') || config.contains('}') {
            write!(f, ":/{config}/}}")
        } else {
            write!(f, ":{config}}}")
        }
    }

    fn fmt_json(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Text rendering used by concatenation, `eval_str` and difference reports.
///
/// Expression nodes render as their canonical placeholder source, which parses
/// back into the same node.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Null => f.write_str("<nil>"),
            Node::Bool(b) => write!(f, "{b}"),
            Node::Int(i) => write!(f, "{i}"),
            Node::String(s) => f.write_str(s),
            Node::Array(_) | Node::Map(_) => self.fmt_json(f),
            Node::Concatenation(fragments) => {
                for fragment in fragments {
                    match fragment {
                        Node::String(s) => f.write_str(&s.replace('$', "$$"))?,
                        other => write!(f, "{other}")?,
                    }
                }
                Ok(())
            }
            Node::VarExpansion(name) => write!(f, "${{{name}}}"),
            Node::Extractor(name) => write!(f, "$({name})"),
            Node::RandomValue { bind, kind, config } => {
                Node::fmt_random(f, bind.as_deref(), *kind, config)
            }
        }
    }
}

/// Literals serialize to their natural JSON shape; expression nodes serialize
/// to their placeholder source text.
impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Int(i) => serializer.serialize_i64(*i),
            Node::String(s) => serializer.serialize_newtype_struct(LITERAL_TOKEN, s),
            Node::Array(items) => serializer.collect_seq(items),
            Node::Map(entries) => serializer.collect_map(entries.iter()),
            Node::Concatenation(_) => {
                serializer.serialize_newtype_struct(CONCATENATION_TOKEN, &Fragments(self))
            }
            _ => serializer.serialize_newtype_struct(EXPRESSION_TOKEN, &self.to_string()),
        }
    }
}

struct Fragments<'a>(&'a Node);

impl Serialize for Fragments<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Node::Concatenation(fragments) if !serializer.is_human_readable() => {
                serializer.collect_seq(fragments)
            }
            node => serializer.collect_str(node),
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::String(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Int(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::Array(value)
    }
}
