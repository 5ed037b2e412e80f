//! Host values in, [`Node`] trees out.
//!
//! [`parse`] accepts anything `serde` can serialize. Every string met on the
//! way is scanned for placeholders; everything else maps onto the matching
//! literal node. Parsing a [`Node`] returns an equal node.

use serde::Serialize;

use crate::errors::ParseError;
use crate::node::Node;

mod expression;
mod host;

use host::HostSerializer;

/// Parses a host value into a node tree.
///
/// # Examples
///
/// ```rust
/// use jsonx::{parse, Node};
/// let node = parse(&serde_json::json!({"greeting": "hello ${who}"})).unwrap();
/// let greeting = &node.as_map().unwrap()["greeting"];
/// assert!(matches!(greeting, Node::Concatenation(_)));
/// ```
pub fn parse<T: Serialize + ?Sized>(value: &T) -> Result<Node, ParseError> {
    value.serialize(HostSerializer::default())
}

/// Parses a host value without scanning its strings.
///
/// Used for data that is compared against a fixture rather than written as
/// one, such as a decoded response body. Numbers with no `Int` form are kept
/// as their decimal text instead of failing.
///
/// ```rust
/// use jsonx::{parse_literal, Node};
/// assert_eq!(parse_literal("costs $5").unwrap(), Node::from("costs $5"));
/// ```
pub fn parse_literal<T: Serialize + ?Sized>(value: &T) -> Result<Node, ParseError> {
    value.serialize(HostSerializer::verbatim())
}

/// Scans a single string for placeholders.
///
/// ```rust
/// use jsonx::{parse_str, Node};
/// assert_eq!(parse_str("a $$ b").unwrap(), Node::from("a $ b"));
/// ```
pub fn parse_str(source: &str) -> Result<Node, ParseError> {
    expression::parse_expression(source)
}
