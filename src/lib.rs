//! Placeholder expressions, synthetic data and structural diffing for JSON/YAML
//! test fixtures.
//!
//! A fixture is decoded into any `serde` value, [`parse`]d into a [`Node`]
//! tree, then either [`eval`]uated against a [`Context`] to build an outgoing
//! payload or [`compare`]d against an actual value to produce [`Differences`].

pub mod cli;
pub mod context;
pub mod diff;
pub mod errors;
pub mod eval;
pub mod generators;
pub mod node;
pub mod parser;

pub use crate::context::{Binding, Context};
pub use crate::diff::{compare, diff, Differ, Difference, DifferenceKind, Differences};
pub use crate::errors::{Error, EvalError, GeneratorError, ParseError, Result};
pub use crate::eval::{eval, eval_str};
pub use crate::node::Node;
pub use crate::parser::{parse, parse_literal, parse_str};
