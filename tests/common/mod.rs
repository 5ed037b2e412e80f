//! Shared helpers for the jsonx integration tests.

#![allow(dead_code)]

use jsonx::{eval, parse, parse_literal, Context, Differences, Node};
use serde_json::Value;

/// Seed used by every test that draws generated values.
pub const SEED: u64 = 20_240_601;

pub fn seeded() -> Context {
    Context::with_seed(SEED)
}

pub fn node(value: Value) -> Node {
    parse(&value).expect("fixture parses")
}

pub fn literal(value: Value) -> Node {
    parse_literal(&value).expect("value parses")
}

pub fn eval_json(value: Value, ctx: &mut Context) -> Node {
    eval(&node(value), ctx).expect("fixture evaluates")
}

/// Renders each difference as `path: message`.
pub fn summarize(differences: &Differences) -> Vec<String> {
    differences
        .iter()
        .map(|d| format!("{}: {}", d.display_path(), d.kind))
        .collect()
}
