//! Resolves expression nodes against a [`Context`].
//!
//! Evaluation rebuilds the tree bottom-up: literals are copied, variables are
//! looked up and evaluated in turn, generators draw from the context PRNG and
//! concatenations are flattened to text. The result never contains an
//! expression node.

use crate::context::{Binding, Context};
use crate::errors::{Error, EvalError};
use crate::node::Node;
use crate::parser::{parse, parse_str};

/// Deepest chain of variables expanding into other variables.
pub const MAX_EXPANSION_DEPTH: usize = 64;

/// Evaluates `node` into a literal tree.
///
/// # Examples
///
/// ```rust
/// use jsonx::{eval, parse_str, Context, Node};
/// let mut ctx = Context::with_seed(1);
/// ctx.set("who", "world");
/// let node = parse_str("hello ${who}").unwrap();
/// assert_eq!(eval(&node, &mut ctx).unwrap(), Node::from("hello world"));
/// ```
pub fn eval(node: &Node, ctx: &mut Context) -> Result<Node, EvalError> {
    Evaluator { ctx, depth: 0 }.eval(node)
}

/// Parses `expression`, evaluates it and renders the result as text.
///
/// ```rust
/// use jsonx::{eval_str, Context};
/// let mut ctx = Context::with_seed(1);
/// ctx.set("n", 3i64);
/// assert_eq!(eval_str("n=$n, missing=$none", &mut ctx).unwrap(), "n=3, missing=<nil>");
/// ```
pub fn eval_str(expression: &str, ctx: &mut Context) -> Result<String, Error> {
    let node = parse_str(expression)?;
    Ok(eval(&node, ctx)?.to_string())
}

struct Evaluator<'c> {
    ctx: &'c mut Context,
    depth: usize,
}

impl Evaluator<'_> {
    fn eval(&mut self, node: &Node) -> Result<Node, EvalError> {
        match node {
            Node::Null | Node::Bool(_) | Node::Int(_) | Node::String(_) => Ok(node.clone()),
            Node::Array(items) => items
                .iter()
                .map(|item| self.eval(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Node::Array),
            Node::Map(entries) => {
                let mut out = entries.clone();
                for (key, value) in entries {
                    out.insert(key.clone(), self.eval(value)?);
                }
                Ok(Node::Map(out))
            }
            Node::Concatenation(fragments) => {
                let mut text = String::new();
                for fragment in fragments {
                    text.push_str(&self.eval(fragment)?.to_string());
                }
                Ok(Node::String(text))
            }
            Node::VarExpansion(name) => self.expand(name),
            Node::Extractor(name) => Err(EvalError::Extractor { name: name.clone() }),
            Node::RandomValue { bind, kind, config } => {
                let value = kind.generate(config, self.ctx.rng_mut())?;
                if let Some(bind) = bind {
                    self.ctx.set(bind.as_str(), value.clone());
                }
                Ok(value)
            }
        }
    }

    fn expand(&mut self, name: &str) -> Result<Node, EvalError> {
        let parsed = match self.ctx.get(name) {
            None => return Ok(Node::Null),
            Some(Binding::Node(node)) => node.clone(),
            Some(Binding::Host(value)) => parse(value)?,
        };

        if self.depth >= MAX_EXPANSION_DEPTH {
            return Err(EvalError::RecursionLimit {
                name: name.to_string(),
                limit: MAX_EXPANSION_DEPTH,
            });
        }
        self.depth += 1;
        let result = self.eval(&parsed);
        self.depth -= 1;
        result
    }
}
