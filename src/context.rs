//! The variable store threaded through evaluation and diffing.
//!
//! A [`Context`] is owned by one flow execution and passed by `&mut` to every
//! call that may read or bind variables. It also owns the PRNG the generators
//! draw from, so a seeded context replays the same synthetic values.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use serde::{Serialize, Serializer};

use crate::node::Node;

// Using a concrete, seedable PRNG for determinism.
type ContextRng = Xoshiro256StarStar;

// ============================================================================
// BINDINGS
// ============================================================================

/// A value stored under a variable name.
///
/// Host values are scanned for placeholders every time they are expanded, so a
/// value may refer to other variables. Node values are already parsed and are
/// expanded as they are.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Host(serde_json::Value),
    Node(Node),
}

impl Serialize for Binding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Binding::Host(value) => value.serialize(serializer),
            Binding::Node(node) => node.serialize(serializer),
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Host(serde_json::Value::String(s)) => f.write_str(s),
            Binding::Host(value) => write!(f, "{value}"),
            Binding::Node(node) => write!(f, "{node}"),
        }
    }
}

impl From<Node> for Binding {
    fn from(value: Node) -> Self {
        Binding::Node(value)
    }
}

impl From<serde_json::Value> for Binding {
    fn from(value: serde_json::Value) -> Self {
        Binding::Host(value)
    }
}

impl From<&str> for Binding {
    fn from(value: &str) -> Self {
        Binding::Host(value.into())
    }
}

impl From<String> for Binding {
    fn from(value: String) -> Self {
        Binding::Host(value.into())
    }
}

impl From<i64> for Binding {
    fn from(value: i64) -> Self {
        Binding::Host(value.into())
    }
}

impl From<bool> for Binding {
    fn from(value: bool) -> Self {
        Binding::Host(value.into())
    }
}

// ============================================================================
// CONTEXT
// ============================================================================

/// Mutable name to value map plus the PRNG used by generators.
///
/// # Examples
///
/// ```rust
/// use jsonx::{Binding, Context};
/// let mut ctx = Context::with_seed(7);
/// ctx.set("who", "world");
/// assert_eq!(ctx.get("who"), Some(&Binding::from("world")));
/// assert!(ctx.get("nobody").is_none());
/// ```
pub struct Context {
    vars: HashMap<String, Binding>,
    rng: ContextRng,
}

impl Context {
    /// An empty context with an entropy-seeded PRNG.
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
            rng: ContextRng::from_entropy(),
        }
    }

    /// An empty context whose generators replay the same sequence for the same seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            vars: HashMap::new(),
            rng: ContextRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            vars: HashMap::new(),
            rng: ContextRng::from_seed(seed),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.vars.get(name)
    }

    /// Binds `name`, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Binding>) {
        let name = name.into();
        let value = value.into();
        tracing::debug!(variable = %name, value = %value, "binding variable");
        self.vars.insert(name, value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// All bindings in name order.
    pub fn bindings(&self) -> BTreeMap<&str, &Binding> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v)).collect()
    }

    /// The PRNG generators draw from.
    pub fn rng_mut(&mut self) -> &mut dyn RngCore {
        &mut self.rng
    }

    /// Binds every entry of a values document.
    pub fn seed_values<I, K, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Binding>,
    {
        for (name, value) in values {
            self.set(name, value);
        }
    }

    /// Binds each variable to the content of an environment variable.
    ///
    /// `declarations` maps a variable name to the environment variable it is
    /// read from. Unset or non-unicode environment variables bind the empty
    /// string.
    pub fn seed_from_environment<'a, I>(&mut self, declarations: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, env_name) in declarations {
            let value = std::env::var(env_name).unwrap_or_else(|_| {
                tracing::warn!(variable = name, env = env_name, "environment variable is not set");
                String::new()
            });
            self.set(name, value);
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("vars", &self.bindings())
            .finish_non_exhaustive()
    }
}
