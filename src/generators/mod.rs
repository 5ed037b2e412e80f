//! Generator registry.
//!
//! Generators produce synthetic literal values for `${bind:kind:config}`
//! placeholders. Each kind has a stable registry name used both by the parser
//! to resolve the placeholder and by the canonical rendering of a node.
//!
//! Randomness is never global: every generator draws from the PRNG handed in by
//! the caller, which in practice is the one owned by the [`crate::Context`].

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use rand::RngCore;

use crate::errors::GeneratorError;
use crate::node::Node;

mod fake;
mod pattern;

/// Every registered generator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeneratorKind {
    String,
    Name,
    Email,
    Phone,
    Address,
    CompanyName,
    Regex,
}

static REGISTRY: Lazy<HashMap<&'static str, GeneratorKind>> = Lazy::new(|| {
    GeneratorKind::ALL
        .iter()
        .map(|kind| (kind.name(), *kind))
        .collect()
});

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 7] = [
        GeneratorKind::String,
        GeneratorKind::Name,
        GeneratorKind::Email,
        GeneratorKind::Phone,
        GeneratorKind::Address,
        GeneratorKind::CompanyName,
        GeneratorKind::Regex,
    ];

    /// Looks a generator up by its registry name (`random.name`, ...).
    ///
    /// ```rust
    /// use jsonx::generators::GeneratorKind;
    /// assert_eq!(GeneratorKind::from_name("random.email"), Some(GeneratorKind::Email));
    /// assert_eq!(GeneratorKind::from_name("random.unicorn"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<GeneratorKind> {
        REGISTRY.get(name).copied()
    }

    /// The stable registry name of this kind.
    pub const fn name(&self) -> &'static str {
        match self {
            GeneratorKind::String => "random.string",
            GeneratorKind::Name => "random.name",
            GeneratorKind::Email => "random.email",
            GeneratorKind::Phone => "random.phone",
            GeneratorKind::Address => "random.address",
            GeneratorKind::CompanyName => "random.companyName",
            GeneratorKind::Regex => "random.regex",
        }
    }

    /// One-line description for listings.
    pub const fn summary(&self) -> &'static str {
        match self {
            GeneratorKind::String => "random letters; config sets the length (default 6)",
            GeneratorKind::Name => "a full name",
            GeneratorKind::Email => "an email address",
            GeneratorKind::Phone => "a 10 digit phone number",
            GeneratorKind::Address => "a postal address on one comma separated line",
            GeneratorKind::CompanyName => "a company name",
            GeneratorKind::Regex => "a string matching the config regular expression",
        }
    }

    /// Produces a literal node for this kind.
    pub fn generate(&self, config: &str, rng: &mut dyn RngCore) -> Result<Node, GeneratorError> {
        tracing::trace!(generator = self.name(), config, "generating value");
        let text = match self {
            GeneratorKind::String => fake::letters(rng, string_length(config)?),
            GeneratorKind::Name => fake::full_name(rng),
            GeneratorKind::Email => fake::email(rng),
            GeneratorKind::Phone => fake::phone(rng),
            GeneratorKind::Address => fake::address(rng),
            GeneratorKind::CompanyName => fake::company(rng),
            GeneratorKind::Regex => pattern::sample(config, rng)?,
        };
        Ok(Node::String(text))
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const DEFAULT_STRING_LENGTH: usize = 6;
/// Longest `random.string` a fixture may ask for.
pub const MAX_STRING_LENGTH: usize = 4096;

fn string_length(config: &str) -> Result<usize, GeneratorError> {
    let config = config.trim();
    if config.is_empty() {
        return Ok(DEFAULT_STRING_LENGTH);
    }
    match config.parse() {
        Ok(length) if length <= MAX_STRING_LENGTH => Ok(length),
        _ => Err(GeneratorError::InvalidLength {
            generator: GeneratorKind::String.name(),
            config: config.to_string(),
            max: MAX_STRING_LENGTH,
        }),
    }
}
