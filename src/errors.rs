//! jsonx error taxonomy.
//!
//! Parse errors abort the fixture being read, evaluation errors signal a misused
//! expression, and generator errors come from a bad generator configuration.
//! Comparison mismatches are not errors: they are reported as [`crate::Differences`].
//!
//! Every error is a `miette` diagnostic so the CLI can render the offending
//! expression with a label at the failing position.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

// ============================================================================
// PARSE ERRORS
// ============================================================================

/// Malformed placeholder syntax or a host value the value model cannot hold.
#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("invalid expression {expression:?}: unterminated {construct} at {position}")]
    #[diagnostic(
        code(jsonx::parse::unterminated),
        help("close the placeholder, or write `$$` for a literal dollar sign")
    )]
    Unterminated {
        construct: &'static str,
        #[source_code]
        expression: String,
        #[label("{construct} opened here is never closed")]
        span: SourceSpan,
        position: usize,
    },

    #[error("invalid expression {expression:?}: expected {expected} at {position}")]
    #[diagnostic(code(jsonx::parse::unexpected))]
    Unexpected {
        expected: &'static str,
        #[source_code]
        expression: String,
        #[label("expected {expected}")]
        span: SourceSpan,
        position: usize,
    },

    #[error("invalid expression {expression:?}: unknown generator '{name}' at {position}")]
    #[diagnostic(
        code(jsonx::parse::unknown_generator),
        help("run `jsonx generators` to list the available generators")
    )]
    UnknownGenerator {
        name: String,
        #[source_code]
        expression: String,
        #[label("no generator is registered under this name")]
        span: SourceSpan,
        position: usize,
    },

    #[error("unsupported value: {message}")]
    #[diagnostic(code(jsonx::parse::unsupported))]
    Unsupported { message: String },
}

impl ParseError {
    /// Byte offset of the failure inside the scanned expression, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::Unterminated { position, .. }
            | ParseError::Unexpected { position, .. }
            | ParseError::UnknownGenerator { position, .. } => Some(*position),
            ParseError::Unsupported { .. } => None,
        }
    }
}

impl serde::ser::Error for ParseError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        ParseError::Unsupported {
            message: msg.to_string(),
        }
    }
}

// ============================================================================
// GENERATOR ERRORS
// ============================================================================

#[derive(Debug, Error, Diagnostic)]
pub enum GeneratorError {
    #[error("invalid pattern {pattern:?} for random.regex")]
    #[diagnostic(code(jsonx::generator::pattern))]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex_syntax::Error,
    },

    #[error("invalid length {config:?} for {generator}, expected an integer from 0 to {max}")]
    #[diagnostic(code(jsonx::generator::length))]
    InvalidLength {
        generator: &'static str,
        config: String,
        max: usize,
    },
}

// ============================================================================
// EVALUATION ERRORS
// ============================================================================

#[derive(Debug, Error, Diagnostic)]
pub enum EvalError {
    #[error("extractors cannot be evaluated. Use '${{{name}}}' instead of '$({name})'")]
    #[diagnostic(
        code(jsonx::eval::extractor),
        help("extractors only capture values while comparing an expected fixture")
    )]
    Extractor { name: String },

    #[error("variable '{name}' expands through more than {limit} nested variables")]
    #[diagnostic(
        code(jsonx::eval::recursion_limit),
        help("check for a context value that refers to itself")
    )]
    RecursionLimit { name: String, limit: usize },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Generator(#[from] GeneratorError),
}

// ============================================================================
// CRATE ERROR
// ============================================================================

/// Any failure of the public entry points.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Eval(#[from] EvalError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
