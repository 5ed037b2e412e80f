//! Defines the command-line arguments and subcommands for the jsonx CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "jsonx",
    version,
    about = "Evaluate and compare JSON/YAML fixtures with placeholder expressions."
)]
pub struct JsonxArgs {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, global = true)]
    pub debug: bool,

    /// Seed for generated values; the same seed replays the same values.
    #[arg(long, global = true, env = "JSONX_SEED")]
    pub seed: Option<u64>,

    /// YAML or JSON map of constants bound before anything is evaluated.
    #[arg(long, global = true, value_name = "FILE")]
    pub values: Option<PathBuf>,

    /// Bind a variable to an environment variable, e.g. `--env token=API_TOKEN`.
    #[arg(
        long = "env",
        global = true,
        value_name = "NAME=ENV_VAR",
        value_parser = parse_env_declaration
    )]
    pub env: Vec<(String, String)>,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate a fixture and print the resulting JSON.
    Eval {
        /// The path to the YAML or JSON fixture.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Compare an expected fixture against an actual document.
    Diff {
        /// The fixture holding the expected value, placeholders allowed.
        #[arg(required = true)]
        expected: PathBuf,
        /// The document holding the actual value, taken literally.
        #[arg(required = true)]
        actual: PathBuf,
        /// Print every variable binding after the comparison.
        #[arg(long)]
        show_context: bool,
    },
    /// List all available generators.
    Generators,
}

fn parse_env_declaration(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, env)) if !name.is_empty() && !env.is_empty() => {
            Ok((name.to_string(), env.to_string()))
        }
        _ => Err(format!("expected NAME=ENV_VAR, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_declarations_split_on_first_equals() {
        assert_eq!(
            parse_env_declaration("token=API_TOKEN").unwrap(),
            ("token".to_string(), "API_TOKEN".to_string())
        );
        assert!(parse_env_declaration("token").is_err());
        assert!(parse_env_declaration("=API_TOKEN").is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args = JsonxArgs::try_parse_from([
            "jsonx", "diff", "a.yaml", "b.json", "--seed", "9", "--env", "t=TOKEN",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.env, [("t".to_string(), "TOKEN".to_string())]);
        assert!(matches!(args.command, Command::Diff { show_context: false, .. }));
    }
}
