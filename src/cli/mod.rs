//! The jsonx Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions. Fixtures are read as YAML, which also accepts
//! JSON documents.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::process;

use clap::Parser;
use miette::{IntoDiagnostic, WrapErr};
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Command, JsonxArgs};
use crate::context::Context;
use crate::diff::compare;
use crate::eval::eval;
use crate::parser::parse;

pub mod args;
pub mod output;

/// Exit code when a comparison found differences.
pub const EXIT_DIFFERENCES: i32 = 1;
/// Exit code for any error.
pub const EXIT_FAILURE: i32 = 2;

/// The main entry point for the CLI.
pub fn run() {
    let args = JsonxArgs::parse();
    init_tracing(args.debug);

    match execute(&args) {
        Ok(code) => process::exit(code),
        Err(report) => {
            eprintln!("{report:?}");
            process::exit(EXIT_FAILURE);
        }
    }
}

fn init_tracing(debug: bool) {
    let level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn execute(args: &JsonxArgs) -> miette::Result<i32> {
    // Dispatch to the appropriate subcommand handler.
    match &args.command {
        Command::Eval { file } => handle_eval(args, file),
        Command::Diff {
            expected,
            actual,
            show_context,
        } => handle_diff(args, expected, actual, *show_context),
        Command::Generators => {
            output::print_generators(&mut output::stdout()).into_diagnostic()?;
            Ok(0)
        }
    }
}

/// Builds the context from the global flags.
fn build_context(args: &JsonxArgs) -> miette::Result<Context> {
    let mut context = match args.seed {
        Some(seed) => Context::with_seed(seed),
        None => Context::new(),
    };

    if let Some(path) = &args.values {
        let values: BTreeMap<String, serde_json::Value> = read_document(path)?;
        context.seed_values(values);
    }
    context.seed_from_environment(
        args.env
            .iter()
            .map(|(name, env)| (name.as_str(), env.as_str())),
    );
    Ok(context)
}

fn read_document<T: serde::de::DeserializeOwned>(path: &Path) -> miette::Result<T> {
    let source = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    serde_yaml::from_str(&source)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to decode {}", path.display()))
}

/// Handles the `eval` subcommand.
fn handle_eval(args: &JsonxArgs, file: &Path) -> miette::Result<i32> {
    let mut context = build_context(args)?;
    let document: serde_yaml::Value = read_document(file)?;
    let node = parse(&document)?;
    let value = eval(&node, &mut context)?;
    output::print_value(&mut output::stdout(), &value).into_diagnostic()?;
    Ok(0)
}

/// Handles the `diff` subcommand.
fn handle_diff(
    args: &JsonxArgs,
    expected: &Path,
    actual: &Path,
    show_context: bool,
) -> miette::Result<i32> {
    let mut context = build_context(args)?;
    let expected: serde_yaml::Value = read_document(expected)?;
    let actual: serde_yaml::Value = read_document(actual)?;
    let differences = compare(&expected, &actual, &mut context)?;

    let mut out = output::stdout();
    output::print_differences(&mut out, &differences).into_diagnostic()?;
    if show_context {
        output::print_bindings(&mut out, &context).into_diagnostic()?;
    }

    Ok(if differences.is_empty() { 0 } else { EXIT_DIFFERENCES })
}
