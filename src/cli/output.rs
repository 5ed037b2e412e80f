//! Handles all user-facing output for the CLI.
//!
//! Differences are printed one per line with the path highlighted; string
//! mismatches get an extra character-level changeset so small edits stand out.

use std::io::{self, IsTerminal, Write};

use difference::Changeset;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::context::Context;
use crate::diff::{Difference, Differences};
use crate::generators::GeneratorKind;
use crate::node::Node;

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

/// Stdout, coloured only when attached to a terminal.
pub fn stdout() -> StandardStream {
    let choice = if io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

/// Prints an evaluated node as pretty JSON.
pub fn print_value(out: &mut impl Write, node: &Node) -> io::Result<()> {
    let json = serde_json::to_string_pretty(node).map_err(io::Error::other)?;
    writeln!(out, "{json}")
}

/// Prints every difference, or a success line when there are none.
pub fn print_differences(out: &mut impl WriteColor, differences: &Differences) -> io::Result<()> {
    if differences.is_empty() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        writeln!(out, "no differences")?;
        return out.reset();
    }

    for difference in differences {
        print_difference(out, difference)?;
    }

    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    writeln!(out, "{} difference(s)", differences.len())?;
    out.reset()
}

/// Prints the context bindings in name order.
pub fn print_bindings(out: &mut impl WriteColor, context: &Context) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
    writeln!(out, "--- context ---")?;
    out.reset()?;
    for (name, value) in context.bindings() {
        writeln!(out, "{name} = {value}")?;
    }
    Ok(())
}

pub fn print_generators(out: &mut impl WriteColor) -> io::Result<()> {
    for kind in GeneratorKind::ALL {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(out, "{:<20}", kind.name())?;
        out.reset()?;
        writeln!(out, " {}", kind.summary())?;
    }
    Ok(())
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn print_difference(out: &mut impl WriteColor, difference: &Difference) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
    write!(out, "{}", difference.display_path())?;
    out.reset()?;
    writeln!(
        out,
        ": {}. Expected: {}, Actual: {}",
        difference.kind, difference.expected, difference.actual
    )?;

    if difference.expected_raw != difference.expected {
        writeln!(out, "  written as {}", difference.expected_raw)?;
    }
    if let (Node::String(expected), Node::String(actual)) =
        (&difference.expected, &difference.actual)
    {
        let changeset = Changeset::new(expected, actual, "");
        write!(out, "  ")?;
        print_changeset(out, &changeset.diffs)?;
        writeln!(out)?;
    }
    Ok(())
}

fn print_changeset(out: &mut impl WriteColor, diffs: &[difference::Difference]) -> io::Result<()> {
    for diff in diffs {
        match diff {
            difference::Difference::Same(x) => {
                out.reset()?;
                write!(out, "{x}")?;
            }
            difference::Difference::Add(x) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_underline(true))?;
                write!(out, "{x}")?;
            }
            difference::Difference::Rem(x) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
                write!(out, "{x}")?;
            }
        }
    }
    out.reset()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compare;
    use serde_json::json;
    use termcolor::NoColor;

    fn render(differences: &Differences) -> String {
        let mut out = NoColor::new(Vec::new());
        print_differences(&mut out, differences).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn no_differences_prints_success() {
        let mut ctx = Context::with_seed(1);
        let diffs = compare(&json!({"a": 1}), &json!({"a": 1}), &mut ctx).unwrap();
        assert_eq!(render(&diffs), "no differences\n");
    }

    #[test]
    fn string_mismatch_prints_changeset() {
        let mut ctx = Context::with_seed(1);
        let diffs =
            compare(&json!({"name": "Holden"}), &json!({"name": "Holdem"}), &mut ctx).unwrap();
        let text = render(&diffs);
        assert!(text.starts_with("name: different. Expected: Holden, Actual: Holdem\n"));
        assert_eq!(text.lines().nth(1).map(str::trim), Some("Holdenm"));
        assert!(text.ends_with("1 difference(s)\n"));
    }

    #[test]
    fn expression_source_is_shown() {
        let mut ctx = Context::with_seed(1);
        ctx.set("n", 1i64);
        let diffs = compare(&json!({"n": "$n"}), &json!({"n": 2}), &mut ctx).unwrap();
        assert!(render(&diffs).contains("  written as ${n}\n"));
    }
}
