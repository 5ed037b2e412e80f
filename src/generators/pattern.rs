//! Samples strings from the language of a regular expression.
//!
//! The pattern is parsed into a `regex_syntax::hir::Hir` and walked, picking a
//! random branch, repetition count or class member at every node.

use rand::{Rng, RngCore};
use regex_syntax::hir::{Class, ClassUnicode, ClassUnicodeRange, Hir, HirKind};

use crate::errors::GeneratorError;

/// Extra repetitions allowed past the minimum of an unbounded repetition.
const UNBOUNDED_EXTRA: u32 = 10;

/// Classes wider than this are narrowed to printable ASCII before sampling.
const WIDE_CLASS: u32 = 0x7f;

pub(super) fn sample(pattern: &str, rng: &mut dyn RngCore) -> Result<String, GeneratorError> {
    let hir = regex_syntax::Parser::new()
        .parse(pattern)
        .map_err(|source| GeneratorError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
    let mut out = String::new();
    walk(&hir, rng, &mut out);
    Ok(out)
}

fn walk(hir: &Hir, rng: &mut dyn RngCore, out: &mut String) {
    match hir.kind() {
        HirKind::Empty | HirKind::Look(_) => {}
        HirKind::Literal(literal) => out.push_str(&String::from_utf8_lossy(&literal.0)),
        HirKind::Class(Class::Unicode(class)) => {
            if let Some(c) = pick_char(class, rng) {
                out.push(c);
            }
        }
        HirKind::Class(Class::Bytes(class)) => {
            let ranges = class.ranges();
            let total: u32 = ranges.iter().map(|r| u32::from(r.end() - r.start()) + 1).sum();
            if total > 0 {
                let mut offset = rng.gen_range(0..total);
                for range in ranges {
                    let width = u32::from(range.end() - range.start()) + 1;
                    if offset < width {
                        out.push(char::from(range.start() + offset as u8));
                        break;
                    }
                    offset -= width;
                }
            }
        }
        HirKind::Repetition(repetition) => {
            let max = repetition
                .max
                .unwrap_or_else(|| repetition.min.saturating_add(UNBOUNDED_EXTRA));
            let count = rng.gen_range(repetition.min..=max.max(repetition.min));
            for _ in 0..count {
                walk(&repetition.sub, rng, out);
            }
        }
        HirKind::Capture(capture) => walk(&capture.sub, rng, out),
        HirKind::Concat(parts) => {
            for part in parts {
                walk(part, rng, out);
            }
        }
        HirKind::Alternation(branches) => {
            if !branches.is_empty() {
                let branch = &branches[rng.gen_range(0..branches.len())];
                walk(branch, rng, out);
            }
        }
    }
}

fn class_width(class: &ClassUnicode) -> u32 {
    class
        .ranges()
        .iter()
        .map(|r| u32::from(r.end()) - u32::from(r.start()) + 1)
        .sum()
}

fn pick_char(class: &ClassUnicode, rng: &mut dyn RngCore) -> Option<char> {
    let mut class = class.clone();
    if class_width(&class) > WIDE_CLASS {
        let mut printable = ClassUnicode::new([ClassUnicodeRange::new(' ', '~')]);
        printable.intersect(&class);
        if !printable.ranges().is_empty() {
            class = printable;
        }
    }

    let total = class_width(&class);
    if total == 0 {
        return None;
    }
    let mut offset = rng.gen_range(0..total);
    for range in class.ranges() {
        let start = u32::from(range.start());
        let width = u32::from(range.end()) - start + 1;
        if offset < width {
            return char::from_u32(start + offset).or(Some(range.start()));
        }
        offset -= width;
    }
    None
}
