//! Scanner for the placeholder micro-grammar inside string values.
//!
//! ```text
//! $$                      literal '$'
//! $name                   variable expansion, name is [A-Za-z0-9_]+
//! ${name}                 variable expansion
//! ${bind:kind}            generator, optional bind name
//! ${bind:kind:config}     generator with a raw config (up to '}')
//! ${bind:kind:/pattern/}  generator with a delimited config, '\' escapes
//! $(name)                 extractor
//! ```
//!
//! Anything between placeholders is kept as literal text. Positions are byte
//! offsets; every delimiter is ASCII so slicing at them is always on a char
//! boundary.

use miette::SourceSpan;

use crate::errors::ParseError;
use crate::generators::GeneratorKind;
use crate::node::Node;

const PLACEHOLDER_START: u8 = b'$';
const OPTIONS_SEPARATOR: u8 = b':';
const EXPANSION_START: u8 = b'{';
const EXPANSION_END: u8 = b'}';
const EXTRACTOR_START: u8 = b'(';
const EXTRACTOR_END: u8 = b')';
const PATTERN_DELIMITER: u8 = b'/';
const PATTERN_ESCAPE: u8 = b'\\';

/// Scans `source` into a node: a plain string, a single placeholder, or a
/// concatenation of fragments in source order.
pub(crate) fn parse_expression(source: &str) -> Result<Node, ParseError> {
    let mut cursor = Cursor::new(source);
    let mut fragments = Vec::new();

    while !cursor.at_end() {
        let fragment = if cursor.peek() == Some(PLACEHOLDER_START) {
            cursor.placeholder()?
        } else {
            cursor.literal()
        };
        fragments.push(fragment);
    }

    Ok(Node::concatenation(fragments))
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

struct Cursor<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
        }
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.source[start..end]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Index of the first byte at or after `from` accepted by `stop`.
    fn find(&self, from: usize, stop: impl Fn(u8) -> bool) -> Option<usize> {
        self.bytes
            .get(from..)?
            .iter()
            .position(|&b| stop(b))
            .map(|offset| from + offset)
    }

    fn literal(&mut self) -> Node {
        let start = self.pos;
        let end = self
            .find(start + 1, |b| b == PLACEHOLDER_START)
            .unwrap_or(self.bytes.len());
        self.pos = end;
        Node::String(self.slice(start, end).to_string())
    }

    fn placeholder(&mut self) -> Result<Node, ParseError> {
        let start = self.pos;
        self.pos += 1;
        match self.peek() {
            None => Err(self.unexpected("a placeholder after '$'", start, start + 1)),
            Some(PLACEHOLDER_START) => {
                self.pos += 1;
                Ok(Node::String("$".to_string()))
            }
            Some(EXPANSION_START) => self.braced(start),
            Some(EXTRACTOR_START) => self.extractor(start),
            Some(_) => self.bare_variable(),
        }
    }

    fn bare_variable(&mut self) -> Result<Node, ParseError> {
        let start = self.pos;
        let end = self
            .find(start, |b| !is_name_char(b))
            .unwrap_or(self.bytes.len());
        if end == start {
            return Err(self.unexpected("a variable name", start, start + 1));
        }
        self.pos = end;
        Ok(Node::VarExpansion(self.slice(start, end).to_string()))
    }

    fn braced(&mut self, start: usize) -> Result<Node, ParseError> {
        let name_start = self.pos + 1;
        let end = self
            .find(name_start, |b| b == EXPANSION_END || b == OPTIONS_SEPARATOR)
            .ok_or_else(|| self.unterminated("'${'", start))?;
        let name = self.slice(name_start, end);

        if self.bytes[end] == OPTIONS_SEPARATOR {
            return self.generator(name, end + 1, start);
        }
        if name.is_empty() {
            return Err(self.unexpected("a variable name", name_start, end + 1));
        }
        self.pos = end + 1;
        Ok(Node::VarExpansion(name.to_string()))
    }

    fn generator(
        &mut self,
        bind: &'a str,
        kind_start: usize,
        start: usize,
    ) -> Result<Node, ParseError> {
        let kind_end = self
            .find(kind_start, |b| b == EXPANSION_END || b == OPTIONS_SEPARATOR)
            .ok_or_else(|| self.unterminated("'${'", start))?;
        let kind_name = self.slice(kind_start, kind_end);
        let kind = GeneratorKind::from_name(kind_name).ok_or_else(|| ParseError::UnknownGenerator {
            name: kind_name.to_string(),
            expression: self.source.to_string(),
            span: SourceSpan::from(kind_start..kind_end),
            position: kind_start,
        })?;

        let (config, close) = if self.bytes[kind_end] == OPTIONS_SEPARATOR {
            self.generator_config(kind_end + 1, start)?
        } else {
            (String::new(), kind_end)
        };

        self.pos = close + 1;
        Ok(Node::RandomValue {
            bind: (!bind.is_empty()).then(|| bind.to_string()),
            kind,
            config,
        })
    }

    /// Returns the config text and the index of the closing '}'.
    fn generator_config(&self, from: usize, start: usize) -> Result<(String, usize), ParseError> {
        if self.bytes.get(from) == Some(&PATTERN_DELIMITER) {
            let (pattern, after) = self.pattern(from)?;
            return match self.bytes.get(after) {
                Some(&EXPANSION_END) => Ok((pattern, after)),
                Some(_) => Err(self.unexpected("'}' after the pattern", after, after + 1)),
                None => Err(self.unterminated("'${'", start)),
            };
        }

        let close = self
            .find(from, |b| b == EXPANSION_END)
            .ok_or_else(|| self.unterminated("'${'", start))?;
        Ok((self.slice(from, close).to_string(), close))
    }

    /// Scans `/.../` starting at the opening delimiter. Backslash escapes the
    /// next byte and is kept in the returned pattern.
    fn pattern(&self, open: usize) -> Result<(String, usize), ParseError> {
        let mut end = open + 1;
        while end < self.bytes.len() && self.bytes[end] != PATTERN_DELIMITER {
            if self.bytes[end] == PATTERN_ESCAPE && end + 1 < self.bytes.len() {
                end += 1;
            }
            end += 1;
        }
        if end >= self.bytes.len() {
            return Err(self.unterminated("pattern", open));
        }
        Ok((self.slice(open + 1, end).to_string(), end + 1))
    }

    fn extractor(&mut self, start: usize) -> Result<Node, ParseError> {
        let name_start = self.pos + 1;
        let end = self
            .find(name_start, |b| b == EXTRACTOR_END)
            .ok_or_else(|| self.unterminated("'$('", start))?;
        if end == name_start {
            return Err(self.unexpected("a variable name", name_start, end + 1));
        }
        self.pos = end + 1;
        Ok(Node::Extractor(self.slice(name_start, end).to_string()))
    }

    fn unterminated(&self, construct: &'static str, start: usize) -> ParseError {
        ParseError::Unterminated {
            construct,
            expression: self.source.to_string(),
            span: SourceSpan::from(start..self.bytes.len()),
            position: start,
        }
    }

    fn unexpected(&self, expected: &'static str, start: usize, end: usize) -> ParseError {
        let end = end.min(self.bytes.len()).max(start);
        ParseError::Unexpected {
            expected,
            expression: self.source.to_string(),
            span: SourceSpan::from(start..end),
            position: start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Node {
        Node::VarExpansion(name.to_string())
    }

    fn random(kind: GeneratorKind, config: &str) -> Node {
        Node::RandomValue {
            bind: None,
            kind,
            config: config.to_string(),
        }
    }

    #[test]
    fn plain_text_is_a_single_string() {
        assert_eq!(parse_expression("hello").unwrap(), Node::from("hello"));
        assert_eq!(parse_expression("").unwrap(), Node::from(""));
    }

    #[test]
    fn escaped_dollars() {
        assert_eq!(parse_expression("$$").unwrap(), Node::from("$"));
        assert_eq!(
            parse_expression("$$$$").unwrap(),
            Node::Concatenation(vec![Node::from("$"), Node::from("$")])
        );
        assert_eq!(
            parse_expression("$$$someVar").unwrap(),
            Node::Concatenation(vec![Node::from("$"), var("someVar")])
        );
        assert_eq!(
            parse_expression("$$${someVar}").unwrap(),
            Node::Concatenation(vec![Node::from("$"), var("someVar")])
        );
    }

    #[test]
    fn bare_and_braced_variables() {
        assert_eq!(parse_expression("$someVar").unwrap(), var("someVar"));
        assert_eq!(parse_expression("${someVar}").unwrap(), var("someVar"));
        assert_eq!(parse_expression("${some var!}").unwrap(), var("some var!"));
    }

    #[test]
    fn bare_variable_stops_at_first_non_name_char() {
        assert_eq!(
            parse_expression("The values is $someVar with an $intValue").unwrap(),
            Node::Concatenation(vec![
                Node::from("The values is "),
                var("someVar"),
                Node::from(" with an "),
                var("intValue"),
            ])
        );
        assert_eq!(
            parse_expression("$a.$b").unwrap(),
            Node::Concatenation(vec![var("a"), Node::from("."), var("b")])
        );
    }

    #[test]
    fn generators_with_and_without_config() {
        assert_eq!(parse_expression("${:random.name}").unwrap(), random(GeneratorKind::Name, ""));
        assert_eq!(
            parse_expression("${:random.name:10}").unwrap(),
            random(GeneratorKind::Name, "10")
        );
        assert_eq!(
            parse_expression("${:random.string:}").unwrap(),
            random(GeneratorKind::String, "")
        );
        assert_eq!(
            parse_expression("${:random.regex:/a+b*/}").unwrap(),
            random(GeneratorKind::Regex, "a+b*")
        );
    }

    #[test]
    fn pattern_config_keeps_escapes() {
        assert_eq!(
            parse_expression(r"${:random.regex:/a+\}*/}").unwrap(),
            random(GeneratorKind::Regex, r"a+\}*")
        );
        assert_eq!(
            parse_expression(r"${:random.regex:/a+[-\}]*/}").unwrap(),
            random(GeneratorKind::Regex, r"a+[-\}]*")
        );
        assert_eq!(
            parse_expression(r"${:random.regex:/a\/b/}").unwrap(),
            random(GeneratorKind::Regex, r"a\/b")
        );
    }

    #[test]
    fn generator_bind_name() {
        assert_eq!(
            parse_expression("${userId:random.string}").unwrap(),
            Node::RandomValue {
                bind: Some("userId".into()),
                kind: GeneratorKind::String,
                config: String::new(),
            }
        );
    }

    #[test]
    fn extractor() {
        assert_eq!(
            parse_expression("$(varToSet)").unwrap(),
            Node::Extractor("varToSet".into())
        );
        assert_eq!(
            parse_expression("id-$(id)").unwrap(),
            Node::Concatenation(vec![Node::from("id-"), Node::Extractor("id".into())])
        );
    }

    #[test]
    fn multibyte_text_around_placeholders() {
        assert_eq!(
            parse_expression("Morón $city ñ").unwrap(),
            Node::Concatenation(vec![Node::from("Morón "), var("city"), Node::from(" ñ")])
        );
    }

    #[test]
    fn unterminated_constructs() {
        for (source, position) in [
            ("${name", 0),
            ("abc ${:random.name", 4),
            ("${:random.regex:/abc}", 16),
            ("${:random.string:5", 0),
            ("$(name", 0),
        ] {
            let err = parse_expression(source).unwrap_err();
            assert!(
                matches!(err, ParseError::Unterminated { .. }),
                "{source}: {err:?}"
            );
            assert_eq!(err.position(), Some(position), "{source}");
        }
    }

    #[test]
    fn unknown_generator_is_a_parse_error() {
        let err = parse_expression("${x:random.unicorn}").unwrap_err();
        match err {
            ParseError::UnknownGenerator { name, position, .. } => {
                assert_eq!(name, "random.unicorn");
                assert_eq!(position, 4);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn malformed_placeholders() {
        for source in ["$", "cost: $", "$ 5", "${}", "$()", "${:random.regex:/a/x}"] {
            let err = parse_expression(source).unwrap_err();
            assert!(matches!(err, ParseError::Unexpected { .. }), "{source}: {err:?}");
        }
    }
}
