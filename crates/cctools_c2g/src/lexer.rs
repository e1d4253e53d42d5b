//! Script tokenizer.
//!
//! Scripts are lexed line by line into a flat list of nodes. Operators are applied right away
//! to the two nodes preceding them, so expressions are effectively written in postfix:
//! `5 3 +` becomes `(+ 3 5)`. There is no precedence, `2 3 + 4 *` is `(* 4 (+ 3 2))`.

use crate::{
    node::{keyword, Keyword},
    Node, NodeKind, Operator,
};
use anyhow::Context;
use cctools_utils::{AnyResult, AnyhowResultExt, AsciiDisplay};
use log::debug;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Whether identifiers and strings following a `script` block are collected as its lines,
    /// instead of standing on their own.
    pub collect_script_lines: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            collect_script_lines: true,
        }
    }
}

/// A parsed `.c2g` game script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameScript {
    pub nodes: Vec<Node>,
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Scripts are UTF-8, invalid sequences become `U+FFFD`.
fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

impl GameScript {
    /// Reads and parses a script file with default options.
    pub fn read(path: impl AsRef<Path>) -> AnyResult<Self> {
        Self::read_with(path, ParseOptions::default())
    }

    pub fn read_with(path: impl AsRef<Path>, options: ParseOptions) -> AnyResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).otherwise(format!("couldn't open {}", path.display()))?;
        Self::parse(&mut BufReader::new(file), options)
            .with_context(|| format!("couldn't read {}", path.display()))
    }

    /// Parses a script from a buffered reader. Only I/O errors can make this fail, anything
    /// unparsable ends up in [`NodeKind::Junk`] nodes.
    pub fn parse<R: BufRead>(r: &mut R, options: ParseOptions) -> AnyResult<Self> {
        let mut lexer = Lexer {
            nodes: Vec::new(),
            options,
        };

        let mut buffer = Vec::new();
        let mut line_number = 0;
        loop {
            buffer.clear();
            if r.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            line_number += 1;

            while let Some(b'\r' | b'\n') = buffer.last() {
                buffer.pop();
            }
            lexer.lex_line(&buffer, line_number);
        }

        Ok(Self {
            nodes: lexer.nodes,
        })
    }

    /// Parses a script held in memory, with default options.
    pub fn parse_str(text: &str) -> Self {
        let mut lexer = Lexer {
            nodes: Vec::new(),
            options: ParseOptions::default(),
        };
        for (index, line) in text.lines().enumerate() {
            lexer.lex_line(line.as_bytes(), index + 1);
        }
        Self {
            nodes: lexer.nodes,
        }
    }

    /// Returns all junk nodes, which indicate errors in the script.
    pub fn junk(&self) -> impl Iterator<Item = &Node> {
        self.nodes
            .iter()
            .filter(|node| matches!(node.kind, NodeKind::Junk(_)))
    }
}

struct Lexer {
    nodes: Vec<Node>,
    options: ParseOptions,
}

impl Lexer {
    fn lex_line(&mut self, line: &[u8], line_number: usize) {
        let mut column = 0;

        loop {
            while column < line.len() && line[column].is_ascii_whitespace() {
                column += 1;
            }
            let rest = &line[column..];
            let Some(&first) = rest.first() else {
                break;
            };

            if first == b';' || rest.starts_with(b"//") {
                break;
            } else if first.is_ascii_digit() {
                let length = rest.iter().take_while(|b| b.is_ascii_digit()).count();
                let value = rest[..length].iter().fold(0u32, |value, digit| {
                    value.saturating_mul(10).saturating_add((digit - b'0') as u32)
                });
                self.push(line_number, NodeKind::Number(value));
                column += length;
            } else if first == b'"' {
                let content = &rest[1..];
                let length = content
                    .iter()
                    .position(|&b| b == b'"')
                    .unwrap_or(content.len());
                let text = decode(&content[..length]);
                self.push_string(Node::new(line_number, NodeKind::String(text)));
                // Skip the closing quote too, unless the string ran to the end of the line
                column += (length + 2).min(rest.len());
            } else if first == b'#' {
                let length = rest[1..].iter().take_while(|&&b| is_word_byte(b)).count();
                let name = decode(&rest[1..1 + length]);
                self.push(line_number, NodeKind::Label(name));
                column += 1 + length;
            } else if first.is_ascii_alphabetic() || first == b'_' {
                let length = rest.iter().take_while(|&&b| is_word_byte(b)).count();
                let word = decode(&rest[..length]);
                self.push_word(line_number, word);
                column += length;
            } else {
                match Operator::match_token(rest) {
                    Some((op, length)) if self.nodes.len() >= 2 => {
                        self.push_operator(line_number, op);
                        column += length;
                    }
                    _ => {
                        debug!("Junk at line {line_number}: {}", AsciiDisplay(rest));
                        self.push(line_number, NodeKind::Junk(rest.to_vec()));
                        break;
                    }
                }
            }
        }
    }

    fn push(&mut self, line: usize, kind: NodeKind) {
        self.nodes.push(Node::new(line, kind));
    }

    /// Returns the open script block, if the last node is one and lines are being collected.
    fn open_script(&mut self) -> Option<&mut Vec<Node>> {
        if !self.options.collect_script_lines {
            return None;
        }
        match self.nodes.last_mut() {
            Some(Node {
                kind: NodeKind::Script(lines),
                ..
            }) => Some(lines),
            _ => None,
        }
    }

    fn push_string(&mut self, string: Node) {
        if let Some(lines) = self.open_script() {
            lines.push(string);
            return;
        }

        if let Some(Node {
            kind: NodeKind::Command { command, param },
            ..
        }) = self.nodes.last_mut()
        {
            if command.takes_string() && param.is_none() {
                *param = Some(Box::new(string));
                return;
            }
        }

        self.nodes.push(string);
    }

    fn push_word(&mut self, line: usize, word: String) {
        let kind = match keyword(&word) {
            Some(Keyword::Command(command)) => NodeKind::Command {
                command,
                param: None,
            },
            Some(Keyword::Script) => NodeKind::Script(Vec::new()),
            None => {
                let identifier = Node::new(line, NodeKind::Identifier(word));
                match self.open_script() {
                    Some(lines) => lines.push(identifier),
                    None => self.nodes.push(identifier),
                }
                return;
            }
        };
        self.push(line, kind);
    }

    /// Combines the last two nodes. Operand 0 is the most recently pushed one.
    fn push_operator(&mut self, line: usize, op: Operator) {
        let (Some(first), Some(second)) = (self.nodes.pop(), self.nodes.pop()) else {
            return;
        };
        self.push(
            line,
            NodeKind::Operator {
                op,
                operands: Box::new([first, second]),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Command;

    fn number(line: usize, value: u32) -> Node {
        Node::new(line, NodeKind::Number(value))
    }

    fn string(line: usize, text: &str) -> Node {
        Node::new(line, NodeKind::String(text.into()))
    }

    fn identifier(line: usize, name: &str) -> Node {
        Node::new(line, NodeKind::Identifier(name.into()))
    }

    fn rendered(script: &GameScript) -> Vec<String> {
        script.nodes.iter().map(|node| node.to_string()).collect()
    }

    #[test]
    fn commands_take_strings() {
        let script = GameScript::parse_str(
            "game \"Demo\"\n\
             MAP \"l1.c2m\" \"extra\"\n\
             music \"a.mp3\"\n\
             goto \"nowhere\"\n",
        );
        assert_eq!(
            rendered(&script),
            [
                "game \"Demo\"",
                "map \"l1.c2m\"",
                "\"extra\"",
                "music \"a.mp3\"",
                "goto",
                "\"nowhere\"",
            ]
        );
        assert_eq!(script.nodes[1].line, 2);
        assert_eq!(script.nodes[2].line, 2);
    }

    #[test]
    fn operators_reduce_immediately() {
        let script = GameScript::parse_str("5 3 +");
        assert_eq!(
            script.nodes,
            [Node::new(
                1,
                NodeKind::Operator {
                    op: Operator::Add,
                    operands: Box::new([number(1, 3), number(1, 5)]),
                }
            )]
        );

        let script = GameScript::parse_str("2 3 + 4 *");
        assert_eq!(rendered(&script), ["(* 4 (+ 3 2))"]);

        // Expressions can span lines
        let script = GameScript::parse_str("10\nlevel\n=");
        assert_eq!(rendered(&script), ["(= level 10)"]);
        assert_eq!(script.nodes[0].line, 3);
    }

    #[test]
    fn infix_is_junk() {
        let script = GameScript::parse_str("2 + 3 * 4");
        assert_eq!(
            script.nodes,
            [
                number(1, 2),
                Node::new(1, NodeKind::Junk(b"+ 3 * 4".to_vec()))
            ]
        );
        assert_eq!(script.junk().count(), 1);
    }

    #[test]
    fn two_character_operators() {
        let script = GameScript::parse_str("a b <= c d == e f && g h || i j != k l >=");
        assert_eq!(
            rendered(&script),
            [
                "(<= b a)",
                "(== d c)",
                "(&& f e)",
                "(|| h g)",
                "(!= j i)",
                "(>= l k)",
            ]
        );

        let script = GameScript::parse_str("1 2 ! 3");
        assert_eq!(rendered(&script), ["1", "2", "<junk ! 3>"]);
    }

    #[test]
    fn comments_and_labels() {
        let script = GameScript::parse_str(
            "; a comment\n\
             #start // jump target\n\
             \t  goto #start ; again\n\
             #\n",
        );
        assert_eq!(
            rendered(&script),
            ["#start", "goto", "#start", "#"]
        );
        assert_eq!(script.nodes[1].line, 3);
    }

    #[test]
    fn numbers_saturate() {
        let script = GameScript::parse_str("99999999999 42abc");
        assert_eq!(
            script.nodes,
            [number(1, u32::MAX), number(1, 42), identifier(1, "abc")]
        );
    }

    #[test]
    fn unterminated_string_runs_to_end_of_line() {
        let script = GameScript::parse_str("map \"open ended\nmap \"\"");
        assert_eq!(rendered(&script), ["map \"open ended\"", "map \"\""]);
    }

    #[test]
    fn script_blocks_collect_lines() {
        let text = "script\n\"Hello\" some_line another\n7\n";

        let script = GameScript::parse_str(text);
        assert_eq!(
            script.nodes,
            [
                Node::new(
                    1,
                    NodeKind::Script(vec![
                        string(2, "Hello"),
                        identifier(2, "some_line"),
                        identifier(2, "another"),
                    ])
                ),
                number(3, 7),
            ]
        );

        let options = ParseOptions {
            collect_script_lines: false,
        };
        let script = GameScript::parse(&mut text.as_bytes(), options).unwrap();
        assert_eq!(
            script.nodes,
            [
                Node::new(1, NodeKind::Script(Vec::new())),
                string(2, "Hello"),
                identifier(2, "some_line"),
                identifier(2, "another"),
                number(3, 7),
            ]
        );
    }

    #[test]
    fn main_is_an_identifier() {
        let script = GameScript::parse_str("Main");
        assert_eq!(script.nodes, [identifier(1, "Main")]);
    }

    #[test]
    fn line_endings() {
        let mut input: &[u8] = b"map \"a.c2m\"\r\n\r\n  \nmap \"b.c2m\"";
        let script = GameScript::parse(&mut input, ParseOptions::default()).unwrap();
        assert_eq!(script.nodes.len(), 2);
        assert_eq!(script.nodes[0].string_param(Command::Map), Some("a.c2m"));
        assert_eq!(script.nodes[1].string_param(Command::Map), Some("b.c2m"));
        assert_eq!(script.nodes[1].line, 4);
    }

    #[test]
    fn text_is_utf8() {
        let mut input = "game \"Caf\u{e9} \u{2615}\"\nmap \"caf\u{e9}.c2m\"".as_bytes();
        let script = GameScript::parse(&mut input, ParseOptions::default()).unwrap();
        assert_eq!(
            script.nodes[0].string_param(Command::Game),
            Some("Caf\u{e9} \u{2615}")
        );
        assert_eq!(script.nodes[1].string_param(Command::Map), Some("caf\u{e9}.c2m"));

        // Stray bytes don't stop the line
        let mut input: &[u8] = b"map \"b\xE9.c2m\" 7";
        let script = GameScript::parse(&mut input, ParseOptions::default()).unwrap();
        assert_eq!(
            script.nodes[0].string_param(Command::Map),
            Some("b\u{fffd}.c2m")
        );
        assert_eq!(script.nodes[1], number(1, 7));
    }

    #[test]
    fn read_errors_name_the_file() {
        // Opening a directory works, reading from it doesn't
        let dir = tempfile::tempdir().unwrap();
        let error = GameScript::read(dir.path()).unwrap_err();
        let message = format!("{error:#}");
        assert!(
            message.starts_with(&format!("couldn't read {}", dir.path().display())),
            "{message}"
        );
        assert!(error.downcast_ref::<std::io::Error>().is_some());
    }
}
