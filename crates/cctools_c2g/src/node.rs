use ahash::AHashMap;
use cctools_utils::AsciiDisplay;
use once_cell::sync::Lazy;
use std::fmt::{self, Display};

/// A script command keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Music,
    Map,
    Goto,
    Do,
    End,
    Edit,
    Chain,
    Chdir,
    Art,
    Wav,
    Game,
    Dlc,
}

impl Command {
    pub const ALL: [Command; 12] = [
        Command::Music,
        Command::Map,
        Command::Goto,
        Command::Do,
        Command::End,
        Command::Edit,
        Command::Chain,
        Command::Chdir,
        Command::Art,
        Command::Wav,
        Command::Game,
        Command::Dlc,
    ];

    /// Keyword of the command, as written in scripts.
    pub fn name(self) -> &'static str {
        match self {
            Command::Music => "music",
            Command::Map => "map",
            Command::Goto => "goto",
            Command::Do => "do",
            Command::End => "end",
            Command::Edit => "edit",
            Command::Chain => "chain",
            Command::Chdir => "chdir",
            Command::Art => "art",
            Command::Wav => "wav",
            Command::Game => "game",
            Command::Dlc => "dlc",
        }
    }

    /// Checks whether a string following the command becomes its parameter.
    pub fn takes_string(self) -> bool {
        matches!(
            self,
            Command::Music
                | Command::Map
                | Command::Chain
                | Command::Chdir
                | Command::Art
                | Command::Wav
                | Command::Game
                | Command::Dlc
        )
    }
}

/// What a word turns into when lexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Keyword {
    Command(Command),
    Script,
}

static KEYWORDS: Lazy<AHashMap<&'static str, Keyword>> = Lazy::new(|| {
    let mut keywords: AHashMap<_, _> = Command::ALL
        .iter()
        .map(|&command| (command.name(), Keyword::Command(command)))
        .collect();
    keywords.insert("script", Keyword::Script);
    keywords
});

/// Looks up a keyword, ignoring ASCII case. `main` is deliberately absent, so it's treated like
/// any other identifier.
pub(crate) fn keyword(word: &str) -> Option<Keyword> {
    KEYWORDS.get(word.to_ascii_lowercase().as_str()).copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Assign,
    Equal,
    NotEqual,
    Multiply,
    Divide,
    Add,
    Subtract,
    Modulo,
    Xor,
    BitAnd,
    LogicalAnd,
    BitOr,
    LogicalOr,
}

impl Operator {
    /// Two character tokens come first, so they win over their one character prefixes.
    const TOKENS: [(&'static str, Operator); 17] = [
        ("<=", Operator::LessEqual),
        (">=", Operator::GreaterEqual),
        ("==", Operator::Equal),
        ("!=", Operator::NotEqual),
        ("&&", Operator::LogicalAnd),
        ("||", Operator::LogicalOr),
        ("<", Operator::Less),
        (">", Operator::Greater),
        ("=", Operator::Assign),
        ("*", Operator::Multiply),
        ("/", Operator::Divide),
        ("+", Operator::Add),
        ("-", Operator::Subtract),
        ("%", Operator::Modulo),
        ("^", Operator::Xor),
        ("&", Operator::BitAnd),
        ("|", Operator::BitOr),
    ];

    /// Matches an operator token at the start of the input. Returns the operator and the
    /// length of its token.
    pub fn match_token(input: &[u8]) -> Option<(Operator, usize)> {
        Self::TOKENS
            .iter()
            .find(|(token, _)| input.starts_with(token.as_bytes()))
            .map(|&(token, op)| (op, token.len()))
    }

    pub fn token(self) -> &'static str {
        Self::TOKENS
            .iter()
            .find(|(_, op)| *op == self)
            .map(|(token, _)| *token)
            .unwrap_or("?")
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A parsed script element, along with the line it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// 1-based line number.
    pub line: usize,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Unparsable rest of a line.
    Junk(Vec<u8>),
    Identifier(String),
    /// An operator applied to the two nodes preceding it. Operand 0 is the one right before
    /// the operator, so `a b -` computes `b - a`.
    Operator {
        op: Operator,
        operands: Box<[Node; 2]>,
    },
    Number(u32),
    String(String),
    Label(String),
    Command {
        command: Command,
        param: Option<Box<Node>>,
    },
    /// A `script` block, with the lines collected into it.
    Script(Vec<Node>),
}

impl Node {
    pub fn new(line: usize, kind: NodeKind) -> Self {
        Self { line, kind }
    }

    /// Returns the text of a string node.
    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::String(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Returns the string parameter of a command node, if it is the given command.
    pub fn string_param(&self, expected: Command) -> Option<&str> {
        match &self.kind {
            NodeKind::Command {
                command,
                param: Some(param),
            } if *command == expected => param.as_str(),
            _ => None,
        }
    }
}

/// Renders nodes as S-expressions, e.g. `(= level (+ 1 level))`.
impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Junk(bytes) => write!(f, "<junk {}>", AsciiDisplay(bytes)),
            NodeKind::Identifier(name) => f.write_str(name),
            NodeKind::Operator { op, operands } => {
                write!(f, "({op} {} {})", operands[0], operands[1])
            }
            NodeKind::Number(value) => write!(f, "{value}"),
            NodeKind::String(text) => write!(f, "{text:?}"),
            NodeKind::Label(name) => write!(f, "#{name}"),
            NodeKind::Command { command, param } => match param {
                Some(param) => write!(f, "{} {param}", command.name()),
                None => f.write_str(command.name()),
            },
            NodeKind::Script(lines) => {
                f.write_str("script")?;
                for line in lines {
                    write!(f, " {line}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_ignore_case() {
        assert_eq!(keyword("MAP"), Some(Keyword::Command(Command::Map)));
        assert_eq!(keyword("Game"), Some(Keyword::Command(Command::Game)));
        assert_eq!(keyword("sCrIpT"), Some(Keyword::Script));
        assert_eq!(keyword("main"), None);
        assert_eq!(keyword("level"), None);

        for command in Command::ALL {
            assert_eq!(keyword(command.name()), Some(Keyword::Command(command)));
        }
    }

    #[test]
    fn longest_operator_wins() {
        assert_eq!(Operator::match_token(b"<= 3"), Some((Operator::LessEqual, 2)));
        assert_eq!(Operator::match_token(b"< 3"), Some((Operator::Less, 1)));
        assert_eq!(Operator::match_token(b"&&"), Some((Operator::LogicalAnd, 2)));
        assert_eq!(Operator::match_token(b"&|"), Some((Operator::BitAnd, 1)));
        assert_eq!(Operator::match_token(b"=="), Some((Operator::Equal, 2)));
        assert_eq!(Operator::match_token(b"=<"), Some((Operator::Assign, 1)));
        assert_eq!(Operator::match_token(b"!"), None);
        assert_eq!(Operator::match_token(b"!="), Some((Operator::NotEqual, 2)));
        assert_eq!(Operator::match_token(b"@"), None);
    }

    #[test]
    fn display() {
        let sum = Node::new(
            1,
            NodeKind::Operator {
                op: Operator::Add,
                operands: Box::new([
                    Node::new(1, NodeKind::Number(3)),
                    Node::new(1, NodeKind::Identifier("level".into())),
                ]),
            },
        );
        assert_eq!(sum.to_string(), "(+ 3 level)");

        let map = Node::new(
            2,
            NodeKind::Command {
                command: Command::Map,
                param: Some(Box::new(Node::new(2, NodeKind::String("a.c2m".into())))),
            },
        );
        assert_eq!(map.to_string(), "map \"a.c2m\"");
        assert_eq!(map.string_param(Command::Map), Some("a.c2m"));
        assert_eq!(map.string_param(Command::Game), None);
    }
}
