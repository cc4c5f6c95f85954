use serde::{Deserialize, Serialize};
use std::fmt;

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Original text of the token
    pub text: String,
    /// Line number where the token starts (1-indexed)
    pub line: usize,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
        }
    }

    /// True for the collapsed whitespace token
    pub fn is_space(&self) -> bool {
        self.kind == TokenKind::Space
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            TokenKind::Space => write!(f, "<space>\t(ID: {:?})", self.kind),
            TokenKind::Eof => write!(f, "<eof>\t(ID: {:?})", self.kind),
            _ => write!(f, "{}\t(ID: {:?})", self.text, self.kind),
        }
    }
}

/// All possible token types in Descartes 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Keywords
    /// IF keyword
    If,
    /// THEN keyword
    Then,
    /// ELSE keyword
    Else,
    /// FI keyword
    Fi,
    /// LOOP keyword
    Loop,
    /// REPEAT keyword
    Repeat,
    /// BREAK keyword
    Break,
    /// READ keyword
    Read,
    /// PRINT keyword
    Print,
    /// AND keyword
    And,
    /// OR keyword
    Or,

    // Atoms
    /// Identifier
    Identifier,
    /// Numeric constant
    Constant,

    // Punctuation
    /// Assignment operator (:=)
    Becomes,
    /// Statement separator (;)
    Semicolon,
    /// Identifier list separator (,)
    Comma,
    /// Program terminator (.)
    Period,
    /// Loop label separator (:)
    Colon,
    /// Left parenthesis (
    LeftParen,
    /// Right parenthesis )
    RightParen,
    /// Plus operator (+)
    Plus,
    /// Minus operator (-)
    Minus,
    /// Star operator (*)
    Star,
    /// Slash operator (/)
    Slash,
    /// Less than operator (<)
    Lt,
    /// Less than or equal operator (<=)
    LtEq,
    /// Equality operator (=)
    Eq,
    /// Greater than or equal operator (>=)
    GtEq,
    /// Greater than operator (>)
    Gt,
    /// Inequality operator (<>)
    NotEq,

    // Special
    /// A run of spaces, tabs and newlines collapsed into one token
    Space,
    /// End of input marker
    Eof,
}

impl TokenKind {
    /// Get keyword from string (keywords are case-sensitive)
    pub fn keyword(s: &str) -> Option<TokenKind> {
        match s {
            "IF" => Some(TokenKind::If),
            "THEN" => Some(TokenKind::Then),
            "ELSE" => Some(TokenKind::Else),
            "FI" => Some(TokenKind::Fi),
            "LOOP" => Some(TokenKind::Loop),
            "REPEAT" => Some(TokenKind::Repeat),
            "BREAK" => Some(TokenKind::Break),
            "READ" => Some(TokenKind::Read),
            "PRINT" => Some(TokenKind::Print),
            "AND" => Some(TokenKind::And),
            "OR" => Some(TokenKind::Or),
            _ => None,
        }
    }

    /// Get punctuation operator from its full text
    pub fn operator(s: &str) -> Option<TokenKind> {
        match s {
            ":=" => Some(TokenKind::Becomes),
            ";" => Some(TokenKind::Semicolon),
            "," => Some(TokenKind::Comma),
            "." => Some(TokenKind::Period),
            ":" => Some(TokenKind::Colon),
            "(" => Some(TokenKind::LeftParen),
            ")" => Some(TokenKind::RightParen),
            "+" => Some(TokenKind::Plus),
            "-" => Some(TokenKind::Minus),
            "*" => Some(TokenKind::Star),
            "/" => Some(TokenKind::Slash),
            "<" => Some(TokenKind::Lt),
            "<=" => Some(TokenKind::LtEq),
            "=" => Some(TokenKind::Eq),
            ">=" => Some(TokenKind::GtEq),
            ">" => Some(TokenKind::Gt),
            "<>" => Some(TokenKind::NotEq),
            _ => None,
        }
    }

    /// Human-readable name used in syntax error messages
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::If => "'IF'",
            TokenKind::Then => "'THEN'",
            TokenKind::Else => "'ELSE'",
            TokenKind::Fi => "'FI'",
            TokenKind::Loop => "'LOOP'",
            TokenKind::Repeat => "'REPEAT'",
            TokenKind::Break => "'BREAK'",
            TokenKind::Read => "'READ'",
            TokenKind::Print => "'PRINT'",
            TokenKind::And => "'AND'",
            TokenKind::Or => "'OR'",
            TokenKind::Identifier => "identifier",
            TokenKind::Constant => "numeric constant",
            TokenKind::Becomes => "':='",
            TokenKind::Semicolon => "';'",
            TokenKind::Comma => "','",
            TokenKind::Period => "'.'",
            TokenKind::Colon => "':'",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Lt => "'<'",
            TokenKind::LtEq => "'<='",
            TokenKind::Eq => "'='",
            TokenKind::GtEq => "'>='",
            TokenKind::Gt => "'>'",
            TokenKind::NotEq => "'<>'",
            TokenKind::Space => "whitespace",
            TokenKind::Eof => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.describe())
    }
}
