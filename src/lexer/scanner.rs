use super::token::{Token, TokenKind};
use crate::error::{Error, Result};

/// Characters that may start (or continue) a punctuation operator
const PUNCTUATION: &str = ".*()/+-<>=:;,";

/// On-demand scanner for Descartes 2 source code
///
/// Tokens are produced one at a time by [`Scanner::next_token`]. A single
/// token may be handed back with [`Scanner::push_back`]; deeper lookahead is
/// the parser's job.
pub struct Scanner {
    /// Name of the source, used in syntax errors
    file_name: String,
    /// Source code as character vector
    source: Vec<char>,
    /// Current position in source
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// Token returned by the next call to `next_token`, if any
    pushed_back: Option<Token>,
}

impl Scanner {
    /// Creates a new scanner over `source`
    pub fn new(file_name: impl Into<String>, source: &str) -> Self {
        Scanner {
            file_name: file_name.into(),
            source: source.chars().collect(),
            current: 0,
            line: 1,
            pushed_back: None,
        }
    }

    /// Name of the source being scanned
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Line the scanner is currently positioned on
    pub fn line(&self) -> usize {
        self.line
    }

    /// True once every character has been consumed and nothing is pushed back
    pub fn at_end(&self) -> bool {
        self.pushed_back.is_none() && self.is_at_end()
    }

    /// Restores one previously read token
    pub fn push_back(&mut self, token: Token) -> Result<()> {
        if self.pushed_back.is_some() {
            return Err(Error::internal(format!(
                "scanner pushback slot already occupied when returning {}",
                token.kind
            )));
        }
        self.pushed_back = Some(token);
        Ok(())
    }

    /// Reads the next token; returns an `Eof` token forever once input is exhausted
    pub fn next_token(&mut self) -> Result<Token> {
        if let Some(token) = self.pushed_back.take() {
            return Ok(token);
        }

        if self.is_at_end() {
            return Ok(Token::new(TokenKind::Eof, "", self.line));
        }

        let c = self.peek();
        match c {
            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_alphabetic() => Ok(self.scan_alpha()),
            ' ' | '\t' | '\n' | '\r' => Ok(self.scan_space()),
            c if PUNCTUATION.contains(c) => self.scan_punctuation(),
            _ => Err(self.error(format!(
                "Unrecognized character in input stream: \"{}\" (code point: {})",
                c, c as u32
            ))),
        }
    }

    /// Digit-initiated: digits, optionally one point followed by one or more digits
    fn scan_number(&mut self) -> Result<Token> {
        let line = self.line;
        let start = self.current;

        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' {
            self.advance();
            if !self.peek().is_ascii_digit() {
                return Err(self.error(
                    "Fractional part of numeric literal expected following decimal point, but none found.",
                ));
            }
            while self.peek().is_ascii_digit() {
                self.advance();
            }
            if self.peek() == '.' {
                return Err(self.error("Numeric literal already has decimal point."));
            }
        }

        let text: String = self.source[start..self.current].iter().collect();
        Ok(Token::new(TokenKind::Constant, text, line))
    }

    /// Letter-initiated: letters and digits, then a keyword lookup
    fn scan_alpha(&mut self) -> Token {
        let line = self.line;
        let start = self.current;

        while self.peek().is_alphabetic() || self.peek().is_ascii_digit() {
            self.advance();
        }

        let text: String = self.source[start..self.current].iter().collect();
        let kind = TokenKind::keyword(&text).unwrap_or(TokenKind::Identifier);
        Token::new(kind, text, line)
    }

    /// Collapses a maximal run of whitespace into one token; carriage returns vanish
    fn scan_space(&mut self) -> Token {
        let line = self.line;

        while matches!(self.peek(), ' ' | '\t' | '\n' | '\r') {
            if self.advance() == '\n' {
                self.line += 1;
            }
        }

        Token::new(TokenKind::Space, " ", line)
    }

    /// Greedy two-character match, falling back to a single character
    fn scan_punctuation(&mut self) -> Result<Token> {
        let line = self.line;
        let first = self.advance();

        let next = self.peek();
        if PUNCTUATION.contains(next) && !self.is_at_end() {
            let pair: String = [first, next].iter().collect();
            if let Some(kind) = TokenKind::operator(&pair) {
                self.advance();
                return Ok(Token::new(kind, pair, line));
            }
        }

        let text = first.to_string();
        match TokenKind::operator(&text) {
            Some(kind) => Ok(Token::new(kind, text, line)),
            None => Err(self.error(format!("Unrecognized punctuation token: \"{}\"", text))),
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::syntax(self.file_name.clone(), self.line, message)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn peek(&self) -> char {
        self.source.get(self.current).copied().unwrap_or('\0')
    }

    fn advance(&mut self) -> char {
        let c = self.peek();
        self.current += 1;
        c
    }
}

/// Scans every token of `source`, ending with the `Eof` token
pub fn tokenize(file_name: &str, source: &str) -> Result<Vec<Token>> {
    let mut scanner = Scanner::new(file_name, source);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
