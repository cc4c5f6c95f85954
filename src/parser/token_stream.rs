use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::lexer::{Scanner, Token, TokenKind};

/// Deepest raw lookahead any statement probe needs (identifier, space, `:=`)
pub const MAX_LOOKAHEAD: usize = 3;

/// Token source for the parser with a bounded FIFO of already-scanned tokens
///
/// Probes look ahead with [`TokenStream::peek_nth`] without consuming
/// anything, so a failed probe leaves the stream exactly where it was.
pub struct TokenStream {
    scanner: Scanner,
    buffer: VecDeque<Token>,
}

impl TokenStream {
    /// Wraps a scanner
    pub fn new(scanner: Scanner) -> Self {
        TokenStream {
            scanner,
            buffer: VecDeque::with_capacity(MAX_LOOKAHEAD),
        }
    }

    /// Name of the source being parsed
    pub fn file_name(&self) -> &str {
        self.scanner.file_name()
    }

    /// Line the underlying scanner has reached
    pub fn line(&self) -> usize {
        self.scanner.line()
    }

    /// Consumes and returns the next raw token
    pub fn advance(&mut self) -> Result<Token> {
        match self.buffer.pop_front() {
            Some(token) => Ok(token),
            None => self.scanner.next_token(),
        }
    }

    /// Returns the next raw token without consuming it
    pub fn peek(&mut self) -> Result<&Token> {
        self.peek_nth(0)
    }

    /// Returns the raw token `n` positions ahead without consuming anything
    pub fn peek_nth(&mut self, n: usize) -> Result<&Token> {
        if n >= MAX_LOOKAHEAD {
            return Err(Error::internal(format!(
                "lookahead of {} tokens exceeds the buffer bound of {}",
                n + 1,
                MAX_LOOKAHEAD
            )));
        }
        while self.buffer.len() <= n {
            let token = self.scanner.next_token()?;
            self.buffer.push_back(token);
        }
        Ok(&self.buffer[n])
    }

    /// Kind of the raw token `n` positions ahead
    pub fn peek_kind_nth(&mut self, n: usize) -> Result<TokenKind> {
        Ok(self.peek_nth(n)?.kind)
    }

    /// Kind of the next raw token
    pub fn peek_kind(&mut self) -> Result<TokenKind> {
        self.peek_kind_nth(0)
    }

    /// Consumes leading whitespace tokens
    pub fn skip_space(&mut self) -> Result<()> {
        while self.peek()?.is_space() {
            self.advance()?;
        }
        Ok(())
    }

    /// Builds a syntax error positioned at the next raw token
    pub fn error_here(&mut self, message: impl Into<String>) -> Error {
        let file = self.file_name().to_string();
        match self.peek() {
            Ok(token) => Error::syntax(file, token.line, message),
            Err(err) => err,
        }
    }
}
