//! Lexical analysis for Descartes 2
//!
//! Converts source text into a stream of tokens, one token at a time.

mod scanner;
mod token;

pub use scanner::{tokenize, Scanner};
pub use token::{Token, TokenKind};
