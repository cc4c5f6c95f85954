//! # Descartes - an interpreter for the Descartes 2 teaching language
//!
//! Descartes 2 is a small imperative language with a single numeric type:
//! assignment, arithmetic and boolean expressions, `IF/THEN/ELSE/FI`,
//! named loops with scoped `BREAK`, and console `READ`/`PRINT`.
//!
//! ## Quick Start
//!
//! ```rust
//! use descartes::{Evaluator, Parser, ScriptedConsole};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let code = "
//!     total := 0; i := 1;
//!     LOOP sum:
//!         total := total + i;
//!         i := i + 1;
//!         IF i > 10 THEN BREAK sum FI
//!     REPEAT;
//!     PRINT total
//! .";
//!
//! // Parse into AST
//! let mut parser = Parser::from_source("sum.dc", code);
//! let program = parser.parse()?;
//!
//! // Execute
//! let mut evaluator = Evaluator::new(ScriptedConsole::default());
//! evaluator.execute(&program)?;
//!
//! assert_eq!(evaluator.state().get("total")?, 55.0);
//! assert_eq!(evaluator.console().output, vec!["55"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Source Code → Scanner → Tokens → Parser → AST → Evaluator → ProgramState + console
//! ```
//!
//! - [`Scanner`] - Produces tokens on demand, with single-token pushback
//! - [`Parser`] - Recursive descent, one method per grammar production
//! - [`Evaluator`] - Walks the AST against a [`ProgramState`]
//! - [`Console`] - Where `READ` gets numbers and `PRINT` writes them
//!
//! ## Error Handling
//!
//! Syntax errors name the file and line; runtime errors abort evaluation but
//! leave the program state intact for inspection:
//!
//! ```rust
//! use descartes::{Error, Evaluator, Parser, ScriptedConsole};
//!
//! let program = Parser::from_source("div.dc", "a := 1; b := a / 0; c := 2 .")
//!     .parse()
//!     .unwrap();
//! let mut evaluator = Evaluator::new(ScriptedConsole::default());
//!
//! assert_eq!(evaluator.execute(&program), Err(Error::DivisionByZero));
//! assert_eq!(evaluator.state().get("a"), Ok(1.0));
//! assert!(!evaluator.state().is_defined("c"));
//! ```

/// Version of the Descartes interpreter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod lexer;
pub mod parser;
pub mod runtime;

// Re-export main types
pub use error::{Error, ErrorKind, Result};
pub use lexer::{tokenize, Scanner, Token, TokenKind};
pub use parser::{parse_expression, parse_program, DescentParser, Expr, Program, Statement};
pub use runtime::{
    Console, Evaluator, EvaluatorConfig, ProgramState, ScriptedConsole, StdConsole, StreamConsole,
};

/// Type alias for the recursive-descent parser.
/// Converts tokens into an abstract syntax tree (AST).
pub type Parser = DescentParser;
