//! Descartes Parser Module
//!
//! Parses the token stream into an Abstract Syntax Tree (AST) with one node
//! type per grammar production.

mod ast;
mod descent_parser;
mod token_stream;

pub use ast::{
    AddOp, ArithExpr, Atom, BoolFactor, BoolFactorTail, BoolTerm, BoolTermTail, ElsePart, Expr,
    Factor, FactorTail, IdList, IdListIter, IdListTail, IdOption, IfStatement, LoopStatement,
    MulOp, Program, RelOp, RelationOption, Statement, StatementList, StatementTail, Term,
    TermTail,
};
pub use descent_parser::{DescentParser, MAX_NESTING_DEPTH};
pub use token_stream::{TokenStream, MAX_LOOKAHEAD};

use crate::error::Result;

/// Parses a complete program from source text
pub fn parse_program(file_name: &str, source: &str) -> Result<Program> {
    DescentParser::from_source(file_name, source).parse()
}

/// Parses a single expression that spans the whole input
pub fn parse_expression(file_name: &str, source: &str) -> Result<Expr> {
    DescentParser::from_source(file_name, source).parse_standalone_expr()
}
