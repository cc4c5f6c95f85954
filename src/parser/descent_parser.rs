use super::ast::{
    AddOp, ArithExpr, Atom, BoolFactor, BoolFactorTail, BoolTerm, BoolTermTail, ElsePart, Expr,
    Factor, FactorTail, IdList, IdListTail, IdOption, IfStatement, LoopStatement, MulOp, Program,
    RelOp, RelationOption, Statement, StatementList, StatementTail, Term, TermTail,
};
use super::token_stream::TokenStream;
use crate::error::Result;
use crate::lexer::{Scanner, Token, TokenKind};

/// Deepest nesting of parentheses, unary minus, IF bodies and LOOP bodies
/// accepted before parsing fails with a syntax error
pub const MAX_NESTING_DEPTH: usize = 64;

/// Recursive-descent parser for Descartes 2
///
/// Every grammar production has one `parse_*` method. Each method skips the
/// whitespace in front of it, consumes exactly its production and leaves any
/// trailing whitespace for whoever comes next. Statement kinds are chosen by
/// `detect_*` probes that look ahead without consuming.
///
/// Same-precedence tails are collected in a loop, so long statement lists and
/// operator chains do not deepen the call stack. Only genuine nesting does,
/// and that is capped at [`MAX_NESTING_DEPTH`].
pub struct DescentParser {
    tokens: TokenStream,
    depth: usize,
}

impl DescentParser {
    /// Creates a parser reading from `scanner`
    pub fn new(scanner: Scanner) -> Self {
        DescentParser {
            tokens: TokenStream::new(scanner),
            depth: 0,
        }
    }

    /// Creates a parser over an in-memory source
    pub fn from_source(file_name: impl Into<String>, source: &str) -> Self {
        Self::new(Scanner::new(file_name, source))
    }

    /// `program : stmt-list .`
    pub fn parse(&mut self) -> Result<Program> {
        tracing::debug!(file = self.tokens.file_name(), "parsing program");

        let statements = self.parse_stmt_list()?;
        self.expect(TokenKind::Period, "Expected '.' after program statement list")?;
        self.expect_end("Unexpected input after end of program")?;

        tracing::debug!(
            file = self.tokens.file_name(),
            lines = self.tokens.line(),
            "parsed program"
        );
        Ok(Program { statements })
    }

    /// Parses a standalone expression spanning the whole input
    pub fn parse_standalone_expr(&mut self) -> Result<Expr> {
        let expr = self.parse_expr()?;
        self.expect_end("Unexpected input after expression")?;
        Ok(expr)
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// `stmt-list : stmt stmt-tail`
    fn parse_stmt_list(&mut self) -> Result<StatementList> {
        let head = self.parse_stmt()?;
        let tail = self.parse_stmt_tail()?;
        Ok(StatementList { head, tail })
    }

    /// `stmt-tail : ; stmt stmt-tail | ε`
    fn parse_stmt_tail(&mut self) -> Result<StatementTail> {
        let mut statements = Vec::new();
        while self.accept(TokenKind::Semicolon)? {
            statements.push(self.parse_stmt()?);
        }

        Ok(statements
            .into_iter()
            .rev()
            .fold(StatementTail::Empty, |tail, statement| StatementTail::Next {
                statement,
                tail: Box::new(tail),
            }))
    }

    /// Probes each statement kind in order; no match is the empty statement
    fn parse_stmt(&mut self) -> Result<Statement> {
        self.tokens.skip_space()?;

        if self.detect_if_stmt()? {
            Ok(Statement::If(Box::new(self.parse_if_stmt()?)))
        } else if self.detect_loop_stmt()? {
            Ok(Statement::Loop(Box::new(self.parse_loop_stmt()?)))
        } else if self.detect_break_stmt()? {
            self.parse_break_stmt()
        } else if self.detect_assign_stmt()? {
            self.parse_assign_stmt()
        } else if self.detect_read_stmt()? {
            self.parse_read_stmt()
        } else if self.detect_print_stmt()? {
            self.parse_print_stmt()
        } else {
            Ok(Statement::Empty)
        }
    }

    fn detect_if_stmt(&mut self) -> Result<bool> {
        Ok(self.tokens.peek_kind()? == TokenKind::If)
    }

    fn detect_loop_stmt(&mut self) -> Result<bool> {
        Ok(self.tokens.peek_kind()? == TokenKind::Loop)
    }

    fn detect_break_stmt(&mut self) -> Result<bool> {
        Ok(self.tokens.peek_kind()? == TokenKind::Break)
    }

    /// Identifier, at most one whitespace token, then `:=`
    fn detect_assign_stmt(&mut self) -> Result<bool> {
        if self.tokens.peek_kind()? != TokenKind::Identifier {
            return Ok(false);
        }
        let mut next = 1;
        if self.tokens.peek_kind_nth(next)? == TokenKind::Space {
            next += 1;
        }
        Ok(self.tokens.peek_kind_nth(next)? == TokenKind::Becomes)
    }

    fn detect_read_stmt(&mut self) -> Result<bool> {
        Ok(self.tokens.peek_kind()? == TokenKind::Read)
    }

    fn detect_print_stmt(&mut self) -> Result<bool> {
        Ok(self.tokens.peek_kind()? == TokenKind::Print)
    }

    /// `if-stmt : IF expr THEN stmt-list else-part`
    fn parse_if_stmt(&mut self) -> Result<IfStatement> {
        self.expect(TokenKind::If, "Expected 'IF'")?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::Then, "Expected 'THEN' after IF condition")?;
        self.enter_nested()?;
        let then_branch = self.parse_stmt_list()?;
        let else_part = self.parse_else_part()?;
        self.leave_nested();
        Ok(IfStatement {
            condition,
            then_branch,
            else_part,
        })
    }

    /// `else-part : ELSE stmt-list FI | FI`
    fn parse_else_part(&mut self) -> Result<ElsePart> {
        self.tokens.skip_space()?;
        let else_part = if self.accept(TokenKind::Else)? {
            ElsePart::Else(self.parse_stmt_list()?)
        } else {
            ElsePart::Empty
        };
        self.expect(TokenKind::Fi, "Expected 'FI' to close IF statement")?;
        Ok(else_part)
    }

    /// `loop-stmt : LOOP id : stmt-list REPEAT`
    fn parse_loop_stmt(&mut self) -> Result<LoopStatement> {
        self.expect(TokenKind::Loop, "Expected 'LOOP'")?;
        let name = self.expect_identifier("Expected identifier after 'LOOP'")?;
        self.expect(TokenKind::Colon, "Expected ':' after loop identifier")?;
        self.enter_nested()?;
        let body = self.parse_stmt_list()?;
        self.leave_nested();
        self.expect(TokenKind::Repeat, "Expected 'REPEAT' after loop body")?;
        Ok(LoopStatement { name, body })
    }

    /// `break-stmt : BREAK id-option`
    fn parse_break_stmt(&mut self) -> Result<Statement> {
        self.expect(TokenKind::Break, "Expected 'BREAK'")?;
        Ok(Statement::Break(self.parse_id_option()?))
    }

    /// `id-option : id | ε`
    fn parse_id_option(&mut self) -> Result<IdOption> {
        self.tokens.skip_space()?;
        if self.tokens.peek_kind()? == TokenKind::Identifier {
            let token = self.tokens.advance()?;
            Ok(IdOption::Named(token.text))
        } else {
            Ok(IdOption::Innermost)
        }
    }

    /// `assign-stmt : id := expr`
    fn parse_assign_stmt(&mut self) -> Result<Statement> {
        let name = self.expect_identifier("Expected identifier")?;
        self.expect(TokenKind::Becomes, "Expected ':=' after identifier")?;
        let value = self.parse_expr()?;
        Ok(Statement::Assign { name, value })
    }

    /// `read-stmt : READ id id-list-tail`
    fn parse_read_stmt(&mut self) -> Result<Statement> {
        self.expect(TokenKind::Read, "Expected 'READ'")?;
        let ids = self.parse_id_list("Expected identifier after 'READ'")?;
        Ok(Statement::Read(ids))
    }

    /// `print-stmt : PRINT id id-list-tail`
    fn parse_print_stmt(&mut self) -> Result<Statement> {
        self.expect(TokenKind::Print, "Expected 'PRINT'")?;
        let ids = self.parse_id_list("Expected identifier after 'PRINT'")?;
        Ok(Statement::Print(ids))
    }

    fn parse_id_list(&mut self, message: &str) -> Result<IdList> {
        let first = self.expect_identifier(message)?;
        let tail = self.parse_id_list_tail()?;
        Ok(IdList { first, tail })
    }

    /// `id-list-tail : , id id-list-tail | ε`
    fn parse_id_list_tail(&mut self) -> Result<IdListTail> {
        let mut names = Vec::new();
        while self.accept(TokenKind::Comma)? {
            names.push(self.expect_identifier("Expected identifier after ','")?);
        }

        Ok(names
            .into_iter()
            .rev()
            .fold(IdListTail::Empty, |tail, name| IdListTail::Next {
                name,
                tail: Box::new(tail),
            }))
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// `expr : bool-term bool-term-tail`
    fn parse_expr(&mut self) -> Result<Expr> {
        let first = self.parse_bool_term()?;
        let tail = self.parse_bool_term_tail()?;
        Ok(Expr { first, tail })
    }

    /// `bool-term-tail : OR bool-term bool-term-tail | ε`
    fn parse_bool_term_tail(&mut self) -> Result<BoolTermTail> {
        let mut terms = Vec::new();
        while self.accept(TokenKind::Or)? {
            terms.push(self.parse_bool_term()?);
        }

        Ok(terms
            .into_iter()
            .rev()
            .fold(BoolTermTail::Empty, |tail, term| BoolTermTail::Or {
                term: Box::new(term),
                tail: Box::new(tail),
            }))
    }

    /// `bool-term : bool-factor bool-factor-tail`
    fn parse_bool_term(&mut self) -> Result<BoolTerm> {
        let first = self.parse_bool_factor()?;
        let tail = self.parse_bool_factor_tail()?;
        Ok(BoolTerm { first, tail })
    }

    /// `bool-factor-tail : AND bool-factor bool-factor-tail | ε`
    fn parse_bool_factor_tail(&mut self) -> Result<BoolFactorTail> {
        let mut factors = Vec::new();
        while self.accept(TokenKind::And)? {
            factors.push(self.parse_bool_factor()?);
        }

        Ok(factors
            .into_iter()
            .rev()
            .fold(BoolFactorTail::Empty, |tail, factor| BoolFactorTail::And {
                factor: Box::new(factor),
                tail: Box::new(tail),
            }))
    }

    /// `bool-factor : arith-expr relation-option`
    fn parse_bool_factor(&mut self) -> Result<BoolFactor> {
        let arith = self.parse_arith_expr()?;
        let relation = self.parse_relation_option()?;
        Ok(BoolFactor { arith, relation })
    }

    /// `relation-option : relop arith-expr | ε`
    fn parse_relation_option(&mut self) -> Result<RelationOption> {
        self.tokens.skip_space()?;
        let op = match self.tokens.peek_kind()? {
            TokenKind::Lt => RelOp::Lt,
            TokenKind::LtEq => RelOp::LtEq,
            TokenKind::Eq => RelOp::Eq,
            TokenKind::GtEq => RelOp::GtEq,
            TokenKind::Gt => RelOp::Gt,
            TokenKind::NotEq => RelOp::NotEq,
            _ => return Ok(RelationOption::Empty),
        };
        self.tokens.advance()?;

        let rhs = Box::new(self.parse_arith_expr()?);
        Ok(RelationOption::Compare { op, rhs })
    }

    /// `arith-expr : term term-tail`
    fn parse_arith_expr(&mut self) -> Result<ArithExpr> {
        let first = self.parse_term()?;
        let tail = self.parse_term_tail()?;
        Ok(ArithExpr { first, tail })
    }

    /// `term-tail : (+|-) term term-tail | ε`
    fn parse_term_tail(&mut self) -> Result<TermTail> {
        let mut links = Vec::new();
        loop {
            self.tokens.skip_space()?;
            let op = match self.tokens.peek_kind()? {
                TokenKind::Plus => AddOp::Add,
                TokenKind::Minus => AddOp::Subtract,
                _ => break,
            };
            self.tokens.advance()?;
            links.push((op, self.parse_term()?));
        }

        Ok(links
            .into_iter()
            .rev()
            .fold(TermTail::Empty, |tail, (op, term)| TermTail::Next {
                op,
                term: Box::new(term),
                tail: Box::new(tail),
            }))
    }

    /// `term : factor factor-tail`
    fn parse_term(&mut self) -> Result<Term> {
        let first = self.parse_factor()?;
        let tail = self.parse_factor_tail()?;
        Ok(Term { first, tail })
    }

    /// `factor-tail : (*|/) factor factor-tail | ε`
    fn parse_factor_tail(&mut self) -> Result<FactorTail> {
        let mut links = Vec::new();
        loop {
            self.tokens.skip_space()?;
            let op = match self.tokens.peek_kind()? {
                TokenKind::Star => MulOp::Multiply,
                TokenKind::Slash => MulOp::Divide,
                _ => break,
            };
            self.tokens.advance()?;
            links.push((op, self.parse_factor()?));
        }

        Ok(links
            .into_iter()
            .rev()
            .fold(FactorTail::Empty, |tail, (op, factor)| FactorTail::Next {
                op,
                factor: Box::new(factor),
                tail: Box::new(tail),
            }))
    }

    /// `factor : - factor | ( expr ) | atom`
    fn parse_factor(&mut self) -> Result<Factor> {
        self.tokens.skip_space()?;
        if self.accept(TokenKind::Minus)? {
            self.enter_nested()?;
            let operand = self.parse_factor()?;
            self.leave_nested();
            return Ok(Factor::Negate(Box::new(operand)));
        }

        if self.accept(TokenKind::LeftParen)? {
            self.enter_nested()?;
            let expr = self.parse_expr()?;
            self.leave_nested();
            self.expect(TokenKind::RightParen, "Expected ')'")?;
            return Ok(Factor::Paren(Box::new(expr)));
        }

        self.parse_atom().map(Factor::Atom)
    }

    /// `atom : id | constant`
    fn parse_atom(&mut self) -> Result<Atom> {
        self.tokens.skip_space()?;
        match self.tokens.peek_kind()? {
            TokenKind::Identifier => {
                let token = self.tokens.advance()?;
                Ok(Atom::Identifier(token.text))
            }
            TokenKind::Constant => {
                let token = self.tokens.advance()?;
                let value = token.text.parse::<f64>().map_err(|_| {
                    crate::error::Error::syntax(
                        self.tokens.file_name(),
                        token.line,
                        format!("Malformed numeric constant \"{}\"", token.text),
                    )
                })?;
                Ok(Atom::Constant(value))
            }
            _ => Err(self.found_error("Expected atom (identifier or numeric constant)")),
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Skips whitespace and consumes the next token if it has `kind`
    fn accept(&mut self, kind: TokenKind) -> Result<bool> {
        self.tokens.skip_space()?;
        if self.tokens.peek_kind()? == kind {
            self.tokens.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Skips whitespace and consumes a token of `kind`, or fails with `message`
    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<Token> {
        self.tokens.skip_space()?;
        if self.tokens.peek_kind()? == kind {
            self.tokens.advance()
        } else {
            Err(self.found_error(message))
        }
    }

    fn enter_nested(&mut self) -> Result<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.tokens.error_here(format!(
                "Nesting deeper than {} levels",
                MAX_NESTING_DEPTH
            )));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave_nested(&mut self) {
        self.depth -= 1;
    }

    fn expect_identifier(&mut self, message: &str) -> Result<String> {
        Ok(self.expect(TokenKind::Identifier, message)?.text)
    }

    /// Only whitespace may remain
    fn expect_end(&mut self, message: &str) -> Result<()> {
        self.tokens.skip_space()?;
        if self.tokens.peek_kind()? == TokenKind::Eof {
            Ok(())
        } else {
            Err(self.found_error(message))
        }
    }

    /// Syntax error naming the token actually found
    fn found_error(&mut self, message: &str) -> crate::error::Error {
        let found = match self.tokens.peek() {
            Ok(token) => match token.kind {
                TokenKind::Identifier | TokenKind::Constant => {
                    format!("{} \"{}\"", token.kind, token.text)
                }
                kind => kind.to_string(),
            },
            Err(err) => return err,
        };
        self.tokens
            .error_here(format!("{}, found {}.", message, found))
    }
}
