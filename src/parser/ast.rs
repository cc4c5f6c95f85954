use serde::{Deserialize, Serialize};
use std::fmt;

/// Complete Descartes program: a statement list terminated by `.`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Top-level statements
    pub statements: StatementList,
}

/// `stmt-list : stmt stmt-tail`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementList {
    /// First statement (possibly empty)
    pub head: Statement,
    /// Remaining `; stmt` continuation
    pub tail: StatementTail,
}

/// `stmt-tail : ; stmt stmt-tail | ε`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementTail {
    /// No further statements
    Empty,
    /// Another statement followed by the rest of the chain
    Next {
        /// Statement after the `;`
        statement: Statement,
        /// Rest of the chain
        tail: Box<StatementTail>,
    },
}

/// Statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// `IF expr THEN stmt-list else-part`
    If(Box<IfStatement>),

    /// `LOOP id : stmt-list REPEAT`
    Loop(Box<LoopStatement>),

    /// `BREAK id-option`
    Break(IdOption),

    /// `id := expr`
    Assign {
        /// Variable being assigned
        name: String,
        /// Value expression
        value: Expr,
    },

    /// `READ id id-list-tail`
    Read(IdList),

    /// `PRINT id id-list-tail`
    Print(IdList),

    /// Zero-width statement, e.g. between consecutive semicolons
    Empty,
}

/// Conditional statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStatement {
    /// Condition; non-zero is true
    pub condition: Expr,
    /// Statements executed when the condition holds
    pub then_branch: StatementList,
    /// Optional ELSE branch, always closed by `FI`
    pub else_part: ElsePart,
}

/// `else-part : ELSE stmt-list FI | FI`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElsePart {
    /// Bare `FI`
    Empty,
    /// `ELSE stmt-list FI`
    Else(StatementList),
}

/// Named loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopStatement {
    /// Loop name targeted by `BREAK`
    pub name: String,
    /// Loop body
    pub body: StatementList,
}

/// `id-option : id | ε`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IdOption {
    /// Break the innermost active loop
    Innermost,
    /// Break the named loop and every loop nested inside it
    Named(String),
}

/// Non-empty, comma-separated identifier list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdList {
    /// First identifier
    pub first: String,
    /// Remaining `, id` continuation
    pub tail: IdListTail,
}

/// `id-list-tail : , id id-list-tail | ε`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IdListTail {
    /// No further identifiers
    Empty,
    /// Another identifier followed by the rest of the list
    Next {
        /// Identifier after the `,`
        name: String,
        /// Rest of the list
        tail: Box<IdListTail>,
    },
}

impl IdList {
    /// Iterates the identifiers in source order
    pub fn iter(&self) -> IdListIter<'_> {
        IdListIter {
            first: Some(&self.first),
            tail: &self.tail,
        }
    }
}

/// Iterator over an [`IdList`]
pub struct IdListIter<'a> {
    first: Option<&'a String>,
    tail: &'a IdListTail,
}

impl<'a> Iterator for IdListIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if let Some(first) = self.first.take() {
            return Some(first.as_str());
        }
        let current: &'a IdListTail = self.tail;
        match current {
            IdListTail::Empty => None,
            IdListTail::Next { name, tail } => {
                self.tail = tail.as_ref();
                Some(name.as_str())
            }
        }
    }
}

// Tail chains can be as long as the program itself, so they are unlinked one
// node at a time instead of through the default recursive drop.
macro_rules! unlink_on_drop {
    ($($chain:ident :: $link:ident),* $(,)?) => {
        $(
            impl Drop for $chain {
                fn drop(&mut self) {
                    let mut rest = match self {
                        $chain::$link { tail, .. } => {
                            std::mem::replace(tail.as_mut(), $chain::Empty)
                        }
                        $chain::Empty => return,
                    };
                    // Each node is dropped with an empty tail, so this never recurses
                    while let $chain::$link { tail, .. } = &mut rest {
                        let next = std::mem::replace(tail.as_mut(), $chain::Empty);
                        rest = next;
                    }
                }
            }
        )*
    };
}

unlink_on_drop!(
    StatementTail::Next,
    IdListTail::Next,
    BoolTermTail::Or,
    BoolFactorTail::And,
    TermTail::Next,
    FactorTail::Next,
);

// ============================================================================
// Expressions, lowest precedence first
// ============================================================================

/// `expr : bool-term bool-term-tail`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    /// Leftmost operand
    pub first: BoolTerm,
    /// `OR` continuation
    pub tail: BoolTermTail,
}

/// `bool-term-tail : OR bool-term bool-term-tail | ε`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoolTermTail {
    /// No further operands
    Empty,
    /// `OR operand ...`
    Or {
        /// Right-hand operand
        term: Box<BoolTerm>,
        /// Rest of the chain
        tail: Box<BoolTermTail>,
    },
}

/// `bool-term : bool-factor bool-factor-tail`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoolTerm {
    /// Leftmost operand
    pub first: BoolFactor,
    /// `AND` continuation
    pub tail: BoolFactorTail,
}

/// `bool-factor-tail : AND bool-factor bool-factor-tail | ε`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoolFactorTail {
    /// No further operands
    Empty,
    /// `AND operand ...`
    And {
        /// Right-hand operand
        factor: Box<BoolFactor>,
        /// Rest of the chain
        tail: Box<BoolFactorTail>,
    },
}

/// `bool-factor : arith-expr relation-option`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoolFactor {
    /// Left-hand arithmetic expression
    pub arith: ArithExpr,
    /// Optional comparison
    pub relation: RelationOption,
}

/// `relation-option : relop arith-expr | ε`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RelationOption {
    /// No comparison; the arithmetic value passes through
    Empty,
    /// Comparison against a right-hand arithmetic expression
    Compare {
        /// Comparison operator
        op: RelOp,
        /// Right-hand side
        rhs: Box<ArithExpr>,
    },
}

/// `arith-expr : term term-tail`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArithExpr {
    /// Leftmost operand
    pub first: Term,
    /// `+`/`-` continuation
    pub tail: TermTail,
}

/// `term-tail : addop term term-tail | ε`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TermTail {
    /// No further operands
    Empty,
    /// `op operand ...`
    Next {
        /// Additive operator
        op: AddOp,
        /// Right-hand operand
        term: Box<Term>,
        /// Rest of the chain
        tail: Box<TermTail>,
    },
}

/// `term : factor factor-tail`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Leftmost operand
    pub first: Factor,
    /// `*`/`/` continuation
    pub tail: FactorTail,
}

/// `factor-tail : mulop factor factor-tail | ε`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FactorTail {
    /// No further operands
    Empty,
    /// `op operand ...`
    Next {
        /// Multiplicative operator
        op: MulOp,
        /// Right-hand operand
        factor: Box<Factor>,
        /// Rest of the chain
        tail: Box<FactorTail>,
    },
}

/// `factor : - factor | ( expr ) | atom`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Factor {
    /// Unary minus
    Negate(Box<Factor>),
    /// Parenthesized sub-expression
    Paren(Box<Expr>),
    /// Identifier or literal
    Atom(Atom),
}

/// `atom : id | constant`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Atom {
    /// Variable reference
    Identifier(String),
    /// Numeric literal
    Constant(f64),
}

/// Additive operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddOp {
    /// `+`
    Add,
    /// `-`
    Subtract,
}

/// Multiplicative operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MulOp {
    /// `*`
    Multiply,
    /// `/`
    Divide,
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelOp {
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `=`
    Eq,
    /// `>=`
    GtEq,
    /// `>`
    Gt,
    /// `<>`
    NotEq,
}

impl RelOp {
    /// Applies the comparison, yielding exactly `0.0` or `1.0`
    pub fn apply(self, left: f64, right: f64) -> f64 {
        let holds = match self {
            RelOp::Lt => left < right,
            RelOp::LtEq => left <= right,
            RelOp::Eq => left == right,
            RelOp::GtEq => left >= right,
            RelOp::Gt => left > right,
            RelOp::NotEq => left != right,
        };
        if holds {
            1.0
        } else {
            0.0
        }
    }
}

impl fmt::Display for AddOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AddOp::Add => write!(f, "+"),
            AddOp::Subtract => write!(f, "-"),
        }
    }
}

impl fmt::Display for MulOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MulOp::Multiply => write!(f, "*"),
            MulOp::Divide => write!(f, "/"),
        }
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            RelOp::Lt => "<",
            RelOp::LtEq => "<=",
            RelOp::Eq => "=",
            RelOp::GtEq => ">=",
            RelOp::Gt => ">",
            RelOp::NotEq => "<>",
        };
        f.write_str(s)
    }
}
