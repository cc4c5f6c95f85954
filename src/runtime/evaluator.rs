use crate::error::{Error, Result};
use crate::parser::{
    AddOp, ArithExpr, Atom, BoolFactor, BoolFactorTail, BoolTerm, BoolTermTail, ElsePart, Expr,
    Factor, FactorTail, IdList, IdOption, IfStatement, LoopStatement, MulOp, Program,
    RelationOption, Statement, StatementList, StatementTail, Term, TermTail,
};
use crate::runtime::{Console, ProgramState};

/// Evaluator configuration
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Maximum body executions of a single loop (`None` is unbounded)
    pub max_loop_iterations: Option<usize>,
    /// Echo `name = value` through the console for every value READ
    pub echo_reads: bool,
}

impl EvaluatorConfig {
    /// Sets the per-loop iteration guard
    pub fn with_max_loop_iterations(mut self, limit: usize) -> Self {
        self.max_loop_iterations = Some(limit);
        self
    }

    /// Enables or disables READ echoes
    pub fn with_echo_reads(mut self, echo: bool) -> Self {
        self.echo_reads = echo;
        self
    }
}

/// Normalizes a truth value to exactly `0.0` or `1.0`
fn truth(holds: bool) -> f64 {
    if holds {
        1.0
    } else {
        0.0
    }
}

/// Tree-walking evaluator
///
/// Statements run against an owned [`ProgramState`]; READ and PRINT go
/// through the [`Console`]. After a runtime error the state keeps every
/// side effect made so far, so callers can still inspect or dump it.
pub struct Evaluator<C: Console> {
    state: ProgramState,
    console: C,
    config: EvaluatorConfig,
}

impl<C: Console> Evaluator<C> {
    /// Creates an evaluator with the default configuration
    pub fn new(console: C) -> Self {
        Self::with_config(console, EvaluatorConfig::default())
    }

    /// Creates an evaluator with a custom configuration
    pub fn with_config(console: C, config: EvaluatorConfig) -> Self {
        Evaluator {
            state: ProgramState::new(),
            console,
            config,
        }
    }

    /// Current program state
    pub fn state(&self) -> &ProgramState {
        &self.state
    }

    /// Mutable program state, e.g. to seed variables before execution
    pub fn state_mut(&mut self) -> &mut ProgramState {
        &mut self.state
    }

    /// The console
    pub fn console(&self) -> &C {
        &self.console
    }

    /// Splits the evaluator into its state and console
    pub fn into_parts(self) -> (ProgramState, C) {
        (self.state, self.console)
    }

    /// Runs a whole program
    pub fn execute(&mut self, program: &Program) -> Result<()> {
        tracing::debug!("executing program");
        self.execute_list(&program.statements)?;
        tracing::debug!(variables = self.state.variables().count(), "program finished");
        Ok(())
    }

    /// Evaluates an expression against the current state
    pub fn evaluate(&self, expr: &Expr) -> Result<f64> {
        eval_expr(expr, &self.state)
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn execute_list(&mut self, list: &StatementList) -> Result<()> {
        if self.state.is_unwinding() {
            return Ok(());
        }
        self.execute_statement(&list.head)?;
        self.execute_tail(&list.tail)
    }

    fn execute_tail(&mut self, tail: &StatementTail) -> Result<()> {
        let mut tail = tail;
        while let StatementTail::Next {
            statement,
            tail: rest,
        } = tail
        {
            if self.state.is_unwinding() {
                return Ok(());
            }
            self.execute_statement(statement)?;
            tail = rest.as_ref();
        }
        Ok(())
    }

    fn execute_statement(&mut self, stmt: &Statement) -> Result<()> {
        match stmt {
            Statement::If(if_stmt) => self.execute_if(if_stmt),
            Statement::Loop(loop_stmt) => self.execute_loop(loop_stmt),
            Statement::Break(target) => self.execute_break(target),
            Statement::Assign { name, value } => {
                let value = eval_expr(value, &self.state)?;
                self.state.assign(name, value);
                Ok(())
            }
            Statement::Read(ids) => self.execute_read(ids),
            Statement::Print(ids) => self.execute_print(ids),
            Statement::Empty => Ok(()),
        }
    }

    fn execute_if(&mut self, stmt: &IfStatement) -> Result<()> {
        if eval_expr(&stmt.condition, &self.state)? != 0.0 {
            self.execute_list(&stmt.then_branch)
        } else {
            match &stmt.else_part {
                ElsePart::Empty => Ok(()),
                ElsePart::Else(list) => self.execute_list(list),
            }
        }
    }

    /// Repeats the body while this loop's own frame is still the innermost one
    fn execute_loop(&mut self, stmt: &LoopStatement) -> Result<()> {
        self.state.push_loop(&stmt.name);
        let depth = self.state.loop_depth();
        let mut iterations = 0usize;

        loop {
            if let Some(limit) = self.config.max_loop_iterations {
                if iterations >= limit {
                    tracing::warn!(loop_name = %stmt.name, limit, "loop iteration limit reached");
                    return Err(Error::TooManyIterations { limit });
                }
            }
            iterations += 1;

            self.execute_list(&stmt.body)?;

            let still_active = self.state.loop_depth() == depth
                && self.state.innermost_loop() == Some(stmt.name.as_str());
            if !still_active {
                break;
            }
        }

        self.state.clear_break(&stmt.name);
        Ok(())
    }

    fn execute_break(&mut self, target: &IdOption) -> Result<()> {
        match target {
            IdOption::Innermost => self.state.raise_break(None),
            IdOption::Named(name) => self.state.raise_break(Some(name)),
        }
    }

    fn execute_read(&mut self, ids: &IdList) -> Result<()> {
        for name in ids.iter() {
            let value = self.console.read_number(name)?;
            self.state.assign(name, value);
            if self.config.echo_reads {
                self.console.write_line(&format!("{} = {}", name, value))?;
            }
        }
        Ok(())
    }

    fn execute_print(&mut self, ids: &IdList) -> Result<()> {
        for name in ids.iter() {
            let value = self.state.get(name)?;
            self.console.write_value(name, value)?;
        }
        Ok(())
    }
}

// ============================================================================
// Expressions
//
// Each tail receives the value accumulated to its left and folds its own
// operand in before moving on to the next link, so same-precedence operators
// associate to the left even though the grammar recurses right.
// ============================================================================

/// Evaluates an expression against `state`
pub fn eval_expr(expr: &Expr, state: &ProgramState) -> Result<f64> {
    let first = eval_bool_term(&expr.first, state)?;
    fold_or(first, &expr.tail, state)
}

fn fold_or(mut acc: f64, mut tail: &BoolTermTail, state: &ProgramState) -> Result<f64> {
    while let BoolTermTail::Or { term, tail: rest } = tail {
        let rhs = eval_bool_term(term, state)?;
        acc = truth(acc != 0.0 || rhs != 0.0);
        tail = rest.as_ref();
    }
    Ok(acc)
}

fn eval_bool_term(term: &BoolTerm, state: &ProgramState) -> Result<f64> {
    let first = eval_bool_factor(&term.first, state)?;
    fold_and(first, &term.tail, state)
}

fn fold_and(mut acc: f64, mut tail: &BoolFactorTail, state: &ProgramState) -> Result<f64> {
    while let BoolFactorTail::And { factor, tail: rest } = tail {
        let rhs = eval_bool_factor(factor, state)?;
        acc = truth(acc != 0.0 && rhs != 0.0);
        tail = rest.as_ref();
    }
    Ok(acc)
}

fn eval_bool_factor(factor: &BoolFactor, state: &ProgramState) -> Result<f64> {
    let lhs = eval_arith(&factor.arith, state)?;
    match &factor.relation {
        RelationOption::Empty => Ok(lhs),
        RelationOption::Compare { op, rhs } => Ok(op.apply(lhs, eval_arith(rhs, state)?)),
    }
}

fn eval_arith(expr: &ArithExpr, state: &ProgramState) -> Result<f64> {
    let first = eval_term(&expr.first, state)?;
    fold_terms(first, &expr.tail, state)
}

fn fold_terms(mut acc: f64, mut tail: &TermTail, state: &ProgramState) -> Result<f64> {
    while let TermTail::Next { op, term, tail: rest } = tail {
        let rhs = eval_term(term, state)?;
        acc = match op {
            AddOp::Add => acc + rhs,
            AddOp::Subtract => acc - rhs,
        };
        tail = rest.as_ref();
    }
    Ok(acc)
}

fn eval_term(term: &Term, state: &ProgramState) -> Result<f64> {
    let first = eval_factor(&term.first, state)?;
    fold_factors(first, &term.tail, state)
}

fn fold_factors(mut acc: f64, mut tail: &FactorTail, state: &ProgramState) -> Result<f64> {
    while let FactorTail::Next { op, factor, tail: rest } = tail {
        let rhs = eval_factor(factor, state)?;
        acc = match op {
            MulOp::Multiply => acc * rhs,
            MulOp::Divide => {
                if rhs == 0.0 {
                    return Err(Error::DivisionByZero);
                }
                acc / rhs
            }
        };
        tail = rest.as_ref();
    }
    Ok(acc)
}

fn eval_factor(factor: &Factor, state: &ProgramState) -> Result<f64> {
    match factor {
        Factor::Negate(inner) => Ok(-eval_factor(inner, state)?),
        Factor::Paren(expr) => eval_expr(expr, state),
        Factor::Atom(Atom::Constant(value)) => Ok(*value),
        Factor::Atom(Atom::Identifier(name)) => state.get(name),
    }
}
