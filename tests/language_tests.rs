//! End-to-end tests for expressions, assignment, conditionals and console I/O

use descartes::{
    parse_expression, Error, Evaluator, Parser, ProgramState, Result, ScriptedConsole,
};

fn run(source: &str, inputs: &[&str]) -> Result<(ProgramState, Vec<String>)> {
    let mut parser = Parser::from_source("test.dc", source);
    let program = parser.parse()?;
    let mut evaluator = Evaluator::new(ScriptedConsole::new(inputs.iter().copied()));
    evaluator.execute(&program)?;
    let (state, console) = evaluator.into_parts();
    Ok((state, console.output))
}

fn eval(source: &str) -> Result<f64> {
    let expr = parse_expression("expr", source)?;
    descartes::runtime::eval_expr(&expr, &ProgramState::new())
}

// ====================
// Arithmetic
// ====================

#[test]
fn test_subtraction_is_left_associative() {
    assert_eq!(eval("10 - 3 - 2").unwrap(), 5.0);
}

#[test]
fn test_division_is_left_associative() {
    assert_eq!(eval("100 / 10 / 5").unwrap(), 2.0);
    assert_eq!(eval("12 / 3 * 2").unwrap(), 8.0);
}

#[test]
fn test_operator_precedence() {
    assert_eq!(eval("2 + 3 * 4").unwrap(), 14.0);
    assert_eq!(eval("(2 + 3) * 4").unwrap(), 20.0);
    assert_eq!(eval("2 * 3 + 4 * 5 - 6 / 2").unwrap(), 23.0);
}

#[test]
fn test_unary_minus() {
    assert_eq!(eval("-5 + 2").unwrap(), -3.0);
    assert_eq!(eval("3 - -2").unwrap(), 5.0);
    assert_eq!(eval("-(1 + 2) * 2").unwrap(), -6.0);
}

#[test]
fn test_fractional_constants() {
    assert_eq!(eval("0.5 + 0.25").unwrap(), 0.75);
    assert_eq!(eval("1.5 * 4").unwrap(), 6.0);
}

#[test]
fn test_whitespace_insensitive() {
    assert_eq!(eval("(1+2)*3").unwrap(), 9.0);
    assert_eq!(eval("  ( 1 +\n 2 )\t*\r\n3  ").unwrap(), 9.0);
}

// ====================
// Boolean semantics
// ====================

#[test]
fn test_comparisons_normalize() {
    assert_eq!(eval("5 > 3").unwrap(), 1.0);
    assert_eq!(eval("5 < 3").unwrap(), 0.0);
    assert_eq!(eval("2 = 2").unwrap(), 1.0);
    assert_eq!(eval("2 <> 2").unwrap(), 0.0);
    assert_eq!(eval("2 >= 3").unwrap(), 0.0);
    assert_eq!(eval("3 <= 3").unwrap(), 1.0);
}

#[test]
fn test_and_or_normalize() {
    assert_eq!(eval("5 > 3 AND 2 > 9").unwrap(), 0.0);
    assert_eq!(eval("5 > 3 OR 2 > 9").unwrap(), 1.0);
    assert_eq!(eval("42 AND -1").unwrap(), 1.0);
    assert_eq!(eval("0 OR 0 OR 7").unwrap(), 1.0);
}

#[test]
fn test_comparison_binds_looser_than_arithmetic() {
    assert_eq!(eval("1 + 1 = 2").unwrap(), 1.0);
    assert_eq!(eval("2 * 3 > 5 AND 1 - 1 = 0").unwrap(), 1.0);
}

#[test]
fn test_both_operands_are_evaluated() {
    // No short-circuit: the undefined right operand is still an error
    assert_eq!(
        eval("1 OR missing").unwrap_err(),
        Error::UndefinedVariable {
            name: "missing".to_string()
        }
    );
    assert!(eval("0 AND 1 / 0").is_err());
}

// ====================
// Statements
// ====================

#[test]
fn test_assignment_round_trip() {
    let (_, output) = run("x := 5; PRINT x.", &[]).unwrap();
    assert_eq!(output, vec!["5"]);
}

#[test]
fn test_reassignment_updates_binding() {
    let (state, _) = run("x := 1; x := x + 41 .", &[]).unwrap();
    assert_eq!(state.get("x").unwrap(), 42.0);
}

#[test]
fn test_identifiers_are_case_sensitive() {
    let (state, _) = run("x := 1; X := 2 .", &[]).unwrap();
    assert_eq!(state.get("x").unwrap(), 1.0);
    assert_eq!(state.get("X").unwrap(), 2.0);
}

#[test]
fn test_if_else_takes_else_branch() {
    let (state, _) = run("IF 1 > 2 THEN x := 1 ELSE x := 2 FI. ", &[]).unwrap();
    assert_eq!(state.get("x").unwrap(), 2.0);
}

#[test]
fn test_if_takes_then_branch() {
    let (state, _) = run("IF 2 > 1 THEN x := 1; y := 3 ELSE x := 2 FI.", &[]).unwrap();
    assert_eq!(state.get("x").unwrap(), 1.0);
    assert_eq!(state.get("y").unwrap(), 3.0);
}

#[test]
fn test_if_without_else_leaves_variable_unassigned() {
    let (state, _) = run("IF 1 > 2 THEN x := 1 FI.", &[]).unwrap();
    assert!(!state.is_defined("x"));

    let err = run("IF 1 > 2 THEN x := 1 FI; PRINT x.", &[]).unwrap_err();
    assert_eq!(
        err,
        Error::UndefinedVariable {
            name: "x".to_string()
        }
    );
}

#[test]
fn test_any_nonzero_condition_is_true() {
    let (state, _) = run("c := 0.001; IF c THEN hit := 1 ELSE hit := 0 FI.", &[]).unwrap();
    assert_eq!(state.get("hit").unwrap(), 1.0);
}

#[test]
fn test_nested_if() {
    let source = "
        a := 5;
        IF a > 0 THEN
            IF a > 10 THEN size := 2 ELSE size := 1 FI
        ELSE
            size := 0
        FI
    .";
    let (state, _) = run(source, &[]).unwrap();
    assert_eq!(state.get("size").unwrap(), 1.0);
}

#[test]
fn test_read_assigns_in_order() {
    let (state, output) = run("READ a, b; c := a - b; PRINT c.", &["10", "4.5"]).unwrap();
    assert_eq!(state.get("a").unwrap(), 10.0);
    assert_eq!(state.get("b").unwrap(), 4.5);
    assert_eq!(output, vec!["5.5"]);
}

#[test]
fn test_read_rejects_non_numeric_input() {
    let err = run("READ a.", &["ten"]).unwrap_err();
    assert_eq!(
        err,
        Error::InvalidInput {
            name: "a".to_string(),
            input: "ten".to_string()
        }
    );
}

#[test]
fn test_read_past_end_of_input() {
    let err = run("READ a, b.", &["1"]).unwrap_err();
    assert_eq!(
        err,
        Error::UnexpectedEndOfInput {
            name: "b".to_string()
        }
    );
}

#[test]
fn test_print_writes_one_value_per_identifier() {
    let (_, output) = run("a := 1; b := -2.5; PRINT b, a, b.", &[]).unwrap();
    assert_eq!(output, vec!["-2.5", "1", "-2.5"]);
}

// ====================
// Empty productions
// ====================

#[test]
fn test_empty_productions_are_no_ops() {
    let (state, output) = run(";; IF 0 THEN FI; IF 1 THEN ELSE FI;.", &[]).unwrap();
    assert!(output.is_empty());
    assert_eq!(state, ProgramState::new());
}

#[test]
fn test_empty_else_branch_list() {
    let (state, _) = run("x := 1; IF 0 THEN x := 2 ELSE FI.", &[]).unwrap();
    assert_eq!(state.get("x").unwrap(), 1.0);
}

#[test]
fn test_read_rejects_non_finite_input() {
    let err = run("READ a.", &["inf"]).unwrap_err();
    assert_eq!(
        err,
        Error::InvalidInput {
            name: "a".to_string(),
            input: "inf".to_string()
        }
    );
    assert!(run("READ a.", &["NaN"]).is_err());
}

// ====================
// Program size
// ====================

#[test]
fn test_twenty_thousand_statements() {
    let source = format!("x := 0;\n{}PRINT x .", "x := x + 1;\n".repeat(20_000));
    let (state, output) = run(&source, &[]).unwrap();
    assert_eq!(state.get("x").unwrap(), 20_000.0);
    assert_eq!(output, vec!["20000"]);
}

#[test]
fn test_long_print_list() {
    let names = vec!["v"; 5_000].join(", ");
    let (_, output) = run(&format!("v := 7; PRINT {} .", names), &[]).unwrap();
    assert_eq!(output.len(), 5_000);
    assert!(output.iter().all(|line| line == "7"));
}
