//! Tests for LOOP/REPEAT and BREAK targeting

use descartes::{
    Error, ErrorKind, Evaluator, EvaluatorConfig, Parser, ProgramState, Result, ScriptedConsole,
};

fn run(source: &str, inputs: &[&str]) -> Result<(ProgramState, Vec<String>)> {
    run_with_config(source, inputs, EvaluatorConfig::default())
}

fn run_with_config(
    source: &str,
    inputs: &[&str],
    config: EvaluatorConfig,
) -> Result<(ProgramState, Vec<String>)> {
    let program = Parser::from_source("loops.dc", source).parse()?;
    let mut evaluator =
        Evaluator::with_config(ScriptedConsole::new(inputs.iter().copied()), config);
    evaluator.execute(&program)?;
    let (state, console) = evaluator.into_parts();
    Ok((state, console.output))
}

// ====================
// Single loops
// ====================

#[test]
fn test_sum_one_to_ten() {
    let source = "
        sum := 0; i := 0;
        LOOP L:
            i := i + 1;
            sum := sum + i;
            IF i >= 10 THEN BREAK L FI
        REPEAT;
        PRINT sum
    .";
    let (state, output) = run(source, &[]).unwrap();
    assert_eq!(output, vec!["55"]);
    assert_eq!(state.get("i").unwrap(), 10.0);
    assert_eq!(state.loop_depth(), 0);
    assert!(!state.is_unwinding());
}

#[test]
fn test_break_skips_rest_of_body() {
    let source = "
        n := 0;
        LOOP L:
            n := n + 1;
            BREAK;
            n := 100
        REPEAT
    .";
    let (state, _) = run(source, &[]).unwrap();
    assert_eq!(state.get("n").unwrap(), 1.0);
}

#[test]
fn test_statements_after_loop_run() {
    let (state, _) = run("LOOP L: BREAK L REPEAT; after := 1 .", &[]).unwrap();
    assert_eq!(state.get("after").unwrap(), 1.0);
}

#[test]
fn test_loop_driven_by_read() {
    let source = "
        total := 0;
        LOOP input:
            READ v;
            IF v < 0 THEN BREAK input FI;
            total := total + v
        REPEAT;
        PRINT total
    .";
    let (_, output) = run(source, &["3", "4", "5", "-1", "99"]).unwrap();
    assert_eq!(output, vec!["12"]);
}

// ====================
// Nested loops
// ====================

#[test]
fn test_break_outer_exits_both_loops() {
    let source = "
        count := 0;
        LOOP outer:
            LOOP inner:
                count := count + 1;
                BREAK outer;
                count := 100
            REPEAT;
            count := 200
        REPEAT
    .";
    let (state, _) = run(source, &[]).unwrap();
    assert_eq!(state.get("count").unwrap(), 1.0);
    assert_eq!(state.loop_depth(), 0);
}

#[test]
fn test_break_inner_resumes_outer_body() {
    let source = "
        rounds := 0; innerhits := 0;
        LOOP outer:
            rounds := rounds + 1;
            LOOP inner:
                innerhits := innerhits + 1;
                BREAK inner
            REPEAT;
            IF rounds >= 3 THEN BREAK outer FI
        REPEAT
    .";
    let (state, _) = run(source, &[]).unwrap();
    assert_eq!(state.get("rounds").unwrap(), 3.0);
    assert_eq!(state.get("innerhits").unwrap(), 3.0);
}

#[test]
fn test_bare_break_targets_innermost_loop() {
    let source = "
        i := 0; total := 0;
        LOOP outer:
            i := i + 1;
            j := 0;
            LOOP inner:
                j := j + 1;
                total := total + 1;
                IF j >= 2 THEN BREAK FI
            REPEAT;
            IF i >= 4 THEN BREAK FI
        REPEAT
    .";
    let (state, _) = run(source, &[]).unwrap();
    assert_eq!(state.get("i").unwrap(), 4.0);
    assert_eq!(state.get("total").unwrap(), 8.0);
}

#[test]
fn test_break_inside_if_inside_nested_loops() {
    let source = "
        i := 0; j := 0;
        LOOP a:
            i := i + 1;
            LOOP b:
                j := j + 1;
                IF j = 5 THEN
                    IF i = 1 THEN BREAK a FI
                FI
            REPEAT
        REPEAT
    .";
    let (state, _) = run(source, &[]).unwrap();
    assert_eq!(state.get("i").unwrap(), 1.0);
    assert_eq!(state.get("j").unwrap(), 5.0);
}

#[test]
fn test_same_name_nested_break_targets_innermost_match() {
    let source = "
        outerruns := 0;
        LOOP L:
            outerruns := outerruns + 1;
            LOOP L:
                BREAK L
            REPEAT;
            IF outerruns >= 2 THEN BREAK L FI
        REPEAT
    .";
    let (state, _) = run(source, &[]).unwrap();
    assert_eq!(state.get("outerruns").unwrap(), 2.0);
}

#[test]
fn test_sibling_loops_with_same_name() {
    let source = "
        a := 0; b := 0;
        LOOP L: a := a + 1; IF a = 2 THEN BREAK L FI REPEAT;
        LOOP L: b := b + 1; IF b = 3 THEN BREAK L FI REPEAT
    .";
    let (state, _) = run(source, &[]).unwrap();
    assert_eq!(state.get("a").unwrap(), 2.0);
    assert_eq!(state.get("b").unwrap(), 3.0);
}

// ====================
// Misuse
// ====================

#[test]
fn test_break_outside_loop_is_internal_error() {
    let err = run("x := 1; BREAK .", &[]).unwrap_err();
    assert_eq!(err, Error::LoopStackUnderflow { target: None });
    assert_eq!(err.kind(), ErrorKind::Internal);
}

#[test]
fn test_break_unknown_name_is_internal_error() {
    let err = run("LOOP L: BREAK nowhere REPEAT .", &[]).unwrap_err();
    assert_eq!(
        err,
        Error::LoopStackUnderflow {
            target: Some("nowhere".to_string())
        }
    );
    assert_eq!(err.kind(), ErrorKind::Internal);
}

#[test]
fn test_iteration_guard_stops_runaway_loop() {
    let config = EvaluatorConfig::default().with_max_loop_iterations(50);
    let err = run_with_config("n := 0; LOOP L: n := n + 1 REPEAT .", &[], config).unwrap_err();
    assert_eq!(err, Error::TooManyIterations { limit: 50 });
    assert_eq!(err.kind(), ErrorKind::Runtime);
}

#[test]
fn test_iteration_guard_allows_finite_loops() {
    let config = EvaluatorConfig::default().with_max_loop_iterations(10);
    let source = "n := 0; LOOP L: n := n + 1; IF n = 10 THEN BREAK FI REPEAT .";
    let (state, _) = run_with_config(source, &[], config).unwrap();
    assert_eq!(state.get("n").unwrap(), 10.0);
}
