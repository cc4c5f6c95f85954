//! Runtime execution for Descartes programs

mod console;
mod evaluator;
mod state;

pub use console::{Console, ScriptedConsole, StdConsole, StreamConsole};
pub use evaluator::{eval_expr, Evaluator, EvaluatorConfig};
pub use state::ProgramState;
