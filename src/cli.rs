use std::path::PathBuf;

use clap::Parser;
use descartes::EvaluatorConfig;

/// Exit status for a program that fails to parse
pub const EXIT_SYNTAX_ERROR: u8 = 1;
/// Exit status for a program that fails while running
pub const EXIT_RUNTIME_ERROR: u8 = 3;
/// Exit status for an interpreter defect
pub const EXIT_INTERNAL_ERROR: u8 = 4;
/// Exit status when the source file cannot be read
pub const EXIT_IO_ERROR: u8 = 5;

#[derive(Parser)]
#[command(name = "descartes")]
#[command(version, about = "Descartes 2 interpreter")]
pub struct Cli {
    /// Descartes source file to run
    pub file: PathBuf,

    /// Fail any single loop that runs its body more than N times
    #[arg(long, value_name = "N")]
    pub max_iterations: Option<usize>,

    /// Echo every value consumed by READ as `name = value`
    #[arg(long)]
    pub echo_reads: bool,

    /// Skip the symbol table dump after execution
    #[arg(long)]
    pub no_dump: bool,
}

impl Cli {
    /// Evaluator settings selected on the command line
    pub fn evaluator_config(&self) -> EvaluatorConfig {
        let config = EvaluatorConfig::default().with_echo_reads(self.echo_reads);
        match self.max_iterations {
            Some(limit) => config.with_max_loop_iterations(limit),
            None => config,
        }
    }
}
