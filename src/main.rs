mod cli;

use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use descartes::{parse_program, ErrorKind, Evaluator, StdConsole};

use cli::{Cli, EXIT_INTERNAL_ERROR, EXIT_IO_ERROR, EXIT_RUNTIME_ERROR, EXIT_SYNTAX_ERROR};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(EXIT_IO_ERROR)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let file_name = cli.file.display().to_string();
    let source = fs::read_to_string(&cli.file)
        .with_context(|| format!("Source file not found: \"{}\"", file_name))?;

    let program = match parse_program(&file_name, &source) {
        Ok(program) => program,
        Err(err) => {
            eprintln!("{}", err);
            return Ok(ExitCode::from(exit_code(err.kind())));
        }
    };

    let mut evaluator = Evaluator::with_config(StdConsole::stdio(), cli.evaluator_config());
    let outcome = evaluator.execute(&program);
    let (state, _console) = evaluator.into_parts();

    if !cli.no_dump {
        let mut stdout = io::stdout().lock();
        state.dump(&mut stdout)?;
        stdout.flush()?;
    }

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            match err.kind() {
                ErrorKind::Internal => eprintln!("Interpreter defect: {}", err),
                _ => eprintln!("A runtime error occurred: {}", err),
            }
            Ok(ExitCode::from(exit_code(err.kind())))
        }
    }
}

fn exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::Syntax => EXIT_SYNTAX_ERROR,
        ErrorKind::Runtime => EXIT_RUNTIME_ERROR,
        ErrorKind::Internal => EXIT_INTERNAL_ERROR,
    }
}
