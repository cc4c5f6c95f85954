//! Console I/O used by READ and PRINT

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::{Error, Result};

/// Console trait - the evaluator's only route to the outside world
pub trait Console {
    /// Reads one numeric value for the variable `name`
    fn read_number(&mut self, name: &str) -> Result<f64>;

    /// Writes the current value of `name`
    fn write_value(&mut self, name: &str, value: f64) -> Result<()>;

    /// Writes an informational line (used for READ echoes)
    fn write_line(&mut self, line: &str) -> Result<()>;
}

/// Parses one input word as a finite number for `name`
fn parse_number(name: &str, word: &str) -> Result<f64> {
    match word.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::InvalidInput {
            name: name.to_string(),
            input: word.to_string(),
        }),
    }
}

/// Console over any buffered reader and writer
///
/// Input is consumed one whitespace-separated word per READ; words left on a
/// line stay queued for the next READ.
pub struct StreamConsole<R, W> {
    input: R,
    output: W,
    pending: VecDeque<String>,
}

impl<R: BufRead, W: Write> StreamConsole<R, W> {
    /// Creates a console reading from `input` and writing to `output`
    pub fn new(input: R, output: W) -> Self {
        StreamConsole {
            input,
            output,
            pending: VecDeque::new(),
        }
    }

    /// Consumes the console and returns the writer
    pub fn into_output(self) -> W {
        self.output
    }

    fn next_word(&mut self) -> Result<Option<String>> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
        Ok(self.pending.pop_front())
    }
}

impl<R: BufRead, W: Write> Console for StreamConsole<R, W> {
    fn read_number(&mut self, name: &str) -> Result<f64> {
        self.output.flush()?;
        match self.next_word()? {
            Some(word) => parse_number(name, &word),
            None => Err(Error::UnexpectedEndOfInput {
                name: name.to_string(),
            }),
        }
    }

    fn write_value(&mut self, _name: &str, value: f64) -> Result<()> {
        writeln!(self.output, "{}", value)?;
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }
}

/// Console bound to the process's stdin and stdout
pub type StdConsole = StreamConsole<io::StdinLock<'static>, io::Stdout>;

impl StdConsole {
    /// Creates a console on the process's standard streams
    pub fn stdio() -> Self {
        StreamConsole::new(io::stdin().lock(), io::stdout())
    }
}

/// Console with preset input that records everything written
#[derive(Debug, Clone, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    /// Lines written so far
    pub output: Vec<String>,
}

impl ScriptedConsole {
    /// Creates a console that will answer READs from `inputs` in order
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedConsole {
            inputs: inputs.into_iter().map(Into::into).collect(),
            output: Vec::new(),
        }
    }

    /// Number of inputs not yet consumed
    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }
}

impl Console for ScriptedConsole {
    fn read_number(&mut self, name: &str) -> Result<f64> {
        match self.inputs.pop_front() {
            Some(word) => parse_number(name, word.trim()),
            None => Err(Error::UnexpectedEndOfInput {
                name: name.to_string(),
            }),
        }
    }

    fn write_value(&mut self, _name: &str, value: f64) -> Result<()> {
        self.output.push(value.to_string());
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        self.output.push(line.to_string());
        Ok(())
    }
}
