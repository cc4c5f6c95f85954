//! Error types for the Descartes interpreter

use thiserror::Error;

/// Descartes interpreter errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Parse errors
    /// Syntax error encountered while scanning or parsing
    ///
    /// **Triggered by:** A malformed token or a missing terminal
    /// **Example:** `x := 5` (missing terminating `.`)
    #[error("{file}: line {line}: {message}")]
    SyntaxError {
        /// Name of the source file being parsed
        file: String,
        /// Line number where the discrepancy was detected (1-indexed)
        line: usize,
        /// Expected-vs-found description
        message: String,
    },

    // Runtime errors
    /// Reference to an unassigned variable
    ///
    /// **Triggered by:** Reading or printing a variable before assignment
    /// **Example:** `PRINT x.` (when x was never assigned or read)
    #[error("Unrecognized variable name: {name}")]
    UndefinedVariable {
        /// Variable name
        name: String,
    },

    /// Division by zero error
    ///
    /// **Triggered by:** A divisor that evaluates to exactly `0`
    /// **Example:** `x := 1 / 0.`
    #[error("Division by zero")]
    DivisionByZero,

    /// A READ statement received text that is not a number
    #[error("Invalid numeric input for {name}: \"{input}\"")]
    InvalidInput {
        /// Variable being read
        name: String,
        /// Offending input text
        input: String,
    },

    /// A READ statement found the input stream exhausted
    #[error("Unexpected end of input while reading {name}")]
    UnexpectedEndOfInput {
        /// Variable being read
        name: String,
    },

    /// Console read or write failure
    #[error("I/O error: {0}")]
    Io(String),

    /// A single loop exceeded the configured iteration guard
    #[error("Too many iterations (limit: {limit})")]
    TooManyIterations {
        /// Maximum allowed iterations of one loop
        limit: usize,
    },

    // Interpreter defects
    /// The loop-name stack emptied while a BREAK was unwinding
    #[error("Loop stack underflow while breaking {}", .target.as_deref().unwrap_or("innermost loop"))]
    LoopStackUnderflow {
        /// Loop name the BREAK was looking for (`None` for the innermost loop)
        target: Option<String>,
    },

    /// Internal consistency violation
    #[error("Internal interpreter error: {0}")]
    Internal(String),
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Detected while turning source text into a tree
    Syntax,
    /// Detected while evaluating a well-formed program
    Runtime,
    /// An interpreter defect rather than a program error
    Internal,
}

impl Error {
    /// Create a syntax error for the given file and line
    pub fn syntax(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Error::SyntaxError {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// Create an internal error with a message
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SyntaxError { .. } => ErrorKind::Syntax,

            Error::UndefinedVariable { .. }
            | Error::DivisionByZero
            | Error::InvalidInput { .. }
            | Error::UnexpectedEndOfInput { .. }
            | Error::Io(_)
            | Error::TooManyIterations { .. } => ErrorKind::Runtime,

            Error::LoopStackUnderflow { .. } | Error::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Line number for syntax errors
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::SyntaxError { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

/// Result type for Descartes operations
pub type Result<T> = std::result::Result<T, Error>;
