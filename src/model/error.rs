//! Error types for the panelsync shell.
//!
//! The synchronization core itself has no user-visible error states: missing
//! data, stale container references and interaction races all degrade to "no
//! visual change". The types here cover the edges around it, where input is
//! read, parsed and configured.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned by the replay binary
//!   - [`InputError`] - Trace file/stdin reading failures
//!   - [`ParseError`] - Malformed trace lines (non-fatal, reported and skipped)
//!   - [`ConfigError`](crate::config::ConfigError) - Config file and value failures
//!   - [`LoggingError`](crate::logging::LoggingError) - Tracing initialization failures

use crate::config::ConfigError;
use crate::logging::LoggingError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all failure modes.
///
/// Domain-specific errors convert via `From`, so `main` composes with `?`.
///
/// # Recovery Behavior
///
/// - **Input/Config/Logging errors**: Fatal - reported on stderr, non-zero exit
/// - **Parse errors**: Non-fatal - reported per line, replay continues
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read the event trace.
    #[error("Failed to read input: {0}")]
    InputRead(#[from] InputError),

    /// Failed to parse a trace line.
    #[error("Failed to parse trace event: {0}")]
    Parse(#[from] ParseError),

    /// Configuration could not be loaded or resolved.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tracing could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Writing the replay report failed.
    #[error("Output error: {0}")]
    Output(#[source] std::io::Error),
}

/// Errors encountered when reading a trace from a file or stdin.
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified trace file does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use panelsync::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.jsonl")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.jsonl"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was attempted.
        path: PathBuf,
    },

    /// No trace file was given and stdin is an interactive terminal.
    #[error("No input source: provide a trace file path or pipe data to stdin")]
    NoInput,

    /// Generic I/O error reading from the input source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors encountered when parsing trace lines.
///
/// Every variant carries the 1-based line number so reports can point at the
/// offending line in an editor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The line is not valid JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use panelsync::model::error::ParseError;
    ///
    /// let err = ParseError::InvalidJson {
    ///     line: 42,
    ///     message: "expected value".to_string()
    /// };
    /// assert!(err.to_string().contains("line 42"));
    /// ```
    #[error("Invalid JSON at line {line}: {message}")]
    InvalidJson {
        /// 1-based line number.
        line: usize,
        /// The JSON parser error message.
        message: String,
    },

    /// A required field is absent.
    #[error("Missing required field '{field}' at line {line}")]
    MissingField {
        /// 1-based line number.
        line: usize,
        /// The missing JSON key.
        field: &'static str,
    },

    /// The JSON is well formed but does not describe a known event.
    #[error("Invalid event at line {line}: {message}")]
    InvalidEvent {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the event.
        message: String,
    },
}

impl ParseError {
    /// The 1-based line number the error refers to.
    pub fn line(&self) -> usize {
        match self {
            ParseError::InvalidJson { line, .. }
            | ParseError::MissingField { line, .. }
            | ParseError::InvalidEvent { line, .. } => *line,
        }
    }
}
