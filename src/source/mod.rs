//! Trace input sources.
//!
//! A trace is read once, whole, from either:
//! - a file given on the command line
//! - piped stdin (`cat trace.jsonl | panelsync`)

use crate::model::error::InputError;
use std::io::{BufRead, BufReader, IsTerminal, Read};
use std::path::PathBuf;

/// Where the trace comes from.
///
/// Sum type enforces exactly one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Read-once file input.
    File(PathBuf),
    /// Piped stdin.
    Stdin,
}

impl InputSource {
    /// Read every line of the source.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` for I/O errors.
    pub fn read_lines(&self) -> Result<Vec<String>, InputError> {
        match self {
            InputSource::File(path) => {
                let file = std::fs::File::open(path).map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => InputError::FileNotFound { path: path.clone() },
                    _ => InputError::Io(e),
                })?;
                read_lines_from(file)
            }
            InputSource::Stdin => read_lines_from(std::io::stdin().lock()),
        }
    }
}

/// Detect the input source.
///
/// # Logic:
/// 1. If a file path is provided: use it (it must exist)
/// 2. If stdin is piped: use stdin
/// 3. Else: `InputError::NoInput`
///
/// # Errors
///
/// Returns `InputError::FileNotFound` for a missing file and
/// `InputError::NoInput` when there is nothing to read.
pub fn detect_input_source(file: Option<PathBuf>) -> Result<InputSource, InputError> {
    match file {
        Some(path) if !path.exists() => Err(InputError::FileNotFound { path }),
        Some(path) => Ok(InputSource::File(path)),
        None if std::io::stdin().is_terminal() => Err(InputError::NoInput),
        None => Ok(InputSource::Stdin),
    }
}

/// Read all lines from a reader, keeping blank lines so line numbers in
/// parse errors match the input.
///
/// # Errors
///
/// Returns `InputError::Io` for I/O errors (including invalid UTF-8).
pub fn read_lines_from(reader: impl Read) -> Result<Vec<String>, InputError> {
    BufReader::new(reader)
        .lines()
        .map(|line| line.map_err(InputError::from))
        .collect()
}
