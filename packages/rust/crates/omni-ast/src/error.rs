//! Error types for structural analysis.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.

use omni_io::IoError;
use thiserror::Error;

/// Error types for skeleton and symbol operations.
#[derive(Error, Debug)]
pub enum AstError {
    /// Target file does not exist.
    #[error("File not found: {0}")]
    NotFound(String),

    /// Source could not be parsed; the file cannot be safely edited.
    #[error("Syntax invalid at line {line}: {detail}")]
    SyntaxInvalid {
        /// First offending line (1-based).
        line: usize,
        /// Parser description of the problem.
        detail: String,
    },

    /// Grammar could not be loaded into the parser.
    #[error("Language error: {0}")]
    Language(String),

    /// Other file I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] IoError),
}
