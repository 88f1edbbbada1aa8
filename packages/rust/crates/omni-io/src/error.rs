//! Error types for file I/O operations.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.

use thiserror::Error;

/// Error types for file I/O operations.
///
/// Each variant represents a specific failure mode in the read or write path.
#[derive(Error, Debug)]
pub enum IoError {
    /// File does not exist.
    #[error("File not found: {0}")]
    NotFound(String),

    /// File exceeds size limit.
    #[error("File too large: {0} bytes (limit: {1})")]
    TooLarge(u64, u64),

    /// File contains binary content (NULL bytes detected).
    #[error("Binary file detected")]
    BinaryFile,

    /// Content is not valid UTF-8.
    #[error("UTF-8 decoding error")]
    Encoding,

    /// Path escapes the repository root.
    #[error("Path outside repository root: {0}")]
    OutsideRoot(String),

    /// Low-level I/O error from std::io.
    #[error("IO error: {0}")]
    System(#[from] std::io::Error),

    /// Renaming the staged temp file over the target failed.
    #[error("Failed to persist {path}: {source}")]
    Persist {
        /// Target path.
        path: String,
        /// Underlying rename error.
        source: std::io::Error,
    },
}

impl IoError {
    /// Whether the error signals an absent file.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::System(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
