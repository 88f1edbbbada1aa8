//! Error types for patch application.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.
//! Only failures that may leave the repository in an unknown state are
//! errors; an unmatched SEARCH text is a rejected `AppliedFix`, not an error.

use omni_io::IoError;
use thiserror::Error;

/// Hard failures while applying edit operations.
#[derive(Error, Debug)]
pub enum EditError {
    /// Writing the modified file back failed.
    #[error("Failed to write {file}: {source}")]
    Write {
        /// Repository-relative file.
        file: String,
        /// Underlying I/O failure.
        source: IoError,
    },

    /// An earlier write to this file failed; later operations were skipped.
    #[error("Skipped {0}: an earlier write to this file failed")]
    FileAbandoned(String),

    /// Other file I/O error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),
}

impl EditError {
    /// File the failure concerns, when known.
    #[must_use]
    pub fn file(&self) -> Option<&str> {
        match self {
            Self::Write { file, .. } | Self::FileAbandoned(file) => Some(file),
            Self::Io(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_named_for_write_failures() {
        let abandoned = EditError::FileAbandoned("cart.py".to_string());
        assert_eq!(abandoned.file(), Some("cart.py"));
        let write = EditError::Write {
            file: "cart.py".to_string(),
            source: IoError::BinaryFile,
        };
        assert_eq!(write.file(), Some("cart.py"));
        assert_eq!(EditError::Io(IoError::BinaryFile).file(), None);
    }
}
