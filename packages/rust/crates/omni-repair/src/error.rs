//! Error types for the repair pipeline.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.
//! Stage failures inside a run become diagnostics; these errors cover setup
//! (settings, templates, grammar) and direct oracle calls.

use std::path::PathBuf;

use omni_ast::AstError;
use omni_io::IoError;
use omni_types::DiagnosticKind;
use thiserror::Error;

use crate::oracle::OracleError;

/// Errors raised by the repair crate.
#[derive(Error, Debug)]
pub enum RepairError {
    /// The suggestion oracle failed.
    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    /// A settings file could not be read or parsed.
    #[error("Invalid settings file {path}: {detail}")]
    Settings {
        /// Offending file.
        path: PathBuf,
        /// Read or YAML error.
        detail: String,
    },

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// A prompt template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Structural analysis failed.
    #[error("Parser error: {0}")]
    Ast(#[from] AstError),
}

impl RepairError {
    /// Diagnostic class for a stage aborted by this error.
    #[must_use]
    pub fn diagnostic_kind(&self) -> DiagnosticKind {
        match self {
            Self::Oracle(_) => DiagnosticKind::OracleFailed,
            Self::Io(e) | Self::Ast(AstError::Io(e)) => read_failure_kind(e),
            Self::Ast(AstError::NotFound(_)) => DiagnosticKind::NotFound,
            Self::Ast(AstError::SyntaxInvalid { .. }) => DiagnosticKind::SyntaxInvalid,
            Self::Ast(AstError::Language(_)) | Self::Settings { .. } | Self::Template(_) => {
                DiagnosticKind::SetupFailed
            }
        }
    }
}

/// `NotFound` for absent files, `Unreadable` for everything else.
pub(crate) fn read_failure_kind(error: &IoError) -> DiagnosticKind {
    if error.is_not_found() {
        DiagnosticKind::NotFound
    } else {
        DiagnosticKind::Unreadable
    }
}
