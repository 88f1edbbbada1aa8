//! Patch applier: one `EditOperation` against the current file content.
//!
//! Read, match, splice, write. The file is re-read on every call so that a
//! sequence of operations always sees the latest on-disk state.

use omni_io::{FileProvider, LineEnding};
use omni_types::{AppliedFix, Diagnostic, DiagnosticKind, DiagnosticSink, EditOperation};
use tracing::debug;

use crate::diff::file_diff;
use crate::error::EditError;
use crate::matcher::{find_match, splice, splice_raw};
use crate::types::ApplyConfig;

/// Applies edit operations through a [`FileProvider`].
///
/// # Example
///
/// ```rust,ignore
/// use omni_edit::{ApplyConfig, PatchApplier};
/// use omni_io::FsProvider;
/// use omni_types::TracingSink;
///
/// let repo = FsProvider::new("/checkout");
/// let applier = PatchApplier::new(&repo, ApplyConfig::default());
/// let fix = applier.apply(&op, &TracingSink)?;
/// assert!(fix.applied);
/// ```
pub struct PatchApplier<'a> {
    provider: &'a dyn FileProvider,
    config: ApplyConfig,
}

impl<'a> PatchApplier<'a> {
    /// Applier writing through `provider`.
    #[must_use]
    pub fn new(provider: &'a dyn FileProvider, config: ApplyConfig) -> Self {
        Self { provider, config }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> ApplyConfig {
        self.config
    }

    /// Apply `op` to its target file.
    ///
    /// An unreadable file or an unmatched `old_text` yields a rejected fix and
    /// a diagnostic; the file is left untouched. Files that are not valid
    /// UTF-8 are unreadable. Only the edited span is rewritten, so untouched
    /// lines keep their bytes and line endings.
    ///
    /// # Errors
    /// `EditError::Write` when the modified content cannot be written back.
    pub fn apply(
        &self,
        op: &EditOperation,
        sink: &dyn DiagnosticSink,
    ) -> Result<AppliedFix, EditError> {
        let raw = match self.provider.read(&op.file) {
            Ok(raw) => raw,
            Err(e) => {
                let kind = if e.is_not_found() {
                    DiagnosticKind::NotFound
                } else {
                    DiagnosticKind::Unreadable
                };
                sink.report(Diagnostic::new(
                    kind,
                    Some(&op.file),
                    format!("cannot read target: {e}"),
                ));
                return Ok(AppliedFix::rejected(op.clone()));
            }
        };
        let content = LineEnding::normalize(&raw);

        let Some(found) = find_match(&content, &op.old_text, op.line_hint, self.config.hint_slack)
        else {
            let detail = match op.line_hint {
                Some(hint) => format!("SEARCH text not found around {hint}"),
                None => "SEARCH text not found".to_string(),
            };
            sink.report(Diagnostic::new(
                DiagnosticKind::MatchNotFound,
                Some(&op.file),
                detail,
            ));
            return Ok(AppliedFix::rejected(op.clone()));
        };

        debug!(
            file = %op.file,
            line = found.line,
            strategy = ?found.strategy,
            "SEARCH text matched"
        );

        let modified = splice(&content, &found, &op.new_text);
        let diff = file_diff(&op.file, &content, &modified);

        if let Err(source) = self
            .provider
            .write(&op.file, &splice_raw(&raw, &found, &op.new_text))
        {
            sink.report(Diagnostic::new(
                DiagnosticKind::WriteFailed,
                Some(&op.file),
                source.to_string(),
            ));
            return Err(EditError::Write {
                file: op.file.clone(),
                source,
            });
        }

        debug!(file = %op.file, line = found.line, "edit applied");
        Ok(AppliedFix::applied(op.clone(), found.line, diff))
    }
}
