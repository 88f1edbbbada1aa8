//! Batch application of edit operations.
//!
//! Operations run strictly in order, one read-modify-write at a time, so
//! line offsets seen by later operations reflect earlier edits. A failed
//! operation never stops the batch; a failed write only abandons its own file.

use std::collections::HashSet;

use omni_types::{AppliedFix, DiagnosticSink, EditOperation};
use tracing::{info, warn};

use crate::applier::PatchApplier;
use crate::error::EditError;

/// Outcomes of a batch, one per operation, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Per-operation result.
    pub results: Vec<Result<AppliedFix, EditError>>,
}

impl BatchReport {
    /// Fixes that completed (applied or rejected), skipping hard errors.
    pub fn fixes(&self) -> impl Iterator<Item = &AppliedFix> {
        self.results.iter().filter_map(|r| r.as_ref().ok())
    }

    /// Number of operations written to disk.
    #[must_use]
    pub fn applied_count(&self) -> usize {
        self.fixes().filter(|f| f.applied).count()
    }

    /// Number of operations rejected without touching the file.
    #[must_use]
    pub fn rejected_count(&self) -> usize {
        self.fixes().filter(|f| !f.applied).count()
    }

    /// Number of hard failures.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_err()).count()
    }

    /// Files modified by at least one applied operation, first-touch order.
    #[must_use]
    pub fn modified_files(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.fixes()
            .filter(|f| f.applied)
            .map(|f| f.operation.file.clone())
            .filter(|file| seen.insert(file.clone()))
            .collect()
    }
}

/// Sequential applier for a list of operations.
pub struct BatchApplier<'a> {
    applier: PatchApplier<'a>,
}

impl<'a> BatchApplier<'a> {
    /// Wrap a single-operation applier.
    #[must_use]
    pub fn new(applier: PatchApplier<'a>) -> Self {
        Self { applier }
    }

    /// Apply every operation, in order.
    pub fn apply_all(&self, ops: &[EditOperation], sink: &dyn DiagnosticSink) -> BatchReport {
        let mut abandoned: HashSet<&str> = HashSet::new();
        let mut report = BatchReport::default();

        for op in ops {
            if abandoned.contains(op.file.as_str()) {
                report
                    .results
                    .push(Err(EditError::FileAbandoned(op.file.clone())));
                continue;
            }
            let result = self.applier.apply(op, sink);
            if let Err(e) = &result {
                warn!(file = %op.file, error = %e, "abandoning file after failed write");
                abandoned.insert(op.file.as_str());
            }
            report.results.push(result);
        }

        info!(
            operations = ops.len(),
            applied = report.applied_count(),
            rejected = report.rejected_count(),
            errors = report.error_count(),
            "batch applied"
        );
        report
    }
}
