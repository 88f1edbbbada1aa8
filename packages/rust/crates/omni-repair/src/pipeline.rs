//! End-to-end repair pipeline.
//!
//! ```text
//! files → skeletons → (oracle) element listing → resolve
//!       → (oracle) line-level listing → resolve → LocationMap
//!       → (oracle × max_samples, parallel) SEARCH/REPLACE text → FixCandidates
//!       → sequential application → AppliedFixes
//! ```
//!
//! Oracle failures at any stage are reported and the run continues with
//! whatever it has; the report is always partial rather than absent.

use omni_ast::create_skeleton;
use omni_edit::{ApplyConfig, BatchApplier, EditError, PatchApplier, parse_edit_operations};
use omni_io::{FileProvider, LineEnding};
use omni_types::{
    AppliedFix, CollectingSink, Diagnostic, DiagnosticKind, DiagnosticSink,
};
use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::RepairConfig;
use crate::error::{RepairError, read_failure_kind};
use crate::fixes::{FixCandidate, collect_candidates};
use crate::listing::{parse_file_listing, parse_location_listing};
use crate::oracle::{Oracle, SamplingParams};
use crate::prompts::PromptBuilder;
use crate::resolver::{FileDescriptors, LocationMap, LocationResolver};

/// What to repair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RepairRequest {
    /// Natural-language problem statement.
    pub problem: String,
    /// Candidate files, most important first. When empty, the oracle picks
    /// from `structure`.
    #[serde(default)]
    pub candidate_files: Vec<String>,
    /// Caller-supplied repository layout shown to the oracle.
    #[serde(default)]
    pub structure: Option<String>,
}

/// Everything a run produced, including its failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct RepairReport {
    /// Files that were analysed.
    pub files: Vec<String>,
    /// Final edit locations.
    pub locations: LocationMap,
    /// Every candidate from every sample.
    pub candidates: Vec<FixCandidate>,
    /// Outcomes of the applied sample.
    pub fixes: Vec<AppliedFix>,
    /// Resolution, parsing, application and oracle failures.
    pub diagnostics: Vec<Diagnostic>,
}

impl RepairReport {
    /// Number of fixes written to disk.
    #[must_use]
    pub fn applied_count(&self) -> usize {
        self.fixes.iter().filter(|f| f.applied).count()
    }
}

/// Orchestrates the oracle, the resolver and the applier.
pub struct RepairPipeline<'a> {
    oracle: &'a dyn Oracle,
    provider: &'a dyn FileProvider,
    config: RepairConfig,
    prompts: PromptBuilder,
}

impl<'a> RepairPipeline<'a> {
    /// Pipeline reading and writing through `provider`.
    ///
    /// # Errors
    /// `RepairError::Template` when a prompt template fails to compile.
    pub fn new(
        oracle: &'a dyn Oracle,
        provider: &'a dyn FileProvider,
        config: RepairConfig,
    ) -> Result<Self, RepairError> {
        Ok(Self {
            oracle,
            provider,
            config,
            prompts: PromptBuilder::new(config.label_excerpts)?,
        })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &RepairConfig {
        &self.config
    }

    /// Run every stage and apply the first sample that proposed any edit.
    ///
    /// Other samples stay in `candidates`; apply them to separate checkouts
    /// with [`Self::apply`].
    pub fn run(&self, request: &RepairRequest) -> RepairReport {
        let sink = CollectingSink::new();
        let mut report = RepairReport {
            files: self.select_files(request, &sink),
            ..RepairReport::default()
        };

        match self.locate(request, &report.files, &sink) {
            Ok(locations) => report.locations = locations,
            Err(e) => {
                sink.report(stage_failure("locate", &e));
                report.diagnostics = sink.take();
                return report;
            }
        }

        match self.generate(&request.problem, &report.locations, &sink) {
            Ok(candidates) => report.candidates = candidates,
            Err(e) => sink.report(stage_failure("generate", &e)),
        }

        if let Some(first) = report.candidates.iter().map(|c| c.sample).min() {
            let chosen: Vec<FixCandidate> = report
                .candidates
                .iter()
                .filter(|c| c.sample == first)
                .cloned()
                .collect();
            report.fixes = self.apply(&chosen, self.provider, &sink);
        }

        report.diagnostics = sink.take();
        info!(
            files = report.files.len(),
            locations = report.locations.total_locations(),
            candidates = report.candidates.len(),
            applied = report.applied_count(),
            diagnostics = report.diagnostics.len(),
            "repair run finished"
        );
        report
    }

    /// Candidate files: the caller's list, else the oracle's pick from the
    /// structure listing; at most `top_n_files` either way.
    pub fn select_files(&self, request: &RepairRequest, sink: &dyn DiagnosticSink) -> Vec<String> {
        let top_n = self.config.top_n_files;
        if !request.candidate_files.is_empty() {
            return request.candidate_files.iter().take(top_n).cloned().collect();
        }
        let Some(structure) = request.structure.as_deref() else {
            warn!("no candidate files and no structure listing");
            return Vec::new();
        };
        let prompt = match self.prompts.file_listing(&request.problem, structure, top_n) {
            Ok(prompt) => prompt,
            Err(e) => {
                sink.report(stage_failure("file listing", &e.into()));
                return Vec::new();
            }
        };
        self.consult("file listing", &prompt, self.localization_params(), sink)
            .map(|text| parse_file_listing(&text).into_iter().take(top_n).collect())
            .unwrap_or_default()
    }

    /// Ask the oracle which elements of `files` to inspect, from skeletons.
    ///
    /// # Errors
    /// `RepairError::Template` when the prompt cannot be rendered.
    pub fn locate_elements(
        &self,
        problem: &str,
        files: &[String],
        sink: &dyn DiagnosticSink,
    ) -> Result<Vec<FileDescriptors>, RepairError> {
        let mut skeletons = Vec::new();
        for file in files {
            match self.provider.read_lossy(file) {
                Ok(raw) => {
                    let skeleton = create_skeleton(&LineEnding::normalize(&raw), true);
                    if skeleton.is_empty() {
                        debug!(file = %file, "empty skeleton; skipped");
                    } else {
                        skeletons.push((file.clone(), skeleton));
                    }
                }
                Err(e) => sink.report(Diagnostic::new(
                    read_failure_kind(&e),
                    Some(file),
                    e.to_string(),
                )),
            }
        }
        if skeletons.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = self.prompts.element_listing(problem, &skeletons)?;
        Ok(self
            .consult("element listing", &prompt, self.localization_params(), sink)
            .map(|text| parse_location_listing(&text))
            .unwrap_or_default())
    }

    /// Resolve element descriptors, then narrow them with a line-level pass.
    ///
    /// Falls back to the element-level locations when the line-level pass
    /// resolves nothing.
    ///
    /// # Errors
    /// `RepairError::Template` or `RepairError::Ast` on setup failures.
    pub fn locate(
        &self,
        request: &RepairRequest,
        files: &[String],
        sink: &dyn DiagnosticSink,
    ) -> Result<LocationMap, RepairError> {
        let descriptors = self.locate_elements(&request.problem, files, sink)?;
        let mut resolver = LocationResolver::new(self.provider, self.config.context_window)?;
        let elements = resolver.resolve(&descriptors, sink);
        if elements.is_empty() {
            return Ok(elements);
        }

        let prompt = self.prompts.line_level(&request.problem, &elements)?;
        let Some(text) = self.consult("line level", &prompt, self.localization_params(), sink)
        else {
            return Ok(elements);
        };
        let lines = resolver.resolve(&parse_location_listing(&text), sink);
        if lines.is_empty() {
            debug!("line-level pass resolved nothing; keeping element locations");
            return Ok(elements);
        }
        Ok(lines)
    }

    /// Request `max_samples` independent repair suggestions in parallel.
    ///
    /// # Errors
    /// `RepairError::Template` when the prompt cannot be rendered.
    pub fn generate(
        &self,
        problem: &str,
        locations: &LocationMap,
        sink: &dyn DiagnosticSink,
    ) -> Result<Vec<FixCandidate>, RepairError> {
        if locations.is_empty() {
            return Ok(Vec::new());
        }
        let prompt = self.prompts.repair(problem, locations)?;
        let params = SamplingParams {
            temperature: Some(self.config.repair_temperature),
            max_tokens: Some(self.config.max_tokens),
        };

        let per_sample: Vec<Vec<FixCandidate>> = (0..self.config.max_samples)
            .into_par_iter()
            .map(|sample| match self.oracle.complete(&prompt, &params) {
                Ok(text) => {
                    let ops = parse_edit_operations(&text, sink);
                    debug!(sample, operations = ops.len(), "repair sample parsed");
                    collect_candidates(ops, locations, sample)
                }
                Err(e) => {
                    sink.report(Diagnostic::new(
                        DiagnosticKind::OracleFailed,
                        None,
                        format!("repair sample {sample}: {e}"),
                    ));
                    Vec::new()
                }
            })
            .collect();

        Ok(per_sample.into_iter().flatten().collect())
    }

    /// Apply `candidates` in order through `provider`.
    ///
    /// Hard write failures are reported to `sink` and produce no fix entry.
    pub fn apply(
        &self,
        candidates: &[FixCandidate],
        provider: &dyn FileProvider,
        sink: &dyn DiagnosticSink,
    ) -> Vec<AppliedFix> {
        let ops: Vec<_> = candidates.iter().map(|c| c.operation.clone()).collect();
        let applier = PatchApplier::new(
            provider,
            ApplyConfig {
                hint_slack: self.config.hint_slack,
            },
        );
        let report = BatchApplier::new(applier).apply_all(&ops, sink);

        let mut fixes = Vec::with_capacity(report.results.len());
        for result in report.results {
            match result {
                Ok(fix) => fixes.push(fix),
                // Already reported by the applier.
                Err(EditError::Write { .. }) => {}
                Err(e @ (EditError::FileAbandoned(_) | EditError::Io(_))) => {
                    sink.report(Diagnostic::new(
                        DiagnosticKind::WriteFailed,
                        e.file(),
                        e.to_string(),
                    ));
                }
            }
        }
        fixes
    }

    fn localization_params(&self) -> SamplingParams {
        SamplingParams {
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_tokens),
        }
    }

    fn consult(
        &self,
        stage: &str,
        prompt: &str,
        params: SamplingParams,
        sink: &dyn DiagnosticSink,
    ) -> Option<String> {
        debug!(stage, prompt_chars = prompt.len(), "consulting oracle");
        match self.oracle.complete(prompt, &params) {
            Ok(text) => Some(text),
            Err(e) => {
                sink.report(Diagnostic::new(
                    DiagnosticKind::OracleFailed,
                    None,
                    format!("{stage}: {e}"),
                ));
                None
            }
        }
    }
}

fn stage_failure(stage: &str, error: &RepairError) -> Diagnostic {
    Diagnostic::new(
        error.diagnostic_kind(),
        None,
        format!("{stage} stage aborted: {error}"),
    )
}
