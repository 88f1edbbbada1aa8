//! omni-types - Common type definitions for Omni Repair
//!
//! This crate provides the shared data model passed between the locating,
//! parsing and applying stages: symbols, edit locations, edit operations,
//! applied fixes and the diagnostics contract.
//!
//! # Schema Singularity
//! Types derive `schemars::JsonSchema` so that the artifacts produced by the
//! pipeline (location maps, edit operations, applied fixes) can be described
//! to external consumers with an authoritative JSON Schema.

#![allow(clippy::doc_markdown)]

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for shared type conversions
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    /// Unknown symbol kind keyword
    #[error("Unknown symbol kind: {0}")]
    UnknownKind(String),

    /// Line range with start after end or zero-based values
    #[error("Invalid line range: {0}-{1}")]
    InvalidRange(usize, usize),
}

// ============================================================================
// Symbols
// ============================================================================

/// Kind of program element a symbol descriptor refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// Synchronous or asynchronous function (methods included)
    Function,
    /// Class definition
    Class,
    /// Plain or type-annotated assignment target
    Variable,
}

impl SymbolKind {
    /// Keyword used in oracle listings (`function: foo`).
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
            Self::Variable => "variable",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Function => "Function",
            Self::Class => "Class",
            Self::Variable => "Variable",
        };
        f.write_str(label)
    }
}

impl FromStr for SymbolKind {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "function" | "method" => Ok(Self::Function),
            "class" => Ok(Self::Class),
            "variable" => Ok(Self::Variable),
            other => Err(TypesError::UnknownKind(other.to_string())),
        }
    }
}

/// A named program element to look up inside one file.
///
/// Methods are addressed as `ClassName.method_name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Symbol {
    /// What kind of definition to look for.
    pub kind: SymbolKind,
    /// Bare or qualified (`Class.method`) name.
    pub name: String,
}

impl Symbol {
    /// Create a new symbol descriptor.
    #[must_use]
    pub fn new(kind: SymbolKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Function descriptor shorthand.
    #[must_use]
    pub fn function(name: impl Into<String>) -> Self {
        Self::new(SymbolKind::Function, name)
    }

    /// Class descriptor shorthand.
    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(SymbolKind::Class, name)
    }

    /// Variable descriptor shorthand.
    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(SymbolKind::Variable, name)
    }
}

/// Split a qualified symbol name into `(class, member)`.
///
/// Nested owners scope to the innermost class, so `Outer.Inner.method` gives
/// `("Inner", "method")`. Returns `None` for bare names.
#[must_use]
pub fn split_qualified(name: &str) -> Option<(&str, &str)> {
    let (owner, member) = name.rsplit_once('.')?;
    let owner = owner.rsplit('.').next().unwrap_or(owner);
    if owner.is_empty() || member.is_empty() {
        return None;
    }
    Some((owner, member))
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.keyword(), self.name)
    }
}

/// 1-based inclusive line span of a located symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SymbolSpan {
    /// First line (1-based).
    pub start_line: usize,
    /// Last line (1-based, inclusive).
    pub end_line: usize,
}

// ============================================================================
// Edit locations
// ============================================================================

/// What a resolved location points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LocationKind {
    /// A named definition resolved through the structural index.
    NamedSymbol {
        /// Symbol kind.
        kind: SymbolKind,
        /// Symbol name as requested.
        name: String,
        /// Verbatim excerpt captured at resolution time.
        extracted_text: String,
    },
    /// An explicit line window.
    LineRange {
        /// First line (1-based).
        start: usize,
        /// Last line (1-based, inclusive).
        end: usize,
        /// Verbatim excerpt captured at resolution time.
        extracted_text: String,
    },
}

/// A resolved pointer into one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EditLocation {
    /// Repository-relative file path.
    pub file: String,
    /// Resolved target.
    #[serde(flatten)]
    pub kind: LocationKind,
}

impl EditLocation {
    /// Text captured when the location was resolved.
    #[must_use]
    pub fn extracted_text(&self) -> &str {
        match &self.kind {
            LocationKind::NamedSymbol { extracted_text, .. }
            | LocationKind::LineRange { extracted_text, .. } => extracted_text,
        }
    }
}

// ============================================================================
// Edit operations
// ============================================================================

/// Line range asserted by a `<<<<<<< SEARCH (line X-Y)` annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LineHint {
    /// First line (1-based).
    pub start: usize,
    /// Last line (1-based, inclusive).
    pub end: usize,
}

impl LineHint {
    /// Build a hint, rejecting zero or reversed ranges.
    ///
    /// # Errors
    /// Returns `TypesError::InvalidRange` when `start` is zero or after `end`.
    pub fn new(start: usize, end: usize) -> Result<Self, TypesError> {
        if start == 0 || end < start {
            return Err(TypesError::InvalidRange(start, end));
        }
        Ok(Self { start, end })
    }

    /// Hint covering a single line.
    #[must_use]
    pub fn single(line: usize) -> Self {
        Self {
            start: line.max(1),
            end: line.max(1),
        }
    }
}

impl fmt::Display for LineHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}-{}", self.start, self.end)
    }
}

/// One SEARCH/REPLACE edit parsed from suggestion text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EditOperation {
    /// Repository-relative target file.
    pub file: String,
    /// Asserted line range, when the suggestion carried one.
    pub line_hint: Option<LineHint>,
    /// Text expected in the file (indentation preserved).
    pub old_text: String,
    /// Replacement text (indentation preserved).
    pub new_text: String,
    /// Full fenced segment the operation came from.
    pub raw_block: String,
}

/// Lifecycle of a single edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FixState {
    /// Not yet attempted.
    Pending,
    /// `old_text` located in the current file content.
    Matched,
    /// Replacement written to disk.
    Applied,
    /// `old_text` not located.
    Unmatched,
    /// Terminal failure, file untouched.
    Rejected,
}

impl FixState {
    /// Next state for an operation whose `old_text` was (or was not) found.
    ///
    /// `None` once the state is terminal.
    #[must_use]
    pub fn next(self, found: bool) -> Option<Self> {
        match self {
            Self::Pending if found => Some(Self::Matched),
            Self::Pending => Some(Self::Unmatched),
            Self::Matched => Some(Self::Applied),
            Self::Unmatched => Some(Self::Rejected),
            Self::Applied | Self::Rejected => None,
        }
    }

    /// Every state from `Pending` to the terminal one.
    #[must_use]
    pub fn lifecycle(found: bool) -> Vec<Self> {
        std::iter::successors(Some(Self::Pending), |state| state.next(found)).collect()
    }
}

/// Outcome of applying one edit operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AppliedFix {
    /// The operation that was attempted.
    pub operation: EditOperation,
    /// 1-based line where `old_text` was found.
    pub matched_at_line: Option<usize>,
    /// Whether the file was modified.
    pub applied: bool,
    /// Binary score: 1.0 applied, 0.0 otherwise.
    pub score: f64,
    /// Terminal lifecycle state.
    pub state: FixState,
    /// States passed through, `Pending` first.
    #[serde(default)]
    pub history: Vec<FixState>,
    /// Unified diff of the change, when applied.
    pub diff: Option<String>,
}

impl AppliedFix {
    /// Successful application at `line`.
    #[must_use]
    pub fn applied(operation: EditOperation, line: usize, diff: String) -> Self {
        Self {
            operation,
            matched_at_line: Some(line),
            applied: true,
            score: 1.0,
            state: FixState::Applied,
            history: FixState::lifecycle(true),
            diff: Some(diff),
        }
    }

    /// Rejected operation; the file was not modified.
    #[must_use]
    pub fn rejected(operation: EditOperation) -> Self {
        Self {
            operation,
            matched_at_line: None,
            applied: false,
            score: 0.0,
            state: FixState::Rejected,
            history: FixState::lifecycle(false),
            diff: None,
        }
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Failure classes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// File or symbol absent.
    NotFound,
    /// File exists but cannot be read as UTF-8 text.
    Unreadable,
    /// Source file cannot be parsed.
    SyntaxInvalid,
    /// Suggestion fragment outside the edit-block grammar.
    MalformedBlock,
    /// `old_text` not located in the current file content.
    MatchNotFound,
    /// Writing a modified file failed.
    WriteFailed,
    /// The suggestion oracle returned an error.
    OracleFailed,
    /// A stage could not start: template, settings or parser setup failed.
    SetupFailed,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not_found",
            Self::Unreadable => "unreadable",
            Self::SyntaxInvalid => "syntax_invalid",
            Self::MalformedBlock => "malformed_block",
            Self::MatchNotFound => "match_not_found",
            Self::WriteFailed => "write_failed",
            Self::OracleFailed => "oracle_failed",
            Self::SetupFailed => "setup_failed",
        };
        f.write_str(label)
    }
}

/// A single resolution or application failure report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Diagnostic {
    /// Failure class.
    pub kind: DiagnosticKind,
    /// File concerned, when known.
    pub file: Option<String>,
    /// Symbol, line or block detail.
    pub detail: String,
}

impl Diagnostic {
    /// Create a diagnostic.
    #[must_use]
    pub fn new(kind: DiagnosticKind, file: Option<&str>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            file: file.map(str::to_string),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "[{}] {}: {}", self.kind, file, self.detail),
            None => write!(f, "[{}] {}", self.kind, self.detail),
        }
    }
}

/// Receiver for diagnostics, passed explicitly to each component.
pub trait DiagnosticSink: Send + Sync {
    /// Record one diagnostic.
    fn report(&self, diagnostic: Diagnostic);
}

/// Sink forwarding every diagnostic to `tracing` at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::warn!(
            kind = %diagnostic.kind,
            file = diagnostic.file.as_deref().unwrap_or("-"),
            "{}",
            diagnostic.detail
        );
    }
}

/// Sink accumulating diagnostics in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    items: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.items
            .lock()
            .map(|items| items.clone())
            .unwrap_or_default()
    }

    /// Drain the collected diagnostics.
    #[must_use]
    pub fn take(&self) -> Vec<Diagnostic> {
        self.items
            .lock()
            .map(|mut items| std::mem::take(&mut *items))
            .unwrap_or_default()
    }

    /// Number of diagnostics of `kind`.
    #[must_use]
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.items
            .lock()
            .map(|items| items.iter().filter(|d| d.kind == kind).count())
            .unwrap_or(0)
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::debug!(%diagnostic, "diagnostic collected");
        if let Ok(mut items) = self.items.lock() {
            items.push(diagnostic);
        }
    }
}
