#![allow(clippy::doc_markdown)]

//! omni-edit - SEARCH/REPLACE patching for Omni Repair
//!
//! Turns free-form edit suggestions into verified file mutations, tolerating
//! drift between the suggested text and the file's current content.
//!
//! # Features
//!
//! - **Block Parser**: Line state machine over fenced `SEARCH/REPLACE` blocks
//! - **Fuzzy Matching**: Hinted window search, then whole-file fallback
//! - **Atomic Writes**: Through `omni_io::FileProvider`, line endings preserved
//! - **Diff Preview**: Unified diff attached to every applied fix
//! - **Batch Apply**: Sequential read-modify-write per operation
//!
//! # Architecture (ODF-REP Compliant)
//!
//! ```text
//! omni-edit/src/
//! ├── lib.rs      # Re-exports (this file)
//! ├── error.rs    # EditError enum (thiserror)
//! ├── types.rs    # MalformedBlock, ApplyConfig
//! ├── block.rs    # Edit-block parser and renderer
//! ├── matcher.rs  # Hinted / substring matching
//! ├── diff.rs     # Unified diffs (similar)
//! ├── applier.rs  # PatchApplier implementation
//! └── batch.rs    # Sequential batch application
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use omni_edit::{ApplyConfig, BatchApplier, PatchApplier, parse_edit_operations};
//! use omni_io::FsProvider;
//! use omni_types::TracingSink;
//!
//! let ops = parse_edit_operations(&suggestion, &TracingSink);
//! let repo = FsProvider::new("/checkout");
//! let batch = BatchApplier::new(PatchApplier::new(&repo, ApplyConfig::default()));
//! let report = batch.apply_all(&ops, &TracingSink);
//! println!("{} applied", report.applied_count());
//! ```

// ============================================================================
// Module Declarations (ODF-REP: Atomic Structure)
// ============================================================================

mod applier;
mod batch;
mod block;
mod diff;
mod error;
mod matcher;
mod types;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use applier::PatchApplier;
pub use batch::{BatchApplier, BatchReport};
pub use block::{BlockOutcome, parse_blocks, parse_edit_operations, render_block};
pub use error::EditError;
pub use matcher::{MatchStrategy, TextMatch, find_match, splice, splice_raw};
pub use types::{ApplyConfig, DEFAULT_HINT_SLACK, MalformedBlock};

// Diff preview for applied fixes
pub use diff::file_diff;
