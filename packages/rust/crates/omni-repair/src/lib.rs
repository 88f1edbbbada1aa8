#![allow(clippy::doc_markdown)]

//! omni-repair - Edit-location resolution and repair pipeline
//!
//! Turns oracle listings into exact edit locations, asks the oracle for
//! SEARCH/REPLACE suggestions over them, and applies the result.
//!
//! # Features
//!
//! - **Location Resolver**: Symbol and line descriptors → `EditLocation`s
//! - **Listing Parsers**: Fenced file and location listings from the oracle
//! - **Prompt Assembly**: minijinja templates over skeletons and excerpts
//! - **Repair Pipeline**: Parallel samples (rayon), sequential application
//! - **Settings**: YAML settings with system/user merge
//!
//! # Architecture (ODF-REP Compliant)
//!
//! ```text
//! omni-repair/src/
//! ├── lib.rs       # Re-exports (this file)
//! ├── error.rs     # RepairError enum (thiserror)
//! ├── config.rs    # RepairSettings / RepairConfig (serde_yaml)
//! ├── oracle.rs    # Oracle trait, SamplingParams, ScriptedOracle
//! ├── listing.rs   # Oracle listing parsers
//! ├── resolver.rs  # LocationResolver, LocationMap
//! ├── prompts.rs   # PromptBuilder (minijinja)
//! ├── fixes.rs     # FixCandidate pairing
//! ├── pipeline.rs  # RepairPipeline
//! ├── cli.rs       # clap definitions (binary)
//! └── main.rs      # omni-repair binary
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use omni_io::FsProvider;
//! use omni_repair::{RepairConfig, RepairPipeline, RepairRequest};
//!
//! let repo = FsProvider::new("/checkout");
//! let pipeline = RepairPipeline::new(&my_oracle, &repo, RepairConfig::default())?;
//! let report = pipeline.run(&RepairRequest {
//!     problem: "Cart totals ignore item prices".to_string(),
//!     candidate_files: vec!["app/cart.py".to_string()],
//!     structure: None,
//! });
//! println!("{} fixes applied", report.applied_count());
//! ```

// ============================================================================
// Module Declarations (ODF-REP: Atomic Structure)
// ============================================================================

mod config;
mod error;
mod fixes;
mod listing;
mod oracle;
mod pipeline;
mod prompts;
mod resolver;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use config::{
    LocateSettings, OracleSettings, RepairConfig, RepairSettings, RepairStageSettings,
    load_settings, load_settings_file, load_settings_from_paths, settings_paths,
};
pub use error::RepairError;
pub use fixes::{FixCandidate, collect_candidates, match_location};
pub use listing::{first_fenced_block, parse_file_listing, parse_location_listing};
pub use oracle::{Oracle, OracleError, SamplingParams, ScriptedOracle};
pub use pipeline::{RepairPipeline, RepairReport, RepairRequest};
pub use prompts::PromptBuilder;
pub use resolver::{
    FileDescriptors, FileLocations, LocationDescriptor, LocationMap, LocationResolver,
};
