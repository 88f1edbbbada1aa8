//! Pairing parsed edit operations with the locations they were generated for.

use omni_types::{EditLocation, EditOperation};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::resolver::LocationMap;

/// An edit operation proposed by one oracle sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FixCandidate {
    /// Parsed SEARCH/REPLACE edit.
    pub operation: EditOperation,
    /// Location the edit most likely targets.
    pub location: Option<EditLocation>,
    /// Index of the oracle sample that proposed it.
    pub sample: usize,
}

/// The location of `op.file` whose captured text appears in the raw block,
/// else the file's first location.
#[must_use]
pub fn match_location(op: &EditOperation, map: &LocationMap) -> Option<EditLocation> {
    let locations = map.get(&op.file)?;
    locations
        .iter()
        .find(|loc| {
            let text = loc.extracted_text().trim();
            !text.is_empty() && op.raw_block.contains(text)
        })
        .or_else(|| locations.first())
        .cloned()
}

/// Candidates for one sample's operations, in parse order.
#[must_use]
pub fn collect_candidates(
    ops: Vec<EditOperation>,
    map: &LocationMap,
    sample: usize,
) -> Vec<FixCandidate> {
    ops.into_iter()
        .map(|operation| FixCandidate {
            location: match_location(&operation, map),
            operation,
            sample,
        })
        .collect()
}
