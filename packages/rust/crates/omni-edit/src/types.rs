//! Core types for patch parsing and application.

use serde::Serialize;

/// Lines of slack on each side of an asserted line hint.
pub const DEFAULT_HINT_SLACK: usize = 2;

/// A fenced fragment that does not follow the edit-block grammar.
///
/// Returned as a value: malformed fragments are dropped individually and
/// never abort parsing of the surrounding response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedBlock {
    /// File header in effect, if any.
    pub file: Option<String>,
    /// What was wrong.
    pub reason: String,
    /// The fenced segment the fragment came from.
    pub raw_block: String,
}

/// Configuration for patch application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyConfig {
    /// Lines searched before and after the hinted position.
    pub hint_slack: usize,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            hint_slack: DEFAULT_HINT_SLACK,
        }
    }
}
