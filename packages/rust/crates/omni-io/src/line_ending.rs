//! Line-ending policy applied when text is written back.

use serde::{Deserialize, Serialize};

/// Line-ending convention for written files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// Rewrite every break as `\n`.
    Lf,
    /// Rewrite every break as `\r\n`.
    Crlf,
    /// Write the text exactly as given. Callers splice edits into the raw
    /// content, so untouched lines keep their original endings.
    #[default]
    Preserve,
}

impl LineEnding {
    /// Normalize every line break in `text` to `\n`.
    #[must_use]
    pub fn normalize(text: &str) -> String {
        if crate::detect::has_crlf(text) {
            text.replace("\r\n", "\n")
        } else {
            text.to_string()
        }
    }

    /// Ending of the line containing byte `pos` of `text`.
    #[must_use]
    pub fn at(text: &str, pos: usize) -> Self {
        crate::detect::line_ending_at(text, pos)
    }

    /// The break sequence, `\n` for `Preserve`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Crlf => "\r\n",
            Self::Lf | Self::Preserve => "\n",
        }
    }

    /// Prepare `text` for writing under this policy.
    ///
    /// `Lf` and `Crlf` convert the whole file. `Preserve` leaves every byte
    /// alone.
    #[must_use]
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Preserve => text.to_string(),
            Self::Lf => Self::normalize(text),
            Self::Crlf => Self::normalize(text).replace('\n', "\r\n"),
        }
    }
}
