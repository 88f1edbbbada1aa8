//! SEARCH/REPLACE block parser.
//!
//! Grammar, applied to each fenced segment of a suggestion:
//!
//! ```text
//! segment  := (header | block | prose)*
//! header   := "### " path
//! block    := "<<<<<<< SEARCH" hint? NL old-line* "=======" NL new-line* ">>>>>>> REPLACE"
//! hint     := "(line " X ("-" Y)? ")"
//! ```
//!
//! Implemented as a line state machine. Every complete block becomes an
//! `EditOperation`; every broken fragment becomes a `MalformedBlock`.

use once_cell::sync::Lazy;
use regex::Regex;

use omni_types::{Diagnostic, DiagnosticKind, DiagnosticSink, EditOperation, LineHint};

use crate::types::MalformedBlock;

const FENCE: &str = "```";
const HEADER_PREFIX: &str = "### ";
const SEARCH_MARKER: &str = "<<<<<<< SEARCH";
const DIVIDER: &str = "=======";
const REPLACE_MARKER: &str = ">>>>>>> REPLACE";
const RENDER_LANGUAGE: &str = "python";

static HINT_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)\(\s*line\s+(\d+)\s*(?:-\s*(\d+))?\s*\)").ok());

/// Outcome of parsing one SEARCH/REPLACE fragment.
pub type BlockOutcome = Result<EditOperation, MalformedBlock>;

enum State<'a> {
    Idle,
    Search {
        hint: Option<LineHint>,
        old: Vec<&'a str>,
    },
    Replace {
        hint: Option<LineHint>,
        old: Vec<&'a str>,
        new: Vec<&'a str>,
    },
}

/// Parse every fenced segment of `text`, in input order.
#[must_use]
pub fn parse_blocks(text: &str) -> Vec<BlockOutcome> {
    let mut outcomes = Vec::new();
    for segment in fenced_segments(text) {
        SegmentParser::new(&segment).run(&mut outcomes);
    }
    outcomes
}

/// Parse `text`, reporting malformed fragments to `sink`.
pub fn parse_edit_operations(text: &str, sink: &dyn DiagnosticSink) -> Vec<EditOperation> {
    parse_blocks(text)
        .into_iter()
        .filter_map(|outcome| match outcome {
            Ok(op) => Some(op),
            Err(malformed) => {
                sink.report(Diagnostic::new(
                    DiagnosticKind::MalformedBlock,
                    malformed.file.as_deref(),
                    malformed.reason,
                ));
                None
            }
        })
        .collect()
}

/// Serialize `op` back into a fenced edit block.
#[must_use]
pub fn render_block(op: &EditOperation) -> String {
    let mut lines = vec![
        format!("{FENCE}{RENDER_LANGUAGE}"),
        format!("{HEADER_PREFIX}{}", op.file),
    ];
    lines.push(match op.line_hint {
        Some(hint) => format!("{SEARCH_MARKER} (line {}-{})", hint.start, hint.end),
        None => SEARCH_MARKER.to_string(),
    });
    if !op.old_text.is_empty() {
        lines.push(op.old_text.clone());
    }
    lines.push(DIVIDER.to_string());
    if !op.new_text.is_empty() {
        lines.push(op.new_text.clone());
    }
    lines.push(REPLACE_MARKER.to_string());
    lines.push(FENCE.to_string());
    lines.join("\n")
}

/// Contents of each fenced segment. A trailing unterminated fence still
/// yields its segment.
fn fenced_segments(text: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut inside = false;

    for line in text.lines() {
        if line.trim_start().starts_with(FENCE) {
            if inside {
                segments.push(current.join("\n"));
                current.clear();
            }
            inside = !inside;
            continue;
        }
        if inside {
            current.push(line);
        }
    }
    if inside && !current.is_empty() {
        segments.push(current.join("\n"));
    }
    segments
}

struct SegmentParser<'a> {
    segment: &'a str,
    file: Option<String>,
    saw_header: bool,
    saw_marker: bool,
}

impl<'a> SegmentParser<'a> {
    fn new(segment: &'a str) -> Self {
        Self {
            segment,
            file: None,
            saw_header: false,
            saw_marker: false,
        }
    }

    fn run(mut self, out: &mut Vec<BlockOutcome>) {
        let segment = self.segment;
        let mut state = State::Idle;
        for line in segment.lines() {
            state = self.step(state, line, out);
        }

        if !matches!(state, State::Idle) {
            out.push(Err(self.malformed("unterminated SEARCH/REPLACE block")));
        } else if self.saw_header && !self.saw_marker {
            out.push(Err(self.malformed("file header without SEARCH/REPLACE block")));
        }
    }

    fn step(&mut self, state: State<'a>, line: &'a str, out: &mut Vec<BlockOutcome>) -> State<'a> {
        match state {
            State::Idle => {
                if let Some(path) = parse_header(line) {
                    self.file = Some(path);
                    self.saw_header = true;
                } else if is_search(line) {
                    self.saw_marker = true;
                    return State::Search {
                        hint: parse_hint(line),
                        old: Vec::new(),
                    };
                } else if is_divider(line) || is_replace(line) {
                    self.saw_marker = true;
                    out.push(Err(self.malformed("marker outside a SEARCH block")));
                }
                State::Idle
            }
            State::Search { hint, mut old } => {
                if is_divider(line) {
                    State::Replace {
                        hint,
                        old,
                        new: Vec::new(),
                    }
                } else if is_search(line) {
                    out.push(Err(self.malformed("SEARCH block without divider")));
                    State::Search {
                        hint: parse_hint(line),
                        old: Vec::new(),
                    }
                } else if is_replace(line) {
                    out.push(Err(self.malformed("REPLACE marker before divider")));
                    State::Idle
                } else {
                    old.push(line);
                    State::Search { hint, old }
                }
            }
            State::Replace { hint, old, mut new } => {
                if is_replace(line) {
                    out.push(self.finish(hint, &old, &new));
                    State::Idle
                } else if is_search(line) {
                    out.push(Err(self.malformed("SEARCH block without REPLACE marker")));
                    State::Search {
                        hint: parse_hint(line),
                        old: Vec::new(),
                    }
                } else {
                    new.push(line);
                    State::Replace { hint, old, new }
                }
            }
        }
    }

    fn finish(&self, hint: Option<LineHint>, old: &[&str], new: &[&str]) -> BlockOutcome {
        let Some(file) = self.file.clone() else {
            return Err(self.malformed("SEARCH/REPLACE block without file header"));
        };
        Ok(EditOperation {
            file,
            line_hint: hint,
            old_text: trim_blank_lines(old),
            new_text: trim_blank_lines(new),
            raw_block: self.segment.to_string(),
        })
    }

    fn malformed(&self, reason: &str) -> MalformedBlock {
        MalformedBlock {
            file: self.file.clone(),
            reason: reason.to_string(),
            raw_block: self.segment.to_string(),
        }
    }
}

/// `### path` (also tolerates `### File: path ###`).
fn parse_header(line: &str) -> Option<String> {
    let rest = line.strip_prefix(HEADER_PREFIX)?;
    let rest = rest.trim().trim_end_matches('#').trim();
    let rest = rest.strip_prefix("File:").map_or(rest, str::trim);
    if rest.is_empty() {
        return None;
    }
    Some(rest.to_string())
}

fn is_search(line: &str) -> bool {
    line.trim_start().starts_with(SEARCH_MARKER)
}

fn is_divider(line: &str) -> bool {
    line.trim_end() == DIVIDER
}

fn is_replace(line: &str) -> bool {
    line.trim_end().starts_with(REPLACE_MARKER)
}

fn parse_hint(line: &str) -> Option<LineHint> {
    let caps = HINT_RE.as_ref()?.captures(line)?;
    let start: usize = caps.get(1)?.as_str().parse().ok()?;
    let end: usize = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => start,
    };
    LineHint::new(start, end).ok()
}

/// Drop leading and trailing blank lines; keep everything in between verbatim.
fn trim_blank_lines(lines: &[&str]) -> String {
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hint_forms() {
        assert_eq!(
            parse_hint("<<<<<<< SEARCH (line 3-7)"),
            Some(LineHint { start: 3, end: 7 })
        );
        assert_eq!(
            parse_hint("<<<<<<< SEARCH (line 12)"),
            Some(LineHint { start: 12, end: 12 })
        );
        assert_eq!(parse_hint("<<<<<<< SEARCH"), None);
        assert_eq!(parse_hint("<<<<<<< SEARCH (line 9-2)"), None);
    }

    #[test]
    fn test_parse_header_forms() {
        assert_eq!(parse_header("### app/cart.py"), Some("app/cart.py".to_string()));
        assert_eq!(
            parse_header("### File: app/cart.py ###"),
            Some("app/cart.py".to_string())
        );
        assert_eq!(parse_header("###"), None);
        assert_eq!(parse_header("## app/cart.py"), None);
    }

    #[test]
    fn test_trim_blank_lines_keeps_indentation() {
        let lines = ["", "    a = 1", "", "    b = 2", "   "];
        assert_eq!(trim_blank_lines(&lines), "    a = 1\n\n    b = 2");
        assert_eq!(trim_blank_lines(&["", " "]), "");
    }

    #[test]
    fn test_fenced_segments_with_unterminated_tail() {
        let text = "intro\n```python\na\n```\nprose\n```\nb\nc";
        assert_eq!(fenced_segments(text), vec!["a".to_string(), "b\nc".to_string()]);
    }
}
