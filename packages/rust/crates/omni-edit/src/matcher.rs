//! Locating `old_text` in current file content.
//!
//! Two strategies, tried in order: a line-window search around the asserted
//! hint, then a whole-file substring search. Matching runs on LF-normalized
//! content; [`splice_raw`] maps the result back onto the original bytes.

use omni_io::LineEnding;
use omni_types::LineHint;

/// Which strategy produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Window search around the line hint.
    Hinted,
    /// Whole-file substring search.
    Substring,
}

/// A located occurrence of the trimmed `old_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
    /// Byte offset of the first non-whitespace character matched.
    pub start: usize,
    /// Byte offset one past the last non-whitespace character matched.
    pub end: usize,
    /// 1-based line of `start`.
    pub line: usize,
    /// How the match was found.
    pub strategy: MatchStrategy,
}

/// Find `old_text` in `content`, hinted window first.
#[must_use]
pub fn find_match(
    content: &str,
    old_text: &str,
    hint: Option<LineHint>,
    slack: usize,
) -> Option<TextMatch> {
    let needle = old_text.trim();
    if needle.is_empty() {
        return None;
    }
    hint.and_then(|h| find_in_window(content, needle, h, slack))
        .or_else(|| find_substring(content, needle))
}

/// Replace the matched bytes with trimmed `new_text`.
///
/// Indentation before the match and trailing text after it stay in place. An
/// empty replacement removes the matched lines entirely.
#[must_use]
pub fn splice(content: &str, found: &TextMatch, new_text: &str) -> String {
    edit_for(content, found, new_text).apply_to(content)
}

/// [`splice`] against raw on-disk text whose line endings may be mixed.
///
/// `found` holds offsets into the LF-normalized form of `raw`. Bytes outside
/// the edited span are copied unchanged; inserted line breaks follow the
/// ending of the line the edit starts on.
#[must_use]
pub fn splice_raw(raw: &str, found: &TextMatch, new_text: &str) -> String {
    let content = LineEnding::normalize(raw);
    let edit = edit_for(&content, found, new_text);
    let start = raw_offset(raw, edit.start);
    let end = raw_offset(raw, edit.end);
    let text = match LineEnding::at(raw, start) {
        LineEnding::Crlf => edit.text.replace('\n', "\r\n"),
        _ => edit.text,
    };
    Edit { start, end, text }.apply_to(raw)
}

/// Byte range replaced by `text`.
struct Edit {
    start: usize,
    end: usize,
    text: String,
}

impl Edit {
    fn apply_to(&self, content: &str) -> String {
        let mut out = String::with_capacity(content.len() + self.text.len());
        out.push_str(&content[..self.start]);
        out.push_str(&self.text);
        out.push_str(&content[self.end..]);
        out
    }
}

fn edit_for(content: &str, found: &TextMatch, new_text: &str) -> Edit {
    let replacement = LineEnding::normalize(new_text.trim());
    if !replacement.is_empty() {
        return Edit {
            start: found.start,
            end: found.end,
            text: replacement,
        };
    }

    let line_start = content[..found.start].rfind('\n').map_or(0, |i| i + 1);
    match content[found.end..].find('\n') {
        Some(offset) => Edit {
            start: line_start,
            end: found.end + offset + 1,
            text: String::new(),
        },
        // Last line: drop the break that precedes it instead.
        None => Edit {
            start: line_start.saturating_sub(1),
            end: content.len(),
            text: String::new(),
        },
    }
}

/// First byte of `raw` at normalized offset `pos`.
///
/// A `\r` folded into `\r\n` has no normalized counterpart, so a position on
/// a normalized `\n` maps to the `\r` before it.
fn raw_offset(raw: &str, pos: usize) -> usize {
    let bytes = raw.as_bytes();
    let mut seen = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if seen == pos {
            return i;
        }
        if !(b == b'\r' && bytes.get(i + 1) == Some(&b'\n')) {
            seen += 1;
        }
    }
    bytes.len()
}

fn find_in_window(content: &str, needle: &str, hint: LineHint, slack: usize) -> Option<TextMatch> {
    let lines: Vec<&str> = content.split('\n').collect();
    let offsets = line_offsets(&lines);
    let n = needle.split('\n').count();
    let idx = hint.start.checked_sub(1)?;
    if idx >= lines.len() {
        return None;
    }

    let window_start = idx.saturating_sub(slack);
    let window_end = (idx + n + slack).min(lines.len());

    let mut s = window_start;
    while s + n <= window_end {
        let span_start = offsets[s];
        let span_end = offsets[s + n - 1] + lines[s + n - 1].len();
        let span = &content[span_start..span_end];
        if span.trim() == needle {
            let start = span_start + (span.len() - span.trim_start().len());
            let end = span_end - (span.len() - span.trim_end().len());
            return Some(TextMatch {
                start,
                end,
                line: line_of(content, start),
                strategy: MatchStrategy::Hinted,
            });
        }
        s += 1;
    }
    None
}

fn find_substring(content: &str, needle: &str) -> Option<TextMatch> {
    content
        .match_indices(needle)
        .map(|(start, _)| (start, start + needle.len()))
        .find(|&(start, end)| covers_whole_lines(content, start, end))
        .map(|(start, end)| TextMatch {
            start,
            end,
            line: line_of(content, start),
            strategy: MatchStrategy::Substring,
        })
}

/// Only whitespace between the occurrence and the enclosing line breaks.
fn covers_whole_lines(content: &str, start: usize, end: usize) -> bool {
    let before = &content[..start];
    let lead = before.rfind('\n').map_or(before, |i| &before[i + 1..]);
    let after = &content[end..];
    let tail = after.find('\n').map_or(after, |i| &after[..i]);
    lead.trim().is_empty() && tail.trim().is_empty()
}

fn line_offsets(lines: &[&str]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(lines.len());
    let mut pos = 0;
    for line in lines {
        offsets.push(pos);
        pos += line.len() + 1;
    }
    offsets
}

fn line_of(content: &str, byte: usize) -> usize {
    content[..byte].matches('\n').count() + 1
}
