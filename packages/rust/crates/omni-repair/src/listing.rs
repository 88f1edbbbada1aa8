//! Parsers for the oracle's fenced listings.
//!
//! File listing:
//!
//! ```text
//! pkg/cart.py
//! pkg/tax.py
//! ```
//!
//! Location listing (a line without `:` starts a new file):
//!
//! ```text
//! pkg/cart.py
//! function: total
//! function: Cart.add
//! class: Basket
//! variable: RATES
//! line: 42
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use omni_types::{Symbol, SymbolKind};

use crate::resolver::{FileDescriptors, LocationDescriptor};

const FENCE: &str = "```";

static ENTRY_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^([A-Za-z_]+)\s*:\s*(\S.*)$").ok());

/// Body of the first fenced block, without its language tag.
///
/// Returns `None` when the text has no opening fence.
#[must_use]
pub fn first_fenced_block(text: &str) -> Option<&str> {
    let start = text.find(FENCE)? + FENCE.len();
    let rest = &text[start..];
    let body = rest.find(FENCE).map_or(rest, |end| &rest[..end]);
    // Language tag on the opening fence line.
    let body = match body.split_once('\n') {
        Some((tag, tail)) if !tag.trim().contains(char::is_whitespace) && !looks_like_path(tag) => {
            tail
        }
        _ => body,
    };
    Some(body.trim())
}

/// File paths from the first fenced block, most important first.
#[must_use]
pub fn parse_file_listing(text: &str) -> Vec<String> {
    let Some(body) = first_fenced_block(text) else {
        return Vec::new();
    };
    let mut files: Vec<String> = Vec::new();
    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !files.iter().any(|f| f == line) {
            files.push(line.to_string());
        }
    }
    files
}

/// Per-file location descriptors from the first fenced block.
///
/// Unknown entry kinds, unparsable line numbers and entries before the first
/// file line are skipped. Repeated file lines extend the earlier entry.
#[must_use]
pub fn parse_location_listing(text: &str) -> Vec<FileDescriptors> {
    let Some(body) = first_fenced_block(text) else {
        return Vec::new();
    };
    let mut files: Vec<FileDescriptors> = Vec::new();
    let mut current: Option<usize> = None;

    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !line.contains(':') {
            current = Some(match files.iter().position(|f| f.file == line) {
                Some(idx) => idx,
                None => {
                    files.push(FileDescriptors::new(line));
                    files.len() - 1
                }
            });
            continue;
        }
        let Some(idx) = current else {
            debug!(entry = line, "listing entry before any file; skipped");
            continue;
        };
        match parse_entry(line) {
            Some(descriptor) => files[idx].descriptors.push(descriptor),
            None => debug!(entry = line, "unrecognized listing entry; skipped"),
        }
    }
    files
}

fn parse_entry(line: &str) -> Option<LocationDescriptor> {
    let caps = ENTRY_RE.as_ref()?.captures(line)?;
    let label = caps.get(1)?.as_str();
    let value = caps.get(2)?.as_str().trim();

    if label.eq_ignore_ascii_case("line") {
        return value.parse().ok().map(LocationDescriptor::Line);
    }
    let kind: SymbolKind = label.parse().ok()?;
    Some(LocationDescriptor::Symbol(Symbol::new(kind, value)))
}

fn looks_like_path(tag: &str) -> bool {
    let tag = tag.trim();
    tag.contains('/') || tag.contains('.')
}
