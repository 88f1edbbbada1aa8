//! Symbol locator: named element → verbatim excerpt.

use std::path::Path;

use omni_io::IoError;
use omni_types::{Symbol, SymbolSpan};
use serde::Serialize;
use tracing::debug;

use crate::error::AstError;
use crate::index::{PythonParser, StructuralIndex};

const RULE_WIDTH: usize = 40;

/// Source lines around a located symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Excerpt {
    /// The symbol that was requested.
    pub symbol: Symbol,
    /// Span of the definition itself.
    pub span: SymbolSpan,
    /// First excerpt line after window expansion (1-based).
    pub start_line: usize,
    /// Last excerpt line after window expansion (1-based, inclusive).
    pub end_line: usize,
    /// Joined source lines.
    pub text: String,
}

impl Excerpt {
    /// Excerpt text framed by a `=== Kind: name ===` header and dashed rules.
    #[must_use]
    pub fn labeled(&self) -> String {
        label_excerpt(&self.symbol, &self.text)
    }
}

/// Frame `text` with a `=== Kind: name ===` header and dashed rules.
#[must_use]
pub fn label_excerpt(symbol: &Symbol, text: &str) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    format!("=== {}: {} ===\n{rule}\n{text}\n{rule}", symbol.kind, symbol.name)
}

/// Resolves symbol descriptors to excerpts.
///
/// Duplicate names resolve to the first definition met in a depth-first walk.
pub struct SymbolLocator {
    parser: PythonParser,
}

impl SymbolLocator {
    /// Create a locator with its own parser.
    ///
    /// # Errors
    /// `AstError::Language` when the grammar cannot be loaded.
    pub fn new() -> Result<Self, AstError> {
        Ok(Self {
            parser: PythonParser::new()?,
        })
    }

    /// Index `content` once for several lookups.
    ///
    /// # Errors
    /// `AstError::SyntaxInvalid` for malformed source.
    pub fn index(&mut self, content: &str) -> Result<StructuralIndex, AstError> {
        self.parser.index(content)
    }

    /// Locate `symbol` in `content`, padded by `window` lines on each side.
    ///
    /// Returns `Ok(None)` when no definition matches.
    ///
    /// # Errors
    /// `AstError::SyntaxInvalid` for malformed source.
    pub fn locate(
        &mut self,
        content: &str,
        symbol: &Symbol,
        window: usize,
    ) -> Result<Option<Excerpt>, AstError> {
        let index = self.parser.index(content)?;
        Ok(excerpt_from_index(&index, content, symbol, window))
    }

    /// Read `path` and locate `symbol` in it.
    ///
    /// # Errors
    /// `AstError::NotFound` when the file is absent, `AstError::SyntaxInvalid`
    /// for malformed source, `AstError::Io` for other read failures.
    pub fn locate_in_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        symbol: &Symbol,
        window: usize,
        max_bytes: u64,
    ) -> Result<Option<Excerpt>, AstError> {
        let path = path.as_ref();
        let content = omni_io::read_text_safe(path, max_bytes).map_err(|e| match e {
            IoError::NotFound(p) => AstError::NotFound(p),
            other => AstError::Io(other),
        })?;
        self.locate(&content, symbol, window)
    }
}

/// Build an excerpt for `symbol` from an existing index.
#[must_use]
pub fn excerpt_from_index(
    index: &StructuralIndex,
    content: &str,
    symbol: &Symbol,
    window: usize,
) -> Option<Excerpt> {
    let def = index.first(symbol.kind, &symbol.name)?;
    let lines: Vec<&str> = content.split('\n').collect();

    let start = (def.span.start_line - 1).saturating_sub(window);
    let end = (def.span.end_line + window).min(lines.len());
    debug!(
        symbol = %symbol,
        start = def.span.start_line,
        end = def.span.end_line,
        "symbol located"
    );

    Some(Excerpt {
        symbol: symbol.clone(),
        span: def.span,
        start_line: start + 1,
        end_line: end,
        text: lines[start..end].join("\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_excerpt() {
        let mut locator = SymbolLocator::new().unwrap();
        let excerpt = locator
            .locate("x = 1\n\ndef foo():\n    return x\n", &Symbol::function("foo"), 0)
            .unwrap()
            .unwrap();
        let rule = "-".repeat(40);
        assert_eq!(
            excerpt.labeled(),
            format!("=== Function: foo ===\n{rule}\ndef foo():\n    return x\n{rule}")
        );
    }

    #[test]
    fn test_window_clamped_at_file_start() {
        let mut locator = SymbolLocator::new().unwrap();
        let excerpt = locator
            .locate("def foo():\n    pass\n", &Symbol::function("foo"), 5)
            .unwrap()
            .unwrap();
        assert_eq!(excerpt.start_line, 1);
        assert_eq!(excerpt.end_line, 3);
        assert_eq!(excerpt.text, "def foo():\n    pass\n");
    }

    #[test]
    fn test_missing_symbol() {
        let mut locator = SymbolLocator::new().unwrap();
        let found = locator
            .locate("def foo():\n    pass\n", &Symbol::class("Foo"), 0)
            .unwrap();
        assert!(found.is_none());
    }
}
