//! Location resolver: per-file descriptors → `EditLocation`s.
//!
//! Each file is read and parsed at most once. A descriptor that cannot be
//! resolved is reported and dropped; it never stops the remaining
//! descriptors or files.

use omni_ast::{AstError, StructuralIndex, SymbolLocator, excerpt_from_index};
use omni_io::{FileProvider, LineEnding};
use omni_types::{
    Diagnostic, DiagnosticKind, DiagnosticSink, EditLocation, LocationKind, Symbol,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::read_failure_kind;

/// One location request contributed by the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LocationDescriptor {
    /// A named function, class or variable.
    Symbol(Symbol),
    /// A 1-based line number.
    Line(usize),
}

/// Descriptors for one file, in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FileDescriptors {
    /// Repository-relative path.
    pub file: String,
    /// Requested locations.
    pub descriptors: Vec<LocationDescriptor>,
}

impl FileDescriptors {
    /// Empty descriptor list for `file`.
    #[must_use]
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            descriptors: Vec::new(),
        }
    }
}

/// Resolved locations of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FileLocations {
    /// Repository-relative path.
    pub file: String,
    /// Non-empty list of resolved locations.
    pub locations: Vec<EditLocation>,
}

/// File → locations, in file priority order.
///
/// Files without any resolved location are never present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LocationMap {
    entries: Vec<FileLocations>,
}

impl LocationMap {
    /// Append `locations` for `file`, merging with an existing entry.
    ///
    /// An empty list is ignored.
    pub fn insert(&mut self, file: &str, locations: Vec<EditLocation>) {
        if locations.is_empty() {
            return;
        }
        match self.entries.iter_mut().find(|e| e.file == file) {
            Some(entry) => entry.locations.extend(locations),
            None => self.entries.push(FileLocations {
                file: file.to_string(),
                locations,
            }),
        }
    }

    /// Locations of `file`, if any were resolved.
    #[must_use]
    pub fn get(&self, file: &str) -> Option<&[EditLocation]> {
        self.entries
            .iter()
            .find(|e| e.file == file)
            .map(|e| e.locations.as_slice())
    }

    /// Entries in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &FileLocations> {
        self.entries.iter()
    }

    /// Files in priority order.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.file.as_str())
    }

    /// Number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no file has a location.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of locations across all files.
    #[must_use]
    pub fn total_locations(&self) -> usize {
        self.entries.iter().map(|e| e.locations.len()).sum()
    }
}

/// Resolves descriptors against files read through a [`FileProvider`].
pub struct LocationResolver<'a> {
    provider: &'a dyn FileProvider,
    locator: SymbolLocator,
    window: usize,
}

impl<'a> LocationResolver<'a> {
    /// Resolver with a context window of `window` lines.
    ///
    /// # Errors
    /// `AstError::Language` when the grammar cannot be loaded.
    pub fn new(provider: &'a dyn FileProvider, window: usize) -> Result<Self, AstError> {
        Ok(Self {
            provider,
            locator: SymbolLocator::new()?,
            window,
        })
    }

    /// Resolve every file's descriptors, keeping file order.
    pub fn resolve(&mut self, files: &[FileDescriptors], sink: &dyn DiagnosticSink) -> LocationMap {
        let mut map = LocationMap::default();
        for request in files {
            let locations = self.resolve_file(request, sink);
            debug!(
                file = %request.file,
                requested = request.descriptors.len(),
                resolved = locations.len(),
                "file resolved"
            );
            map.insert(&request.file, locations);
        }
        info!(
            files = map.len(),
            locations = map.total_locations(),
            "locations resolved"
        );
        map
    }

    /// Resolve the descriptors of a single file.
    pub fn resolve_file(
        &mut self,
        request: &FileDescriptors,
        sink: &dyn DiagnosticSink,
    ) -> Vec<EditLocation> {
        let file = request.file.as_str();
        if request.descriptors.is_empty() {
            return Vec::new();
        }
        let content = match self.provider.read_lossy(file) {
            Ok(raw) => LineEnding::normalize(&raw),
            Err(e) => {
                sink.report(Diagnostic::new(
                    read_failure_kind(&e),
                    Some(file),
                    e.to_string(),
                ));
                return Vec::new();
            }
        };

        // Parsed lazily, once, on the first symbol descriptor.
        let mut index: Option<Result<StructuralIndex, AstError>> = None;
        let mut locations = Vec::new();

        for descriptor in &request.descriptors {
            let resolved = match descriptor {
                LocationDescriptor::Symbol(symbol) => {
                    let parsed = index.get_or_insert_with(|| self.locator.index(&content));
                    self.resolve_symbol(file, &content, parsed, symbol, sink)
                }
                LocationDescriptor::Line(line) => self.resolve_line(file, &content, *line, sink),
            };
            locations.extend(resolved);
        }
        locations
    }

    fn resolve_symbol(
        &self,
        file: &str,
        content: &str,
        parsed: &Result<StructuralIndex, AstError>,
        symbol: &Symbol,
        sink: &dyn DiagnosticSink,
    ) -> Option<EditLocation> {
        let index = match parsed {
            Ok(index) => index,
            Err(e) => {
                sink.report(Diagnostic::new(
                    DiagnosticKind::SyntaxInvalid,
                    Some(file),
                    format!("{symbol}: {e}"),
                ));
                return None;
            }
        };
        let Some(excerpt) = excerpt_from_index(index, content, symbol, self.window) else {
            sink.report(Diagnostic::new(
                DiagnosticKind::NotFound,
                Some(file),
                format!("{symbol} not defined"),
            ));
            return None;
        };
        Some(EditLocation {
            file: file.to_string(),
            kind: LocationKind::NamedSymbol {
                kind: symbol.kind,
                name: symbol.name.clone(),
                extracted_text: excerpt.text,
            },
        })
    }

    fn resolve_line(
        &self,
        file: &str,
        content: &str,
        line: usize,
        sink: &dyn DiagnosticSink,
    ) -> Option<EditLocation> {
        let lines: Vec<&str> = content.split('\n').collect();
        if line == 0 || line > lines.len() {
            sink.report(Diagnostic::new(
                DiagnosticKind::NotFound,
                Some(file),
                format!("line {line} outside 1-{}", lines.len()),
            ));
            return None;
        }
        let start = line.saturating_sub(self.window).max(1);
        let end = (line + self.window).min(lines.len());
        Some(EditLocation {
            file: file.to_string(),
            kind: LocationKind::LineRange {
                start,
                end,
                extracted_text: lines[start - 1..end].join("\n"),
            },
        })
    }
}
