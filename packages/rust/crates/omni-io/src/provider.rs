//! Repository-rooted file-content provider.
//!
//! Components never touch `std::fs` with caller-supplied paths directly; they
//! go through a [`FileProvider`] so that every read is size/binary checked and
//! every write honours the configured line-ending policy. Edit paths use the
//! strict `read`; `read_lossy` is for previews that are never written back.

use std::path::{Component, Path, PathBuf};

use crate::error::IoError;
use crate::line_ending::LineEnding;
use crate::sync::{read_text_safe, read_text_strict, write_text_atomic};

/// Default read limit (1MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Read/write access to repository files by relative path.
pub trait FileProvider: Send + Sync {
    /// Read the full text of `rel_path` for editing.
    ///
    /// # Errors
    /// `IoError::NotFound` when the file is absent, `IoError::Encoding` when
    /// it is not valid UTF-8.
    fn read(&self, rel_path: &str) -> Result<String, IoError>;

    /// Read `rel_path` for display or lookup, tolerating invalid UTF-8.
    ///
    /// # Errors
    /// `IoError::NotFound` when the file is absent.
    fn read_lossy(&self, rel_path: &str) -> Result<String, IoError> {
        self.read(rel_path)
    }

    /// Replace the full text of `rel_path`.
    ///
    /// # Errors
    /// Any failure to stage or persist the new content.
    fn write(&self, rel_path: &str, text: &str) -> Result<(), IoError>;
}

/// Filesystem provider rooted at a repository checkout.
#[derive(Debug, Clone)]
pub struct FsProvider {
    root: PathBuf,
    max_bytes: u64,
    line_ending: LineEnding,
}

impl FsProvider {
    /// Provider rooted at `root` with default limits.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_bytes: DEFAULT_MAX_FILE_SIZE,
            line_ending: LineEnding::default(),
        }
    }

    /// Override the read size limit.
    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Override the write line-ending policy.
    #[must_use]
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Repository root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `rel_path` under the root, rejecting escapes.
    ///
    /// # Errors
    /// `IoError::OutsideRoot` for absolute paths or `..` components.
    pub fn resolve(&self, rel_path: &str) -> Result<PathBuf, IoError> {
        let rel = Path::new(rel_path.trim());
        let mut resolved = self.root.clone();
        for component in rel.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(IoError::OutsideRoot(rel_path.to_string()));
                }
            }
        }
        Ok(resolved)
    }
}

impl FileProvider for FsProvider {
    fn read(&self, rel_path: &str) -> Result<String, IoError> {
        let path = self.resolve(rel_path)?;
        read_text_strict(&path, self.max_bytes).map_err(|e| relative_not_found(e, rel_path))
    }

    fn read_lossy(&self, rel_path: &str) -> Result<String, IoError> {
        let path = self.resolve(rel_path)?;
        read_text_safe(&path, self.max_bytes).map_err(|e| relative_not_found(e, rel_path))
    }

    fn write(&self, rel_path: &str, text: &str) -> Result<(), IoError> {
        let path = self.resolve(rel_path)?;
        write_text_atomic(&path, &self.line_ending.apply(text))
    }
}

fn relative_not_found(e: IoError, rel_path: &str) -> IoError {
    match e {
        IoError::NotFound(_) => IoError::NotFound(rel_path.to_string()),
        other => other,
    }
}
