//! Synchronous file I/O operations.
//!
//! Reads are size- and binary-checked; writes are staged in a sibling temp
//! file and renamed over the target so a failed write never leaves a
//! half-written file behind.

use std::fs as std_fs;
use std::io::{Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::detect::{decode_buffer, decode_utf8};
use crate::error::IoError;

/// Read text from a file with size and binary checks.
///
/// Invalid UTF-8 is replaced with U+FFFD, so the result is for display and
/// symbol lookup only. Use [`read_text_strict`] for text that will be edited
/// and written back.
///
/// # Errors
/// `IoError::NotFound` when the file is absent, `IoError::TooLarge` above the
/// limit, `IoError::BinaryFile` for binary content.
///
/// # Example
///
/// ```rust,ignore
/// use omni_io::read_text_safe;
///
/// let content = read_text_safe("cart.py", 1024 * 1024)?;
/// ```
pub fn read_text_safe<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<String, IoError> {
    decode_buffer(read_bytes_checked(path.as_ref(), max_bytes)?)
}

/// Read text from a file, rejecting invalid UTF-8.
///
/// # Errors
/// As [`read_text_safe`], plus `IoError::Encoding` when the bytes are not
/// valid UTF-8.
pub fn read_text_strict<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<String, IoError> {
    decode_utf8(read_bytes_checked(path.as_ref(), max_bytes)?)
}

fn read_bytes_checked(path: &Path, max_bytes: u64) -> Result<Vec<u8>, IoError> {
    let metadata = std_fs::metadata(path)
        .map_err(|_| IoError::NotFound(path.to_string_lossy().to_string()))?;

    if metadata.len() > max_bytes {
        return Err(IoError::TooLarge(metadata.len(), max_bytes));
    }

    let mut file = std_fs::File::open(path)?;
    let mut buffer = Vec::with_capacity(usize::try_from(metadata.len()).unwrap_or_default());
    file.read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// Replace the content of `path` atomically.
///
/// The text is written to a temp file in the same directory, flushed, and
/// renamed over `path`. Existing permissions are not carried over.
///
/// # Errors
/// `IoError::System` when staging fails, `IoError::Persist` when the rename
/// fails. The target is unchanged in both cases.
pub fn write_text_atomic<P: AsRef<Path>>(path: P, text: &str) -> Result<(), IoError> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(text.as_bytes())?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| IoError::Persist {
        path: path.to_string_lossy().to_string(),
        source: e.error,
    })?;

    debug!(path = %path.display(), bytes = text.len(), "file written");
    Ok(())
}
