//! Content detection utilities.
//!
//! Quick binary detection using NULL byte scanning, UTF-8 decoding, plus
//! line-ending detection.

use memchr::{memchr, memmem, memrchr};

use crate::error::IoError;
use crate::line_ending::LineEnding;

/// Quick binary detection - checks first 8KB for NULL bytes.
#[must_use]
pub fn is_binary(buffer: &[u8]) -> bool {
    let check_len = std::cmp::min(buffer.len(), 8192);
    memchr(0, &buffer[..check_len]).is_some()
}

/// Decode bytes to String with lossy fallback.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD. Only for previews: text
/// decoded this way must never be written back.
///
/// # Errors
/// Returns `IoError::BinaryFile` when binary content is detected.
pub fn decode_buffer(buffer: Vec<u8>) -> Result<String, IoError> {
    if is_binary(&buffer) {
        return Err(IoError::BinaryFile);
    }

    match String::from_utf8(buffer) {
        Ok(s) => Ok(s),
        Err(e) => Ok(String::from_utf8_lossy(&e.into_bytes()).into_owned()),
    }
}

/// Decode bytes to String, rejecting invalid UTF-8.
///
/// # Errors
/// `IoError::BinaryFile` for binary content, `IoError::Encoding` for invalid
/// UTF-8.
pub fn decode_utf8(buffer: Vec<u8>) -> Result<String, IoError> {
    if is_binary(&buffer) {
        return Err(IoError::BinaryFile);
    }
    String::from_utf8(buffer).map_err(|_| IoError::Encoding)
}

/// Line ending of the line containing byte `pos`.
///
/// The last line has no terminator of its own; it takes the ending of the
/// break before it.
#[must_use]
pub(crate) fn line_ending_at(text: &str, pos: usize) -> LineEnding {
    let bytes = text.as_bytes();
    let pos = pos.min(bytes.len());
    let line_break = memchr(b'\n', &bytes[pos..])
        .map(|i| pos + i)
        .or_else(|| memrchr(b'\n', &bytes[..pos]));
    match line_break {
        Some(i) if i > 0 && bytes[i - 1] == b'\r' => LineEnding::Crlf,
        _ => LineEnding::Lf,
    }
}

/// Whether `text` contains any CRLF sequence.
#[must_use]
pub fn has_crlf(text: &str) -> bool {
    memmem::find(text.as_bytes(), b"\r\n").is_some()
}
