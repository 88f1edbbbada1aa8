#![allow(clippy::doc_markdown)]

//! omni-io - Safe file I/O for Omni Repair
//!
//! The file-content provider used by the locating and patching stages.
//!
//! # Features
//!
//! - **Safety**: Binary detection & size limits on every read
//! - **Atomic writes**: Staged temp file + rename, never a half-written file
//! - **Line endings**: `Lf`, `Crlf` or `Preserve` on write-back
//! - **Rooted paths**: Repository-relative paths cannot escape the checkout
//!
//! # Architecture (ODF-REP Compliant)
//!
//! ```text
//! omni-io/src/
//! ├── lib.rs          # Re-exports (this file)
//! ├── error.rs        # IoError enum
//! ├── detect.rs       # Binary & line-ending detection
//! ├── line_ending.rs  # LineEnding policy
//! ├── sync.rs         # read_text_safe / read_text_strict / write_text_atomic
//! └── provider.rs     # FileProvider trait + FsProvider
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use omni_io::{FileProvider, FsProvider, LineEnding};
//!
//! let repo = FsProvider::new("/checkout").with_line_ending(LineEnding::Preserve);
//! let text = repo.read("cart.py")?;
//! repo.write("cart.py", &text.replace("t += i", "t += i.price"))?;
//! ```

// ============================================================================
// Module Declarations (ODF-REP: Atomic Structure)
// ============================================================================

mod detect;
mod error;
mod line_ending;
mod provider;
mod sync;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use error::IoError;
pub use line_ending::LineEnding;
pub use provider::{DEFAULT_MAX_FILE_SIZE, FileProvider, FsProvider};
pub use sync::{read_text_safe, read_text_strict, write_text_atomic};

// Re-export detection utilities for advanced use
pub use detect::{decode_buffer, decode_utf8, is_binary};
