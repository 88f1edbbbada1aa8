//! omni-ast - Structural views of Python sources
//!
//! This crate maps named program elements to exact line ranges and produces
//! condensed structural previews ("skeletons") of a file.
//!
//! ## Architecture
//!
//! ```text
//! omni-ast/src/
//! ├── lib.rs        # Re-exports (entry point)
//! ├── error.rs      # AstError enum
//! ├── skeleton.rs   # Keyword/indentation skeletonizer
//! ├── index.rs      # Tree-sitter structural index
//! └── locate.rs     # Symbol locator and excerpts
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use omni_ast::{SymbolLocator, create_skeleton};
//! use omni_types::Symbol;
//!
//! let content = "import os\n\ndef hello():\n    pass\n";
//! println!("{}", create_skeleton(content, true));
//!
//! let mut locator = SymbolLocator::new()?;
//! let excerpt = locator.locate(content, &Symbol::function("hello"), 0)?;
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod error;
mod index;
mod locate;
mod skeleton;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::AstError;

// Structural index
pub use index::{Definition, PythonParser, StructuralIndex};

// Symbol locator
pub use locate::{Excerpt, SymbolLocator, excerpt_from_index, label_excerpt};

// Skeletonizer
pub use skeleton::{Skeleton, SkeletonRow, create_skeleton};
