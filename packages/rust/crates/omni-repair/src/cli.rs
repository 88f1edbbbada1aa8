use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use omni_types::SymbolKind;

#[derive(Parser)]
#[command(name = "omni-repair")]
#[command(about = "Resolve edit locations and apply SEARCH/REPLACE edits to a Python checkout.")]
pub(crate) struct Cli {
    /// Settings file replacing the system and user settings.
    #[arg(long, global = true)]
    pub(crate) settings: Option<PathBuf>,

    /// Debug logging on stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum KindArg {
    Function,
    Class,
    Variable,
}

impl From<KindArg> for SymbolKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Function => Self::Function,
            KindArg::Class => Self::Class,
            KindArg::Variable => Self::Variable,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum Artifact {
    /// File → edit locations.
    LocationMap,
    /// One parsed SEARCH/REPLACE edit.
    EditOperation,
    /// Outcome of applying one edit.
    AppliedFix,
    /// Full pipeline report.
    Report,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Print the structural skeleton of a file.
    Skeleton {
        /// Python source file.
        file: PathBuf,

        /// Omit line numbers.
        #[arg(long)]
        plain: bool,
    },
    /// Print the excerpt of a function, class or variable.
    Locate {
        /// Python source file.
        file: PathBuf,

        /// Definition kind.
        #[arg(value_enum)]
        kind: KindArg,

        /// Name, `Class.method` for methods.
        name: String,

        /// Context lines on each side (default: settings `locate.context_window`).
        #[arg(long)]
        window: Option<usize>,

        /// Frame the excerpt with a `=== Kind: name ===` label.
        #[arg(long)]
        label: bool,
    },
    /// Resolve a location listing against a checkout and print the locations as JSON.
    Resolve {
        /// Repository root.
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Listing text (default: stdin).
        listing: Option<PathBuf>,

        /// Context lines on each side (default: settings `locate.context_window`).
        #[arg(long)]
        window: Option<usize>,
    },
    /// Parse SEARCH/REPLACE blocks and print the edit operations as JSON.
    Parse {
        /// Suggestion text (default: stdin).
        input: Option<PathBuf>,
    },
    /// Parse SEARCH/REPLACE blocks and apply them to a checkout.
    Apply {
        /// Repository root.
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Suggestion text (default: stdin).
        input: Option<PathBuf>,

        /// Print the applied fixes as JSON instead of diffs.
        #[arg(long)]
        json: bool,
    },
    /// Print the JSON Schema of a produced artifact.
    Schema {
        #[arg(value_enum)]
        artifact: Artifact,
    },
}
