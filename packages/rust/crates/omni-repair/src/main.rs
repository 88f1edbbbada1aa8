//! omni-repair CLI: skeleton, locate, resolve, parse, apply, schema.
//!
//! Settings from `packages/conf/settings.yaml` merged with the user file;
//! override with `--settings <path>`.
//!
//! Logging: set `RUST_LOG=omni_repair=debug` (or `warn`, `info`) to see logs on stderr.

mod cli;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use omni_ast::{SymbolLocator, create_skeleton};
use omni_edit::{ApplyConfig, BatchApplier, PatchApplier, parse_blocks, parse_edit_operations};
use omni_io::FsProvider;
use omni_repair::{
    LocationMap, LocationResolver, RepairConfig, RepairReport, load_settings, load_settings_file,
    parse_location_listing,
};
use omni_types::{AppliedFix, EditOperation, Symbol, TracingSink};

use crate::cli::{Artifact, Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing: RUST_LOG overrides; --verbose => debug; else info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "omni_repair=debug,omni_edit=debug,omni_ast=debug,omni_io=debug"
        } else {
            "omni_repair=info,omni_edit=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let settings = match &cli.settings {
        Some(path) => load_settings_file(path)?,
        None => load_settings(),
    };
    let config = settings.resolve();
    tracing::debug!(?config, "settings resolved");

    match cli.command {
        Command::Skeleton { file, plain } => {
            let content = read_source(&file, &config)?;
            println!("{}", create_skeleton(&content, !plain));
        }
        Command::Locate {
            file,
            kind,
            name,
            window,
            label,
        } => {
            let symbol = Symbol::new(kind.into(), name);
            let mut locator = SymbolLocator::new()?;
            let excerpt = locator
                .locate_in_file(
                    &file,
                    &symbol,
                    window.unwrap_or(config.context_window),
                    config.max_file_size,
                )
                .with_context(|| format!("locating {symbol} in {}", file.display()))?;
            match excerpt {
                Some(excerpt) if label => println!("{}", excerpt.labeled()),
                Some(excerpt) => println!("{}", excerpt.text),
                None => anyhow::bail!("{symbol} not found in {}", file.display()),
            }
        }
        Command::Resolve {
            root,
            listing,
            window,
        } => {
            let text = read_input(listing.as_deref())?;
            let repo = provider(root, &config);
            let mut resolver =
                LocationResolver::new(&repo, window.unwrap_or(config.context_window))?;
            let map = resolver.resolve(&parse_location_listing(&text), &TracingSink);
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        Command::Parse { input } => {
            let text = read_input(input.as_deref())?;
            let ops = parse_edit_operations(&text, &TracingSink);
            println!("{}", serde_json::to_string_pretty(&ops)?);
        }
        Command::Apply { root, input, json } => {
            let text = read_input(input.as_deref())?;
            let ops = parse_edit_operations(&text, &TracingSink);
            if ops.is_empty() {
                let malformed = parse_blocks(&text).len();
                anyhow::bail!("no edit operations found ({malformed} malformed blocks)");
            }
            let repo = provider(root, &config);
            let applier = PatchApplier::new(
                &repo,
                ApplyConfig {
                    hint_slack: config.hint_slack,
                },
            );
            let report = BatchApplier::new(applier).apply_all(&ops, &TracingSink);
            let fixes: Vec<&AppliedFix> = report.fixes().collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&fixes)?);
            } else {
                for diff in fixes.iter().filter_map(|f| f.diff.as_deref()) {
                    print!("{diff}");
                }
            }
            eprintln!(
                "{} applied, {} rejected, {} failed",
                report.applied_count(),
                report.rejected_count(),
                report.error_count()
            );
            if report.error_count() > 0 {
                anyhow::bail!("{} edits could not be written", report.error_count());
            }
        }
        Command::Schema { artifact } => {
            let schema = match artifact {
                Artifact::LocationMap => schemars::schema_for!(LocationMap),
                Artifact::EditOperation => schemars::schema_for!(EditOperation),
                Artifact::AppliedFix => schemars::schema_for!(AppliedFix),
                Artifact::Report => schemars::schema_for!(RepairReport),
            };
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

fn provider(root: PathBuf, config: &RepairConfig) -> FsProvider {
    FsProvider::new(root)
        .with_max_bytes(config.max_file_size)
        .with_line_ending(config.line_ending)
}

fn read_source(path: &Path, config: &RepairConfig) -> anyhow::Result<String> {
    omni_io::read_text_safe(path, config.max_file_size)
        .with_context(|| format!("reading {}", path.display()))
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading stdin")?;
            Ok(text)
        }
    }
}
