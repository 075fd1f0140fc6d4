//! Command line interface for the catcher paper system.
//!
//! This crate provides a CLI on top of the `catcher` library. It covers the
//! full surface: keyword management, the ingestion run, search with filters
//! and sort strategies, related-paper lookup, retranslation, and per-user
//! favorites.
//!
//! # Usage
//!
//! ```bash
//! # Register a keyword and pull papers for it
//! catcher keyword add "machine learning"
//! catcher fetch
//!
//! # Search what landed
//! catcher search "transformer" --category cs.LG --sort relevance
//!
//! # Retry translations that failed during ingestion
//! catcher retranslate-all
//! ```
//!
//! Verbosity is controlled with `-v` flags; `--path` points the CLI at a
//! non-default database file.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

use catcher::{
  database::{Database, PaperOrder},
  paper::Paper,
  pipeline::IngestionPipeline,
};
use clap::{builder::ArgAction, Args, Parser, Subcommand, ValueEnum};
use console::style;
use tracing::trace;
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod error;

use crate::{commands::*, error::*};

/// Prefix for information messages
static INFO_PREFIX: &str = "ℹ ";
/// Prefix for success messages
static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for warning messages
static WARNING_PREFIX: &str = "⚠ ";
/// Prefix for error messages
static ERROR_PREFIX: &str = "✗ ";

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "CLI for the catcher paper ingestion and search system")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Path to the database file. If not specified, uses the default
  /// platform-specific data directory.
  #[arg(long, short, global = true)]
  path: Option<PathBuf>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,

  /// Skip all prompts and accept defaults (mostly for testing)
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

/// Configures the logging system based on the verbosity level
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
}

/// Entry point for the catcher CLI application
///
/// Handles command line argument parsing, sets up logging, opens the
/// database, and executes the requested command.
#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  let path = cli.path.clone().unwrap_or_else(Database::default_path);
  trace!("Using database at: {}", path.display());
  let db = Database::open(&path).await.map_err(CatcherdError::from)?;

  match cli.command.clone() {
    Commands::Keyword { cmd } => keyword(&cli, db, cmd).await,
    Commands::Fetch(args) => fetch(db, args).await,
    Commands::Search(args) => search(db, args).await,
    Commands::Papers { cmd } => papers(&cli, db, cmd).await,
    Commands::Retranslate { id } => retranslate(db, id).await,
    Commands::RetranslateAll => retranslate_all(db).await,
    Commands::Favorite { cmd } => favorite(db, cmd).await,
  }
}
