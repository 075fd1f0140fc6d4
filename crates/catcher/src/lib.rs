//! Keyword-driven ingestion, translation, and search of arXiv paper metadata.
//!
//! `catcher` polls the arXiv Atom feed for a set of registered keywords,
//! stores previously unseen papers in a local SQLite database, asks a
//! language model for a translated title/abstract pair (best effort), and
//! provides a search interface over the stored collection.
//!
//! # Components
//!
//! - [`feed`]: resilient feed client — timeout, bounded retry with capped exponential backoff,
//!   streaming XML parsing into [`paper::RawPaper`]s
//! - [`translator`]: LLM-backed translation behind the [`translator::Translate`] seam
//! - [`pipeline`]: the ingestion orchestrator — fetch, dedup, translate, store
//! - [`search`]: multi-field filtering, sorting, and relevance ranking
//! - [`related`]: scoring of papers related to a reference paper
//! - [`database`]: SQLite storage for keywords, papers, and favorites
//!
//! # Getting started
//!
//! ```no_run
//! use catcher::{
//!   database::Database, feed::FeedClient, pipeline::IngestionPipeline, translator::Translator,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let db = Database::open(Database::default_path()).await?;
//!   let _ = db.add_keyword("machine learning").await?;
//!
//!   let pipeline = IngestionPipeline::new(db, FeedClient::new(), Translator::new());
//!   let outcome = pipeline.run().await?;
//!   println!("{}", outcome.message);
//!   Ok(())
//! }
//! ```
//!
//! # Design notes
//!
//! Expected failures are values, not errors: an exhausted feed fetch is an
//! empty list, a failed translation is an empty pair, a duplicate insert is
//! `None`. [`error::CatcherError`] is reserved for storage/transport faults
//! and genuinely invalid caller input.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod database;
pub mod error;
pub mod feed;
pub mod paper;
pub mod pipeline;
pub mod related;
pub mod search;
pub mod translator;

use crate::error::*;

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use catcher::prelude::*;
///
/// async fn example() -> Result<()> {
///   let _db = catcher::database::Database::open_in_memory().await?;
///   Ok(())
/// }
/// ```
pub mod prelude {
  pub use crate::{
    error::{CatcherError, Result},
    feed::FetchPapers,
    translator::Translate,
  };
}
