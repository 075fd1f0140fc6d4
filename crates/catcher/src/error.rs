//! Error types for the catcher library.
//!
//! The error enum here covers the faults that genuinely stop an operation:
//! storage failures, transport failures, and invalid caller input. The
//! expected failure modes of the ingestion path — feed retry exhaustion,
//! unparseable translations, duplicate inserts, not-found lookups — are
//! expressed as values (`Vec::new()`, empty translations, `None`, outcome
//! structs) and never surface through this type.

use thiserror::Error;

/// Error type alias used for the [`catcher`](crate) crate.
pub type Result<T> = core::result::Result<T, CatcherError>;

/// Errors that can occur when working with the catcher library.
#[derive(Error, Debug)]
pub enum CatcherError {
  /// A network request failed.
  ///
  /// This can occur when:
  /// - The network is unavailable
  /// - The server is unreachable
  /// - TLS/SSL errors occur
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// A SQLite operation failed.
  ///
  /// This wraps errors from the `rusqlite` crate, covering SQL syntax
  /// errors, schema errors, and type conversion errors. Uniqueness
  /// violations on papers and keywords are absorbed by the storage layer
  /// and reported as `None` rather than through this variant.
  #[error(transparent)]
  Sqlite(#[from] rusqlite::Error),

  /// An async SQLite operation failed.
  #[error(transparent)]
  AsyncSqlite(#[from] tokio_rusqlite::Error),

  /// A file system operation failed, typically while creating the
  /// database file or its parent directory.
  #[error(transparent)]
  Path(#[from] std::io::Error),

  /// The caller supplied input the operation cannot proceed without,
  /// e.g. an empty keyword text.
  #[error("Invalid input: {0}")]
  InvalidInput(String),

  /// The language model returned a response we could not use: no choices,
  /// empty content, or content that is not the requested JSON shape.
  ///
  /// This variant stays internal to the translator — by the time a
  /// translation crosses the pipeline boundary it has been degraded to an
  /// empty [`Translation`](crate::translator::Translation) instead.
  #[error("Translator error: {0}")]
  Translator(String),
}
