//! Error types for the catcher CLI.

use catcher::error::CatcherError;
use thiserror::Error;

/// Error type alias used for the catcher CLI.
pub type Result<T> = core::result::Result<T, CatcherdError>;

/// Errors that can occur while running CLI commands.
#[derive(Error, Debug)]
pub enum CatcherdError {
  /// An error bubbled up from the catcher library.
  #[error(transparent)]
  Catcher(#[from] CatcherError),

  /// A file system operation failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// An interactive prompt failed, typically because stdin closed.
  #[error(transparent)]
  Dialoguer(#[from] dialoguer::Error),

  /// A date argument did not parse.
  #[error("Invalid date {0:?}, expected YYYY-MM-DD")]
  InvalidDate(String),
}
