//! CLI subcommands and shared output helpers.

use super::*;

pub mod favorite;
pub mod fetch;
pub mod keyword;
pub mod papers;
pub mod search;

pub use favorite::{favorite, FavoriteCommands};
pub use fetch::{fetch, FetchArgs};
pub use keyword::{keyword, KeywordCommands};
pub use papers::{papers, retranslate, retranslate_all, PaperCommands};
pub use search::{search, SearchArgs};

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Manage the keywords that drive feed polling
  Keyword {
    /// Keyword operations
    #[command(subcommand)]
    cmd: KeywordCommands,
  },

  /// Fetch and store new papers for every active keyword
  Fetch(FetchArgs),

  /// Search stored papers with filters and sort strategies
  Search(SearchArgs),

  /// List, inspect, and remove stored papers
  Papers {
    /// Paper operations
    #[command(subcommand)]
    cmd: PaperCommands,
  },

  /// Retranslate a single paper by its id
  Retranslate {
    /// Database id of the paper
    id: i64,
  },

  /// Retranslate every paper still missing a translated field
  RetranslateAll,

  /// Manage per-user favorites
  Favorite {
    /// Favorite operations
    #[command(subcommand)]
    cmd: FavoriteCommands,
  },
}

/// Prints a one-line summary of a paper.
pub fn print_paper_line(paper: &Paper) {
  let title = paper.title_translated.as_deref().filter(|t| !t.is_empty()).unwrap_or(&paper.title);
  println!(
    "{:>5}  {}  {}",
    style(paper.id).dim(),
    style(&paper.source_id).cyan(),
    style(title).bold()
  );
}

/// Prints a paper with its metadata block.
pub fn print_paper(paper: &Paper) {
  println!("{} {}", style(&paper.source_id).cyan(), style(&paper.title).bold());
  if let Some(translated) = paper.title_translated.as_deref().filter(|t| !t.is_empty()) {
    println!("    {}", style(translated).italic());
  }
  println!("    {}", style(&paper.authors).dim());
  if let Some(category) = &paper.category {
    println!("    category: {}", style(category).yellow());
  }
  if let Some(published) = published_date(paper) {
    println!("    published: {published}");
  }
  println!("    {}", style(&paper.source_url).underlined());
}

/// The paper's publication date formatted as YYYY-MM-DD, when known.
fn published_date(paper: &Paper) -> Option<String> {
  paper
    .published_at
    .and_then(chrono::DateTime::from_timestamp_millis)
    .map(|dt| dt.format("%Y-%m-%d").to_string())
}
