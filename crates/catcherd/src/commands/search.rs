//! Search over the stored catalog with filters and sort strategies.

use catcher::search::{search as run_search, SearchFilters, SortBy};
use chrono::NaiveDate;

use super::*;

/// Arguments for the search command
#[derive(Args, Clone)]
pub struct SearchArgs {
  /// Query matched against titles, abstracts, and authors
  pub query: Option<String>,

  /// Filter by author name (substring)
  #[arg(long)]
  pub author: Option<String>,

  /// Filter by category (exact, case-insensitive)
  #[arg(long)]
  pub category: Option<String>,

  /// Only papers published on or after this date (YYYY-MM-DD)
  #[arg(long)]
  pub from: Option<String>,

  /// Only papers published on or before this date (YYYY-MM-DD)
  #[arg(long)]
  pub to: Option<String>,

  /// Sort strategy for the results
  #[arg(long, value_enum, default_value_t = SortArg::CreatedAt)]
  pub sort: SortArg,

  /// Show the full metadata block per paper
  #[arg(long)]
  pub detailed: bool,
}

/// Sort strategies exposed on the command line
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum SortArg {
  /// Newest records first
  #[default]
  CreatedAt,
  /// Most recently published first
  PublishedAt,
  /// Category ascending
  Category,
  /// Most cited first
  Citations,
  /// Highest relevance score first (needs a query)
  Relevance,
}

impl From<SortArg> for SortBy {
  fn from(arg: SortArg) -> Self {
    match arg {
      SortArg::CreatedAt => SortBy::CreatedAt,
      SortArg::PublishedAt => SortBy::PublishedAt,
      SortArg::Category => SortBy::Category,
      SortArg::Citations => SortBy::Citations,
      SortArg::Relevance => SortBy::Relevance,
    }
  }
}

/// Function for the search command in the CLI.
pub async fn search(db: Database, args: SearchArgs) -> Result<()> {
  let filters = SearchFilters {
    author:     args.author.clone(),
    start_date: args.from.as_deref().map(day_start_millis).transpose()?,
    end_date:   args.to.as_deref().map(day_end_millis).transpose()?,
    category:   args.category.clone(),
  };

  let papers = db.list_papers(PaperOrder::CreatedAt).await?;
  let results = run_search(papers, args.query.as_deref(), &filters, args.sort.into());

  if results.is_empty() {
    println!("{} No papers matched", style(INFO_PREFIX).cyan());
    return Ok(());
  }

  println!("{} {} papers", style(INFO_PREFIX).cyan(), results.len());
  for paper in &results {
    if args.detailed {
      print_paper(paper);
    } else {
      print_paper_line(paper);
    }
  }
  Ok(())
}

/// Parses YYYY-MM-DD into the epoch millis at the start of that day (UTC).
fn day_start_millis(text: &str) -> Result<i64> {
  let date = parse_date(text)?;
  Ok(date.and_hms_opt(0, 0, 0).expect("midnight exists").and_utc().timestamp_millis())
}

/// Parses YYYY-MM-DD into the epoch millis at the end of that day (UTC), so
/// the inclusive bound covers the whole day.
fn day_end_millis(text: &str) -> Result<i64> {
  let date = parse_date(text)?;
  Ok(
    date.and_hms_milli_opt(23, 59, 59, 999).expect("end of day exists").and_utc().timestamp_millis(),
  )
}

/// Parses a YYYY-MM-DD argument.
fn parse_date(text: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(text, "%Y-%m-%d")
    .map_err(|_| CatcherdError::InvalidDate(text.to_string()))
}
