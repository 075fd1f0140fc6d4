//! Scoring of papers related to a reference paper.
//!
//! Relatedness is a hand-tuned additive heuristic over three signals: a
//! shared origin keyword, overlapping title tokens, and overlapping authors.
//! Candidates that share nothing are excluded rather than ranked at zero.
//!
//! The lookup is best-effort: an invalid or unknown reference id yields an
//! empty list, never an error.

use super::*;
use crate::{
  database::{Database, PaperOrder},
  paper::Paper,
};

/// How many related papers to return when the caller does not say.
pub const DEFAULT_RELATED_LIMIT: usize = 5;

/// Finds up to `limit` stored papers related to the paper with this id,
/// strongest relation first. The reference paper itself is never included.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> Result<(), catcher::error::CatcherError> {
/// let db = catcher::database::Database::open_in_memory().await?;
/// let related = catcher::related::find_related(&db, 42, None).await?;
/// assert!(related.len() <= catcher::related::DEFAULT_RELATED_LIMIT);
/// # Ok(())
/// # }
/// ```
pub async fn find_related(
  db: &Database,
  paper_id: i64,
  limit: Option<usize>,
) -> Result<Vec<Paper>> {
  if paper_id <= 0 {
    return Ok(Vec::new());
  }
  let Some(reference) = db.get_paper(paper_id).await? else {
    return Ok(Vec::new());
  };

  let limit = limit.unwrap_or(DEFAULT_RELATED_LIMIT);
  let mut scored: Vec<(i64, Paper)> = db
    .list_papers(PaperOrder::CreatedAt)
    .await?
    .into_iter()
    .filter(|candidate| candidate.id != reference.id)
    .filter_map(|candidate| {
      let score = related_score(&reference, &candidate);
      (score > 0).then_some((score, candidate))
    })
    .collect();

  scored.sort_by(|a, b| b.0.cmp(&a.0));
  scored.truncate(limit);
  Ok(scored.into_iter().map(|(_, paper)| paper).collect())
}

/// The additive relatedness score between a reference paper and a candidate:
///
/// - +10 when both carry the same non-empty origin keyword
/// - +2 per reference title token (longer than 3 characters) with substring
///   overlap, in either direction, against any candidate title token —
///   counted once per reference token
/// - +5 per reference author appearing in the candidate's authors string
///   (trimmed, case-insensitive substring containment)
///
/// Titles use the translated text when present, the original otherwise.
pub fn related_score(reference: &Paper, candidate: &Paper) -> i64 {
  let mut score = 0;

  if let (Some(a), Some(b)) = (&reference.origin_keyword, &candidate.origin_keyword) {
    if !a.is_empty() && a == b {
      score += 10;
    }
  }

  let reference_title = reference.matching_title().to_lowercase();
  let candidate_title = candidate.matching_title().to_lowercase();
  let candidate_tokens: Vec<&str> = candidate_title.split_whitespace().collect();
  for token in reference_title.split_whitespace().filter(|t| t.chars().count() > 3) {
    if candidate_tokens.iter().any(|c| c.contains(token) || token.contains(c)) {
      score += 2;
    }
  }

  let candidate_authors = candidate.authors.to_lowercase();
  for author in reference.authors.split(',') {
    let author = author.trim().to_lowercase();
    if !author.is_empty() && candidate_authors.contains(&author) {
      score += 5;
    }
  }

  score
}
