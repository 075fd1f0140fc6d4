//! In-memory filtering, sorting, and relevance ranking over stored papers.
//!
//! The read path loads the catalog from storage and narrows it here: every
//! filter is optional and they AND-compose, filtering always runs before
//! sorting, and all sorts are stable. The relevance strategy orders by a
//! deliberately simple additive heuristic — fixed weights over substring
//! matches, no length normalization — whose exact behavior downstream
//! consumers pin, so the weights must not be "improved".
//!
//! # Examples
//!
//! ```
//! use catcher::search::{search, SearchFilters, SortBy};
//!
//! let papers = Vec::new();
//! let filters = SearchFilters { category: Some("cs.LG".to_string()), ..Default::default() };
//! let hits = search(papers, Some("transformer"), &filters, SortBy::Relevance);
//! assert!(hits.is_empty());
//! ```

use super::*;
use crate::paper::Paper;

/// Optional constraints AND-composed over the paper collection.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
  /// Case-insensitive substring match against the authors string
  pub author:     Option<String>,
  /// Inclusive lower bound on `published_at`, epoch millis
  pub start_date: Option<i64>,
  /// Inclusive upper bound on `published_at`, epoch millis
  pub end_date:   Option<i64>,
  /// Case-insensitive exact match against the category
  pub category:   Option<String>,
}

/// Orderings for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
  /// Newest records first
  #[default]
  CreatedAt,
  /// Most recently published first; papers without a date last
  PublishedAt,
  /// Category ascending; uncategorized papers first
  Category,
  /// Most cited first; papers without a count last
  Citations,
  /// Highest relevance score first; requires a non-empty query, otherwise
  /// the filtered order is left untouched
  Relevance,
}

/// Filters `papers` by the query and filters, then sorts by `sort`.
pub fn search(
  papers: Vec<Paper>,
  query: Option<&str>,
  filters: &SearchFilters,
  sort: SortBy,
) -> Vec<Paper> {
  let query = query.map(str::to_lowercase).filter(|q| !q.is_empty());

  let mut papers: Vec<Paper> = papers
    .into_iter()
    .filter(|paper| matches_filters(paper, query.as_deref(), filters))
    .collect();

  sort_papers(&mut papers, query.as_deref(), sort);
  papers
}

/// Whether one paper satisfies the query and every set filter.
fn matches_filters(paper: &Paper, query: Option<&str>, filters: &SearchFilters) -> bool {
  if let Some(q) = query {
    let matched = contains_ci(&paper.title, q)
      || paper.title_translated.as_deref().is_some_and(|t| contains_ci(t, q))
      || contains_ci(&paper.abstract_text, q)
      || paper.abstract_translated.as_deref().is_some_and(|t| contains_ci(t, q))
      || contains_ci(&paper.authors, q);
    if !matched {
      return false;
    }
  }

  if let Some(author) = &filters.author {
    if !contains_ci(&paper.authors, &author.to_lowercase()) {
      return false;
    }
  }

  // A paper with no publication date compares as timestamp 0.
  let published = paper.published_at.unwrap_or(0);
  if let Some(start) = filters.start_date {
    if published < start {
      return false;
    }
  }
  if let Some(end) = filters.end_date {
    if published > end {
      return false;
    }
  }

  if let Some(category) = &filters.category {
    if !paper.category.as_deref().is_some_and(|c| c.eq_ignore_ascii_case(category)) {
      return false;
    }
  }

  true
}

/// Applies the selected sort strategy in place. Every strategy uses a stable
/// sort, so equal keys keep their filtered order.
fn sort_papers(papers: &mut [Paper], query: Option<&str>, sort: SortBy) {
  match sort {
    SortBy::CreatedAt => papers.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    SortBy::PublishedAt =>
      papers.sort_by(|a, b| b.published_at.unwrap_or(0).cmp(&a.published_at.unwrap_or(0))),
    SortBy::Category => papers.sort_by(|a, b| {
      a.category.as_deref().unwrap_or("").cmp(b.category.as_deref().unwrap_or(""))
    }),
    SortBy::Citations =>
      papers.sort_by(|a, b| b.citation_count.unwrap_or(0).cmp(&a.citation_count.unwrap_or(0))),
    SortBy::Relevance =>
      if let Some(q) = query {
        papers.sort_by_cached_key(|paper| std::cmp::Reverse(relevance_score(paper, q)));
      },
  }
}

/// The additive relevance heuristic, computed against a pre-lowercased
/// query. Weights and structure are pinned:
///
/// - +100 when the translated title contains the query
/// - +100 when the original title contains the query (independent of the above)
/// - +50 per occurrence of the query in the translated title
/// - +10 per occurrence in the translated and original abstracts
/// - +30 when the authors string contains the query
///
/// Occurrences are literal, non-overlapping substring matches — the query is
/// never interpreted as a pattern, so metacharacters are inert.
pub fn relevance_score(paper: &Paper, query_lower: &str) -> i64 {
  let title = paper.title.to_lowercase();
  let title_translated = paper.title_translated.as_deref().unwrap_or("").to_lowercase();
  let abstract_text = paper.abstract_text.to_lowercase();
  let abstract_translated = paper.abstract_translated.as_deref().unwrap_or("").to_lowercase();
  let authors = paper.authors.to_lowercase();

  let mut score = 0;
  if title_translated.contains(query_lower) {
    score += 100;
  }
  if title.contains(query_lower) {
    score += 100;
  }
  score += 50 * count_occurrences(&title_translated, query_lower);
  score += 10
    * (count_occurrences(&abstract_translated, query_lower)
      + count_occurrences(&abstract_text, query_lower));
  if authors.contains(query_lower) {
    score += 30;
  }
  score
}

/// Case-insensitive containment; the needle must already be lowercased.
fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
  haystack.to_lowercase().contains(needle_lower)
}

/// Literal, non-overlapping occurrence count.
fn count_occurrences(haystack: &str, needle: &str) -> i64 {
  if needle.is_empty() {
    return 0;
  }
  haystack.matches(needle).count() as i64
}

#[cfg(test)]
mod tests {
  use super::*;

  fn paper(n: i64) -> Paper {
    Paper {
      id:                  n,
      source_id:           format!("2401.{n:05}"),
      title:               format!("Paper {n}"),
      title_translated:    None,
      authors:             "Alice Researcher".to_string(),
      abstract_text:       "An abstract.".to_string(),
      abstract_translated: None,
      category:            Some("cs.LG".to_string()),
      published_at:        Some(1_000_000 + n),
      source_url:          format!("https://arxiv.org/abs/2401.{n:05}"),
      pdf_url:             None,
      origin_keyword:      None,
      citation_count:      None,
      created_at:          DateTime::from_timestamp_millis(1_700_000_000_000 + n).unwrap(),
      updated_at:          DateTime::from_timestamp_millis(1_700_000_000_000 + n).unwrap(),
    }
  }

  #[test]
  fn relevance_weights_title_occurrences() {
    // A: query appears twice in the title, never in the abstract.
    let mut a = paper(1);
    a.title = "Quantum Methods for Quantum Systems".to_string();
    // B: query appears once in the title.
    let mut b = paper(2);
    b.title = "Quantum Computing".to_string();

    let score_a = relevance_score(&a, "quantum");
    let score_b = relevance_score(&b, "quantum");
    assert!(score_a == score_b); // both only match the original title once for +100

    // With translated titles carrying the occurrences, the +50-per-occurrence
    // term separates them.
    a.title_translated = Some("Quantum Quantum".to_string());
    b.title_translated = Some("Quantum".to_string());
    assert!(relevance_score(&a, "quantum") > relevance_score(&b, "quantum"));
    assert_eq!(relevance_score(&a, "quantum") - relevance_score(&b, "quantum"), 50);
  }

  #[test]
  fn relevance_title_checks_are_independent() {
    let mut both = paper(1);
    both.title = "Graph Learning".to_string();
    both.title_translated = Some("graph learning translated".to_string());
    // 100 (translated contains) + 100 (original contains) + 50 * 1 occurrence
    assert_eq!(relevance_score(&both, "graph learning"), 250);
  }

  #[test]
  fn relevance_counts_abstract_occurrences_at_ten() {
    let mut a = paper(1);
    a.title = "Unrelated".to_string();
    a.abstract_text = "flow matching improves flow models".to_string();
    assert_eq!(relevance_score(&a, "flow"), 20);
  }

  #[test]
  fn relevance_author_match_scores_thirty() {
    let mut a = paper(1);
    a.title = "Unrelated".to_string();
    a.abstract_text = "Nothing here.".to_string();
    a.authors = "Grace Hopper".to_string();
    assert_eq!(relevance_score(&a, "hopper"), 30);
  }

  #[test]
  fn relevance_treats_metacharacters_literally() {
    let mut a = paper(1);
    a.title = "On a.b notation".to_string();
    a.abstract_text = "we write a.b twice: a.b".to_string();
    // "a.b" must not match "axb"-style patterns, only the literal text.
    assert_eq!(relevance_score(&a, "a.b"), 100 + 10 * 2);
  }

  #[test]
  fn query_matches_across_fields() {
    let mut by_title = paper(1);
    by_title.title = "Neural Radiance Fields".to_string();
    let mut by_abstract = paper(2);
    by_abstract.abstract_text = "We render radiance fields.".to_string();
    let mut by_author = paper(3);
    by_author.authors = "Radia Perlman".to_string();
    let mut by_translation = paper(4);
    by_translation.title_translated = Some("radiance 翻訳".to_string());
    let miss = paper(5);

    let results = search(
      vec![by_title, by_abstract, by_author, by_translation, miss],
      Some("radia"),
      &SearchFilters::default(),
      SortBy::CreatedAt,
    );
    let ids: Vec<_> = results.iter().map(|p| p.id).collect();
    assert_eq!(results.len(), 4);
    assert!(!ids.contains(&5));
  }

  #[test]
  fn filters_and_query_conjoin() {
    let mut matching = paper(1);
    matching.title = "Transformer Circuits".to_string();
    matching.category = Some("cs.LG".to_string());
    let mut wrong_category = paper(2);
    wrong_category.title = "Transformer Circuits".to_string();
    wrong_category.category = Some("cs.CV".to_string());
    let mut wrong_query = paper(3);
    wrong_query.title = "Unrelated".to_string();
    wrong_query.abstract_text = "Unrelated".to_string();
    wrong_query.authors = "Nobody".to_string();
    wrong_query.category = Some("cs.LG".to_string());

    let filters = SearchFilters { category: Some("cs.LG".to_string()), ..Default::default() };
    let results = search(
      vec![matching, wrong_category, wrong_query],
      Some("transformer"),
      &filters,
      SortBy::CreatedAt,
    );

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, 1);
    for paper in &results {
      assert!(paper.title.to_lowercase().contains("transformer"));
      assert_eq!(paper.category.as_deref(), Some("cs.LG"));
    }
  }

  #[test]
  fn category_filter_is_case_insensitive_exact() {
    let mut a = paper(1);
    a.category = Some("cs.LG".to_string());
    let filters = SearchFilters { category: Some("CS.lg".to_string()), ..Default::default() };
    assert_eq!(search(vec![a.clone()], None, &filters, SortBy::CreatedAt).len(), 1);

    // Substrings are not enough for the category filter.
    let filters = SearchFilters { category: Some("cs".to_string()), ..Default::default() };
    assert!(search(vec![a], None, &filters, SortBy::CreatedAt).is_empty());
  }

  #[test]
  fn author_filter_is_substring() {
    let mut a = paper(1);
    a.authors = "Jane Doe-Smith, Alan Turing".to_string();
    let filters = SearchFilters { author: Some("jane doe".to_string()), ..Default::default() };
    assert_eq!(search(vec![a], None, &filters, SortBy::CreatedAt).len(), 1);
  }

  #[test]
  fn date_range_bounds_are_inclusive() {
    let start = 10_000;
    let end = 20_000;
    let filters =
      SearchFilters { start_date: Some(start), end_date: Some(end), ..Default::default() };

    let mut at_start = paper(1);
    at_start.published_at = Some(start);
    let mut at_end = paper(2);
    at_end.published_at = Some(end);
    let mut before = paper(3);
    before.published_at = Some(start - 1);
    let mut after = paper(4);
    after.published_at = Some(end + 1);

    let results =
      search(vec![at_start, at_end, before, after], None, &filters, SortBy::CreatedAt);
    let ids: Vec<_> = results.iter().map(|p| p.id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&1) && ids.contains(&2));
  }

  #[test]
  fn missing_published_at_compares_as_zero() {
    let mut undated = paper(1);
    undated.published_at = None;

    let filters = SearchFilters { start_date: Some(1), ..Default::default() };
    assert!(search(vec![undated.clone()], None, &filters, SortBy::CreatedAt).is_empty());

    let filters = SearchFilters { start_date: Some(0), end_date: Some(5), ..Default::default() };
    assert_eq!(search(vec![undated], None, &filters, SortBy::CreatedAt).len(), 1);
  }

  #[test]
  fn sorts_by_published_with_missing_last() {
    let mut newest = paper(1);
    newest.published_at = Some(3_000);
    let mut oldest = paper(2);
    oldest.published_at = Some(1_000);
    let mut undated = paper(3);
    undated.published_at = None;

    let results = search(
      vec![oldest, undated, newest],
      None,
      &SearchFilters::default(),
      SortBy::PublishedAt,
    );
    let ids: Vec<_> = results.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
  }

  #[test]
  fn sorts_by_category_with_missing_first() {
    let mut lg = paper(1);
    lg.category = Some("cs.LG".to_string());
    let mut cl = paper(2);
    cl.category = Some("cs.CL".to_string());
    let mut none = paper(3);
    none.category = None;

    let results =
      search(vec![lg, cl, none], None, &SearchFilters::default(), SortBy::Category);
    let ids: Vec<_> = results.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
  }

  #[test]
  fn sorts_by_citations_with_missing_as_zero() {
    let mut most = paper(1);
    most.citation_count = Some(200);
    let mut least = paper(2);
    least.citation_count = Some(50);
    let mut uncounted = paper(3);
    uncounted.citation_count = None;

    let results = search(
      vec![least, uncounted, most],
      None,
      &SearchFilters::default(),
      SortBy::Citations,
    );
    let ids: Vec<_> = results.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
  }

  #[test]
  fn sorts_by_created_at_descending_by_default() {
    let results = search(
      vec![paper(1), paper(3), paper(2)],
      None,
      &SearchFilters::default(),
      SortBy::CreatedAt,
    );
    let ids: Vec<_> = results.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
  }

  #[test]
  fn relevance_without_query_preserves_order() {
    let results = search(
      vec![paper(2), paper(1), paper(3)],
      None,
      &SearchFilters::default(),
      SortBy::Relevance,
    );
    let ids: Vec<_> = results.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2, 1, 3]);

    let results = search(
      vec![paper(2), paper(1), paper(3)],
      Some(""),
      &SearchFilters::default(),
      SortBy::Relevance,
    );
    let ids: Vec<_> = results.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2, 1, 3]);
  }

  #[test]
  fn relevance_orders_descending_by_score() {
    let mut strong = paper(1);
    strong.title = "Diffusion Models for Diffusion".to_string();
    strong.title_translated = Some("diffusion diffusion diffusion".to_string());
    let mut weak = paper(2);
    weak.title = "Unrelated".to_string();
    weak.abstract_text = "A diffusion appears once.".to_string();

    let results = search(
      vec![weak, strong],
      Some("diffusion"),
      &SearchFilters::default(),
      SortBy::Relevance,
    );
    let ids: Vec<_> = results.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2]);
  }
}
