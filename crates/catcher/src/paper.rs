//! Core value types for paper and keyword management.
//!
//! [`Paper`] is the canonical stored record; [`RawPaper`] is the feed
//! client's pre-storage output; [`Keyword`] drives which feed queries run;
//! [`Favorite`] is a per-user bookmark referencing a stored paper.
//!
//! # Examples
//!
//! ```
//! use catcher::paper::RawPaper;
//!
//! let raw = RawPaper {
//!   source_id:      "2401.00001".to_string(),
//!   title:          "An Example Paper".to_string(),
//!   authors:        "Alice Researcher, Bob Scholar".to_string(),
//!   abstract_text:  "We study examples.".to_string(),
//!   category:       "cs.LG".to_string(),
//!   published_at:   Some(1_704_067_200_000),
//!   source_url:     "https://arxiv.org/abs/2401.00001v1".to_string(),
//!   pdf_url:        "https://arxiv.org/pdf/2401.00001v1.pdf".to_string(),
//!   origin_keyword: "machine learning".to_string(),
//! };
//! assert_eq!(raw.authors.split(", ").count(), 2);
//! ```

use super::*;

/// A stored paper record with optional translated fields.
///
/// Created by the ingestion pipeline on first sighting of a `source_id`;
/// after that only the translation fields are mutated. `source_id` is
/// globally unique — the storage layer refuses a second insert for the same
/// identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
  /// Database identifier
  pub id:                  i64,
  /// The feed's stable identifier, version suffix stripped (e.g. "2401.00001")
  pub source_id:           String,
  /// The paper's full title, whitespace-collapsed
  pub title:               String,
  /// Translated title, absent until a translation succeeds
  pub title_translated:    Option<String>,
  /// Author names joined with `", "`, in document order
  pub authors:             String,
  /// Full abstract text, whitespace-collapsed
  pub abstract_text:       String,
  /// Translated abstract, absent until a translation succeeds
  pub abstract_translated: Option<String>,
  /// Primary feed category (e.g. "cs.LG")
  pub category:            Option<String>,
  /// Publication timestamp in epoch milliseconds
  pub published_at:        Option<i64>,
  /// Canonical abstract-page URL
  pub source_url:          String,
  /// URL of the PDF document
  pub pdf_url:             Option<String>,
  /// The keyword whose feed query first surfaced this paper
  pub origin_keyword:      Option<String>,
  /// Citation count, when a source for it exists
  pub citation_count:      Option<i64>,
  /// When the record was inserted
  pub created_at:          DateTime<Utc>,
  /// When the record was last modified
  pub updated_at:          DateTime<Utc>,
}

impl Paper {
  /// The title used for cross-paper matching: the translated title when one
  /// is present and non-empty, otherwise the original.
  pub fn matching_title(&self) -> &str {
    self.title_translated.as_deref().filter(|t| !t.is_empty()).unwrap_or(&self.title)
  }
}

/// A paper as parsed from the feed, before it has a storage identity.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPaper {
  /// The feed's stable identifier, version suffix stripped
  pub source_id:      String,
  /// Title, whitespace-collapsed
  pub title:          String,
  /// Author names joined with `", "`, in document order
  pub authors:        String,
  /// Abstract text, whitespace-collapsed
  pub abstract_text:  String,
  /// Primary category, defaulted to `"arXiv"` when the entry carries none
  pub category:       String,
  /// Publication timestamp in epoch milliseconds, when parseable
  pub published_at:   Option<i64>,
  /// Abstract-page URL with an https scheme
  pub source_url:     String,
  /// PDF URL derived from the abstract-page URL
  pub pdf_url:        String,
  /// The keyword this paper was fetched for
  pub origin_keyword: String,
}

/// A registered search term driving feed polling.
///
/// Only keywords with `is_active` set are included in ingestion runs.
/// Keyword text is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
  /// Database identifier
  pub id:         i64,
  /// The search term sent to the feed
  pub text:       String,
  /// Whether this keyword participates in ingestion runs
  pub is_active:  bool,
  /// When the keyword was registered
  pub created_at: DateTime<Utc>,
  /// When the keyword was last toggled
  pub updated_at: DateTime<Utc>,
}

/// A per-user bookmark on a stored paper. Unique per (user, paper) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
  /// Database identifier
  pub id:         i64,
  /// The bookmarking user
  pub user_id:    i64,
  /// The bookmarked paper
  pub paper_id:   i64,
  /// When the bookmark was created
  pub created_at: DateTime<Utc>,
}
