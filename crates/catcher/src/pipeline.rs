//! Orchestration of feed fetching, translation, and storage.
//!
//! One pipeline run reads the active keywords, fetches candidates for each,
//! and stores the ones whose `source_id` has not been seen before — with a
//! best-effort translation attached when the language model cooperates.
//! Keywords and candidates are processed sequentially (one slow keyword
//! delays the batch, but no per-keyword concurrency limits or locks are
//! needed), and every per-item failure is recorded and skipped rather than
//! aborting the batch: "nothing new found" and "one keyword failed" are both
//! ordinary outcomes, not errors.
//!
//! Re-running the pipeline is idempotent — already-stored papers are skipped
//! by a pre-check, and the storage layer's uniqueness constraint absorbs the
//! race when two runs chase the same feed.
//!
//! # Examples
//!
//! ```no_run
//! use catcher::{
//!   database::Database, feed::FeedClient, pipeline::IngestionPipeline, translator::Translator,
//! };
//!
//! # async fn example() -> Result<(), catcher::error::CatcherError> {
//! let db = Database::open(Database::default_path()).await?;
//! let pipeline = IngestionPipeline::new(db, FeedClient::new(), Translator::new());
//!
//! let outcome = pipeline.run().await?;
//! println!("{} ({} added)", outcome.message, outcome.count);
//! # Ok(())
//! # }
//! ```

use super::*;
use crate::{
  database::Database,
  feed::FetchPapers,
  paper::{Paper, RawPaper},
  translator::{Translate, Translation},
};

/// How many entries to request per keyword when the caller does not say.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Result summary of a pipeline run or a bulk retranslation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestOutcome {
  /// Whether the operation as a whole was valid — partial failures still
  /// report success
  pub success: bool,
  /// Human-readable summary, including an error tally when steps failed
  pub message: String,
  /// Papers added (or retranslated) by this run
  pub count:   usize,
}

/// Result of retranslating a single paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetranslateOutcome {
  /// Whether the paper was found and a usable translation was stored
  pub success: bool,
  /// Human-readable summary
  pub message: String,
}

/// Orchestrates the feed client, translator, and storage.
pub struct IngestionPipeline<F, T> {
  /// Storage handle
  db:          Database,
  /// Feed client (seam for tests)
  feed:        F,
  /// Translator (seam for tests)
  translator:  T,
  /// Entries requested per keyword
  max_results: usize,
}

impl<F: FetchPapers, T: Translate> IngestionPipeline<F, T> {
  /// Creates a pipeline with the default per-keyword fetch size.
  pub fn new(db: Database, feed: F, translator: T) -> Self {
    Self { db, feed, translator, max_results: DEFAULT_MAX_RESULTS }
  }

  /// Overrides how many entries are requested per keyword.
  pub fn with_max_results(mut self, max_results: usize) -> Self {
    self.max_results = max_results;
    self
  }

  /// Fetches and stores new papers for every active keyword.
  ///
  /// Returns an unsuccessful outcome (without touching the network) when no
  /// keyword is active; otherwise reports success with the number of papers
  /// added and an error tally folded into the message.
  pub async fn run(&self) -> Result<IngestOutcome> {
    let keywords = self.db.active_keywords().await?;
    if keywords.is_empty() {
      return Ok(IngestOutcome {
        success: false,
        message: "No active keywords".to_string(),
        count:   0,
      });
    }

    let mut added = 0;
    let mut errors = 0;
    for keyword in &keywords {
      let candidates = self.feed.fetch(&keyword.text, self.max_results).await;
      debug!("Processing {} candidates for {:?}", candidates.len(), keyword.text);

      for candidate in candidates {
        match self.ingest_candidate(&candidate).await {
          Ok(true) => added += 1,
          Ok(false) => {},
          Err(e) => {
            error!("Failed to store paper {}: {e}", candidate.source_id);
            errors += 1;
          },
        }
      }
    }

    let message = if errors > 0 {
      format!("Saved {added} new papers ({errors} errors)")
    } else {
      format!("Saved {added} new papers")
    };
    Ok(IngestOutcome { success: true, message, count: added })
  }

  /// Stores one candidate unless it is already known. Returns whether a new
  /// record was created. Translation failures never block the insert.
  async fn ingest_candidate(&self, candidate: &RawPaper) -> Result<bool> {
    if self.db.get_paper_by_source_id(&candidate.source_id).await?.is_some() {
      return Ok(false);
    }

    let translation =
      match self.translator.translate(&candidate.title, &candidate.abstract_text).await {
        Ok(translation) => translation,
        Err(e) => {
          warn!("Translation skipped for {}: {e}", candidate.source_id);
          Translation::default()
        },
      };

    // A racing duplicate insert comes back as None and is not counted.
    Ok(self.db.insert_paper(candidate, &translation).await?.is_some())
  }

  /// Retranslates a single stored paper, persisting the result only when
  /// the translator produced usable text.
  pub async fn retranslate(&self, paper_id: i64) -> Result<RetranslateOutcome> {
    let Some(paper) = self.db.get_paper(paper_id).await? else {
      return Ok(RetranslateOutcome {
        success: false,
        message: "Paper not found".to_string(),
      });
    };

    let translation = self
      .translator
      .translate(&paper.title, &paper.abstract_text)
      .await
      .unwrap_or_default();
    if translation.is_empty() {
      return Ok(RetranslateOutcome { success: false, message: "Translation failed".to_string() });
    }

    self.db.update_translation(&paper.source_id, &translation).await?;
    Ok(RetranslateOutcome { success: true, message: "Translation complete".to_string() })
  }

  /// Retranslates every paper still missing a translated field. Each paper
  /// is handled independently; failures are logged and the loop continues.
  pub async fn retranslate_all(&self) -> Result<IngestOutcome> {
    let papers = self.db.untranslated_papers().await?;

    let mut translated = 0;
    for paper in &papers {
      match self.refresh_translation(paper).await {
        Ok(true) => translated += 1,
        Ok(false) => debug!("Translation still empty for {}", paper.source_id),
        Err(e) => error!("Retranslation failed for {}: {e}", paper.source_id),
      }
    }

    Ok(IngestOutcome {
      success: true,
      message: format!("Translated {translated} papers"),
      count:   translated,
    })
  }

  /// Translates one paper and persists a non-empty result. Returns whether
  /// the stored record was updated.
  async fn refresh_translation(&self, paper: &Paper) -> Result<bool> {
    let translation = self.translator.translate(&paper.title, &paper.abstract_text).await?;
    if translation.is_empty() {
      return Ok(false);
    }
    self.db.update_translation(&paper.source_id, &translation).await
  }
}
