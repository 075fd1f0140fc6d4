//! Local SQLite storage for keywords, papers, and favorites.
//!
//! This module persists the paper catalog in a local SQLite database. The
//! schema is initialized from `migrations/init.sql` when a database is
//! opened, and carries the uniqueness constraints the rest of the system
//! leans on: keyword text, paper `source_id`, and the (user, paper) favorite
//! pair are all unique at the SQL level, so duplicate inserts are refused by
//! the storage engine even when two pipeline runs race.
//!
//! Refused duplicates and not-found lookups are reported as `None`/`false`,
//! never as errors.
//!
//! # Examples
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = catcher::database::Database::open("catcher.db").await?;
//!
//! if let Some(keyword) = db.add_keyword("machine learning").await? {
//!   println!("registered keyword #{}", keyword.id);
//! }
//!
//! for paper in db.list_papers(Default::default()).await? {
//!   println!("{}: {}", paper.source_id, paper.title);
//! }
//! # Ok(())
//! # }
//! ```

use rusqlite::params;
use tokio_rusqlite::Connection;

use super::*;
use crate::{
  paper::{Favorite, Keyword, Paper, RawPaper},
  translator::Translation,
};

/// Column list matching [`paper_from_row`]'s indices.
const PAPER_COLUMNS: &str = "id, source_id, title, title_translated, authors, abstract_text, \
                             abstract_translated, category, published_at, source_url, pdf_url, \
                             origin_keyword, citation_count, created_at, updated_at";

/// Orderings the storage layer can return papers in. The remaining sort
/// strategies (citations, relevance) are applied in memory by
/// [`search`](crate::search).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaperOrder {
  /// Newest records first
  #[default]
  CreatedAt,
  /// Most recently published first; papers without a publication date last
  PublishedAt,
  /// Category ascending; uncategorized papers first
  Category,
}

impl PaperOrder {
  /// The ORDER BY clause for this ordering.
  fn order_clause(&self) -> &'static str {
    match self {
      PaperOrder::CreatedAt => "created_at DESC",
      PaperOrder::PublishedAt => "published_at DESC",
      PaperOrder::Category => "category ASC",
    }
  }
}

/// Handle for interacting with the paper database.
///
/// Wraps an async SQLite connection; cloning shares the same connection.
#[derive(Clone)]
pub struct Database {
  /// Async SQLite connection handle
  conn: Connection,
}

impl Database {
  /// Opens an existing database or creates a new one at the specified path,
  /// initializing the schema from the bundled migrations.
  ///
  /// # Examples
  ///
  /// ```no_run
  /// # use catcher::database::Database;
  /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
  /// let db = Database::open(Database::default_path()).await?;
  /// # Ok(())
  /// # }
  /// ```
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    if let Some(parent) = path.as_ref().parent() {
      std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path.as_ref().to_path_buf()).await?;
    Self::initialize(conn).await
  }

  /// Opens an in-memory database, useful for tests and scratch work.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory().await?;
    Self::initialize(conn).await
  }

  /// Runs the schema migrations on a fresh connection.
  async fn initialize(conn: Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(include_str!(concat!(
          env!("CARGO_MANIFEST_DIR"),
          "/migrations/init.sql"
        )))?;
        Ok(())
      })
      .await?;

    Ok(Self { conn })
  }

  /// Returns the default path for the database file.
  ///
  /// - On Unix: `~/.local/share/catcher/catcher.db`
  /// - On macOS: `~/Library/Application Support/catcher/catcher.db`
  /// - On Windows: `%APPDATA%\catcher\catcher.db`
  /// - Fallback: `./catcher.db` in the current directory
  pub fn default_path() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join("catcher").join("catcher.db")
  }

  // --- Keywords ---------------------------------------------------------

  /// Registers a new keyword, active by default. Returns `None` when the
  /// text is already registered.
  ///
  /// # Errors
  ///
  /// Returns [`CatcherError::InvalidInput`] for empty (or all-whitespace)
  /// keyword text.
  pub async fn add_keyword(&self, text: &str) -> Result<Option<Keyword>> {
    let text = text.trim().to_string();
    if text.is_empty() {
      return Err(CatcherError::InvalidInput("keyword text must not be empty".to_string()));
    }

    let now = Utc::now();
    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(
          "INSERT INTO keywords (text, is_active, created_at, updated_at)
           VALUES (?1, 1, ?2, ?2)
           RETURNING id, text, is_active, created_at, updated_at",
        )?;

        match stmt.query_row(params![text, now], keyword_from_row) {
          Ok(keyword) => Ok(Some(keyword)),
          Err(e) if is_constraint_violation(&e) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await
      .map_err(CatcherError::from)
  }

  /// All registered keywords, newest first.
  pub async fn list_keywords(&self) -> Result<Vec<Keyword>> {
    self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare_cached(
          "SELECT id, text, is_active, created_at, updated_at
           FROM keywords ORDER BY created_at DESC",
        )?;
        let keywords =
          stmt.query_map([], keyword_from_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(keywords)
      })
      .await
      .map_err(CatcherError::from)
  }

  /// The keywords that participate in ingestion runs.
  pub async fn active_keywords(&self) -> Result<Vec<Keyword>> {
    self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare_cached(
          "SELECT id, text, is_active, created_at, updated_at
           FROM keywords WHERE is_active = 1 ORDER BY id",
        )?;
        let keywords =
          stmt.query_map([], keyword_from_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(keywords)
      })
      .await
      .map_err(CatcherError::from)
  }

  /// Flips a keyword's active flag. Returns the updated keyword, or `None`
  /// for an unknown id.
  pub async fn toggle_keyword(&self, id: i64) -> Result<Option<Keyword>> {
    let now = Utc::now();
    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(
          "UPDATE keywords SET is_active = NOT is_active, updated_at = ?2
           WHERE id = ?1
           RETURNING id, text, is_active, created_at, updated_at",
        )?;

        match stmt.query_row(params![id, now], keyword_from_row) {
          Ok(keyword) => Ok(Some(keyword)),
          Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await
      .map_err(CatcherError::from)
  }

  /// Deletes a keyword. Returns whether a row was removed.
  pub async fn delete_keyword(&self, id: i64) -> Result<bool> {
    self
      .conn
      .call(move |conn| {
        let removed = conn.execute("DELETE FROM keywords WHERE id = ?1", [id])?;
        Ok(removed > 0)
      })
      .await
      .map_err(CatcherError::from)
  }

  // --- Papers -----------------------------------------------------------

  /// Inserts a paper from the feed along with its (possibly empty)
  /// translation. Returns the stored record, or `None` when a paper with
  /// the same `source_id` already exists — the uniqueness constraint is the
  /// authoritative dedup, so a racing duplicate insert is absorbed here.
  pub async fn insert_paper(
    &self,
    raw: &RawPaper,
    translation: &Translation,
  ) -> Result<Option<Paper>> {
    let raw = raw.clone();
    let translation = translation.clone();
    let now = Utc::now();

    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(&format!(
          "INSERT INTO papers (
             source_id, title, title_translated, authors, abstract_text,
             abstract_translated, category, published_at, source_url, pdf_url,
             origin_keyword, citation_count, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, NULL, ?12, ?12)
           RETURNING {PAPER_COLUMNS}"
        ))?;

        let category = if raw.category.is_empty() { None } else { Some(raw.category.clone()) };
        let result = stmt.query_row(
          params![
            raw.source_id,
            raw.title,
            non_empty(&translation.title_translated),
            raw.authors,
            raw.abstract_text,
            non_empty(&translation.abstract_translated),
            category,
            raw.published_at,
            raw.source_url,
            raw.pdf_url,
            raw.origin_keyword,
            now,
          ],
          paper_from_row,
        );

        match result {
          Ok(paper) => Ok(Some(paper)),
          Err(e) if is_constraint_violation(&e) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await
      .map_err(CatcherError::from)
  }

  /// Looks up a paper by its database id.
  pub async fn get_paper(&self, id: i64) -> Result<Option<Paper>> {
    self
      .conn
      .call(move |conn| {
        let mut stmt =
          conn.prepare_cached(&format!("SELECT {PAPER_COLUMNS} FROM papers WHERE id = ?1"))?;

        match stmt.query_row([id], paper_from_row) {
          Ok(paper) => Ok(Some(paper)),
          Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await
      .map_err(CatcherError::from)
  }

  /// Looks up a paper by its feed identifier.
  pub async fn get_paper_by_source_id(&self, source_id: &str) -> Result<Option<Paper>> {
    let source_id = source_id.to_string();
    self
      .conn
      .call(move |conn| {
        let mut stmt = conn
          .prepare_cached(&format!("SELECT {PAPER_COLUMNS} FROM papers WHERE source_id = ?1"))?;

        match stmt.query_row([source_id], paper_from_row) {
          Ok(paper) => Ok(Some(paper)),
          Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await
      .map_err(CatcherError::from)
  }

  /// All stored papers in the requested order.
  pub async fn list_papers(&self, order: PaperOrder) -> Result<Vec<Paper>> {
    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(&format!(
          "SELECT {PAPER_COLUMNS} FROM papers ORDER BY {}",
          order.order_clause()
        ))?;
        let papers = stmt.query_map([], paper_from_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(papers)
      })
      .await
      .map_err(CatcherError::from)
  }

  /// Papers still missing either translated field.
  pub async fn untranslated_papers(&self) -> Result<Vec<Paper>> {
    self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare_cached(&format!(
          "SELECT {PAPER_COLUMNS} FROM papers
           WHERE title_translated IS NULL OR title_translated = ''
              OR abstract_translated IS NULL OR abstract_translated = ''
           ORDER BY created_at DESC"
        ))?;
        let papers = stmt.query_map([], paper_from_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(papers)
      })
      .await
      .map_err(CatcherError::from)
  }

  /// Stores a translation for the paper with this feed identifier. Returns
  /// whether a row was updated.
  pub async fn update_translation(
    &self,
    source_id: &str,
    translation: &Translation,
  ) -> Result<bool> {
    let source_id = source_id.to_string();
    let translation = translation.clone();
    let now = Utc::now();

    self
      .conn
      .call(move |conn| {
        let updated = conn.execute(
          "UPDATE papers SET title_translated = ?2, abstract_translated = ?3, updated_at = ?4
           WHERE source_id = ?1",
          params![
            source_id,
            non_empty(&translation.title_translated),
            non_empty(&translation.abstract_translated),
            now
          ],
        )?;
        Ok(updated > 0)
      })
      .await
      .map_err(CatcherError::from)
  }

  /// Deletes a paper. Returns whether a row was removed.
  pub async fn delete_paper(&self, id: i64) -> Result<bool> {
    self
      .conn
      .call(move |conn| {
        let removed = conn.execute("DELETE FROM papers WHERE id = ?1", [id])?;
        Ok(removed > 0)
      })
      .await
      .map_err(CatcherError::from)
  }

  /// The distinct categories present in the catalog, sorted.
  pub async fn categories(&self) -> Result<Vec<String>> {
    self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare_cached(
          "SELECT DISTINCT category FROM papers
           WHERE category IS NOT NULL AND category <> ''
           ORDER BY category",
        )?;
        let categories =
          stmt.query_map([], |row| row.get::<_, String>(0))?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(categories)
      })
      .await
      .map_err(CatcherError::from)
  }

  // --- Favorites --------------------------------------------------------

  /// Bookmarks a paper for a user. Returns `None` when the pair already
  /// exists or the paper does not.
  pub async fn add_favorite(&self, user_id: i64, paper_id: i64) -> Result<Option<Favorite>> {
    let now = Utc::now();
    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(
          "INSERT INTO favorites (user_id, paper_id, created_at) VALUES (?1, ?2, ?3)
           RETURNING id, user_id, paper_id, created_at",
        )?;

        let result = stmt.query_row(params![user_id, paper_id, now], |row| {
          Ok(Favorite {
            id:         row.get(0)?,
            user_id:    row.get(1)?,
            paper_id:   row.get(2)?,
            created_at: row.get(3)?,
          })
        });

        match result {
          Ok(favorite) => Ok(Some(favorite)),
          Err(e) if is_constraint_violation(&e) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await
      .map_err(CatcherError::from)
  }

  /// Removes a user's bookmark. Returns whether a row was removed.
  pub async fn remove_favorite(&self, user_id: i64, paper_id: i64) -> Result<bool> {
    self
      .conn
      .call(move |conn| {
        let removed = conn.execute(
          "DELETE FROM favorites WHERE user_id = ?1 AND paper_id = ?2",
          params![user_id, paper_id],
        )?;
        Ok(removed > 0)
      })
      .await
      .map_err(CatcherError::from)
  }

  /// The papers a user has bookmarked, most recently bookmarked first.
  pub async fn list_favorites(&self, user_id: i64) -> Result<Vec<Paper>> {
    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(
          "SELECT p.id, p.source_id, p.title, p.title_translated, p.authors, p.abstract_text,
                  p.abstract_translated, p.category, p.published_at, p.source_url, p.pdf_url,
                  p.origin_keyword, p.citation_count, p.created_at, p.updated_at
           FROM papers p
           JOIN favorites f ON f.paper_id = p.id
           WHERE f.user_id = ?1
           ORDER BY f.created_at DESC",
        )?;
        let papers =
          stmt.query_map([user_id], paper_from_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(papers)
      })
      .await
      .map_err(CatcherError::from)
  }

  /// Whether a user has bookmarked this paper.
  pub async fn is_favorite(&self, user_id: i64, paper_id: i64) -> Result<bool> {
    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(
          "SELECT EXISTS(SELECT 1 FROM favorites WHERE user_id = ?1 AND paper_id = ?2)",
        )?;
        let exists = stmt.query_row(params![user_id, paper_id], |row| row.get::<_, bool>(0))?;
        Ok(exists)
      })
      .await
      .map_err(CatcherError::from)
  }
}

/// Maps a row selected with [`PAPER_COLUMNS`] to a [`Paper`].
fn paper_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Paper> {
  Ok(Paper {
    id:                  row.get(0)?,
    source_id:           row.get(1)?,
    title:               row.get(2)?,
    title_translated:    row.get(3)?,
    authors:             row.get(4)?,
    abstract_text:       row.get(5)?,
    abstract_translated: row.get(6)?,
    category:            row.get(7)?,
    published_at:        row.get(8)?,
    source_url:          row.get(9)?,
    pdf_url:             row.get(10)?,
    origin_keyword:      row.get(11)?,
    citation_count:      row.get(12)?,
    created_at:          row.get(13)?,
    updated_at:          row.get(14)?,
  })
}

/// Maps a keyword row to a [`Keyword`].
fn keyword_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Keyword> {
  Ok(Keyword {
    id:         row.get(0)?,
    text:       row.get(1)?,
    is_active:  row.get(2)?,
    created_at: row.get(3)?,
    updated_at: row.get(4)?,
  })
}

/// True when an operation failed SQLite's uniqueness or foreign-key checks.
fn is_constraint_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(inner, _)
      if inner.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

/// Empty strings from the translator become NULL columns.
fn non_empty(text: &str) -> Option<&str> {
  if text.is_empty() {
    None
  } else {
    Some(text)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// Helper function to set up a test database
  async fn setup_test_db() -> (Database, PathBuf, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(&path).await.unwrap();
    (db, path, dir)
  }

  fn sample_raw(n: u32) -> RawPaper {
    RawPaper {
      source_id:      format!("2401.{n:05}"),
      title:          format!("Sample Paper {n}"),
      authors:        "Alice Researcher, Bob Scholar".to_string(),
      abstract_text:  "A sample abstract.".to_string(),
      category:       "cs.LG".to_string(),
      published_at:   Some(1_704_067_200_000 + i64::from(n)),
      source_url:     format!("https://arxiv.org/abs/2401.{n:05}"),
      pdf_url:        format!("https://arxiv.org/pdf/2401.{n:05}.pdf"),
      origin_keyword: "machine learning".to_string(),
    }
  }

  fn sample_translation() -> Translation {
    Translation {
      title_translated:    "サンプル論文".to_string(),
      abstract_translated: "サンプル要旨。".to_string(),
    }
  }

  #[traced_test]
  #[tokio::test]
  async fn test_database_creation() {
    let (_db, path, _dir) = setup_test_db().await;
    assert!(path.exists());
  }

  #[traced_test]
  #[tokio::test]
  async fn test_keyword_roundtrip_and_uniqueness() {
    let (db, _path, _dir) = setup_test_db().await;

    let keyword = db.add_keyword("machine learning").await.unwrap().unwrap();
    assert!(keyword.is_active);
    assert_eq!(keyword.text, "machine learning");

    // Second registration of the same text is refused, not an error.
    assert!(db.add_keyword("machine learning").await.unwrap().is_none());
    assert!(db.add_keyword("  machine learning  ").await.unwrap().is_none());

    assert_eq!(db.list_keywords().await.unwrap().len(), 1);
  }

  #[traced_test]
  #[tokio::test]
  async fn test_empty_keyword_is_invalid_input() {
    let (db, _path, _dir) = setup_test_db().await;
    assert!(matches!(db.add_keyword("   ").await, Err(CatcherError::InvalidInput(_))));
  }

  #[traced_test]
  #[tokio::test]
  async fn test_toggle_keyword() {
    let (db, _path, _dir) = setup_test_db().await;
    let keyword = db.add_keyword("nlp").await.unwrap().unwrap();

    let toggled = db.toggle_keyword(keyword.id).await.unwrap().unwrap();
    assert!(!toggled.is_active);
    let toggled = db.toggle_keyword(keyword.id).await.unwrap().unwrap();
    assert!(toggled.is_active);

    assert!(db.toggle_keyword(9999).await.unwrap().is_none());
  }

  #[traced_test]
  #[tokio::test]
  async fn test_active_keywords_excludes_disabled() {
    let (db, _path, _dir) = setup_test_db().await;
    db.add_keyword("active one").await.unwrap().unwrap();
    let disabled = db.add_keyword("disabled one").await.unwrap().unwrap();
    db.toggle_keyword(disabled.id).await.unwrap().unwrap();

    let active = db.active_keywords().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].text, "active one");
  }

  #[traced_test]
  #[tokio::test]
  async fn test_delete_keyword() {
    let (db, _path, _dir) = setup_test_db().await;
    let keyword = db.add_keyword("ephemeral").await.unwrap().unwrap();
    assert!(db.delete_keyword(keyword.id).await.unwrap());
    assert!(!db.delete_keyword(keyword.id).await.unwrap());
  }

  #[traced_test]
  #[tokio::test]
  async fn test_insert_paper_and_dedup() {
    let (db, _path, _dir) = setup_test_db().await;
    let raw = sample_raw(1);

    let paper = db.insert_paper(&raw, &sample_translation()).await.unwrap().unwrap();
    assert_eq!(paper.source_id, "2401.00001");
    assert_eq!(paper.title_translated.as_deref(), Some("サンプル論文"));
    assert_eq!(paper.category.as_deref(), Some("cs.LG"));

    // The uniqueness constraint absorbs a repeated insert.
    assert!(db.insert_paper(&raw, &sample_translation()).await.unwrap().is_none());
    assert_eq!(db.list_papers(PaperOrder::CreatedAt).await.unwrap().len(), 1);

    let fetched = db.get_paper_by_source_id("2401.00001").await.unwrap().unwrap();
    assert_eq!(fetched, paper);
  }

  #[traced_test]
  #[tokio::test]
  async fn test_empty_translation_stored_as_null() {
    let (db, _path, _dir) = setup_test_db().await;
    let paper = db.insert_paper(&sample_raw(2), &Translation::default()).await.unwrap().unwrap();
    assert!(paper.title_translated.is_none());
    assert!(paper.abstract_translated.is_none());
  }

  #[traced_test]
  #[tokio::test]
  async fn test_update_translation() {
    let (db, _path, _dir) = setup_test_db().await;
    db.insert_paper(&sample_raw(3), &Translation::default()).await.unwrap().unwrap();

    assert!(db.update_translation("2401.00003", &sample_translation()).await.unwrap());
    let paper = db.get_paper_by_source_id("2401.00003").await.unwrap().unwrap();
    assert_eq!(paper.title_translated.as_deref(), Some("サンプル論文"));

    assert!(!db.update_translation("9999.99999", &sample_translation()).await.unwrap());
  }

  #[traced_test]
  #[tokio::test]
  async fn test_untranslated_papers_selection() {
    let (db, _path, _dir) = setup_test_db().await;
    db.insert_paper(&sample_raw(4), &sample_translation()).await.unwrap().unwrap();
    db.insert_paper(&sample_raw(5), &Translation::default()).await.unwrap().unwrap();
    db.insert_paper(
      &sample_raw(6),
      &Translation { title_translated: "タイトルのみ".to_string(), ..Default::default() },
    )
    .await
    .unwrap()
    .unwrap();

    let untranslated = db.untranslated_papers().await.unwrap();
    let ids: Vec<_> = untranslated.iter().map(|p| p.source_id.as_str()).collect();
    assert_eq!(untranslated.len(), 2);
    assert!(ids.contains(&"2401.00005"));
    assert!(ids.contains(&"2401.00006"));
  }

  #[traced_test]
  #[tokio::test]
  async fn test_categories_distinct_and_sorted() {
    let (db, _path, _dir) = setup_test_db().await;
    let mut a = sample_raw(7);
    a.category = "cs.LG".to_string();
    let mut b = sample_raw(8);
    b.category = "cs.CL".to_string();
    let mut c = sample_raw(9);
    c.category = "cs.LG".to_string();

    for raw in [&a, &b, &c] {
      db.insert_paper(raw, &Translation::default()).await.unwrap().unwrap();
    }

    assert_eq!(db.categories().await.unwrap(), vec!["cs.CL".to_string(), "cs.LG".to_string()]);
  }

  #[traced_test]
  #[tokio::test]
  async fn test_list_papers_order_by_published() {
    let (db, _path, _dir) = setup_test_db().await;
    let mut old = sample_raw(10);
    old.published_at = Some(1_000);
    let mut new = sample_raw(11);
    new.published_at = Some(2_000);
    let mut missing = sample_raw(12);
    missing.published_at = None;

    for raw in [&old, &new, &missing] {
      db.insert_paper(raw, &Translation::default()).await.unwrap().unwrap();
    }

    let papers = db.list_papers(PaperOrder::PublishedAt).await.unwrap();
    assert_eq!(papers[0].source_id, "2401.00011");
    assert_eq!(papers[1].source_id, "2401.00010");
    // A paper without a publication date sorts last.
    assert_eq!(papers[2].source_id, "2401.00012");
  }

  #[traced_test]
  #[tokio::test]
  async fn test_favorites_roundtrip() {
    let (db, _path, _dir) = setup_test_db().await;
    let paper = db.insert_paper(&sample_raw(13), &Translation::default()).await.unwrap().unwrap();

    let favorite = db.add_favorite(1, paper.id).await.unwrap().unwrap();
    assert_eq!(favorite.paper_id, paper.id);
    // The (user, paper) pair is unique.
    assert!(db.add_favorite(1, paper.id).await.unwrap().is_none());
    // A different user may bookmark the same paper.
    assert!(db.add_favorite(2, paper.id).await.unwrap().is_some());

    assert!(db.is_favorite(1, paper.id).await.unwrap());
    let favorites = db.list_favorites(1).await.unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].id, paper.id);

    assert!(db.remove_favorite(1, paper.id).await.unwrap());
    assert!(!db.is_favorite(1, paper.id).await.unwrap());
    assert!(!db.remove_favorite(1, paper.id).await.unwrap());
  }

  #[traced_test]
  #[tokio::test]
  async fn test_favorite_requires_existing_paper() {
    let (db, _path, _dir) = setup_test_db().await;
    assert!(db.add_favorite(1, 424242).await.unwrap().is_none());
  }

  #[traced_test]
  #[tokio::test]
  async fn test_deleting_paper_cascades_favorites() {
    let (db, _path, _dir) = setup_test_db().await;
    let paper = db.insert_paper(&sample_raw(14), &Translation::default()).await.unwrap().unwrap();
    db.add_favorite(1, paper.id).await.unwrap().unwrap();

    assert!(db.delete_paper(paper.id).await.unwrap());
    assert!(!db.is_favorite(1, paper.id).await.unwrap());
  }
}
