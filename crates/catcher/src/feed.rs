//! Client for fetching paper metadata from the arXiv Atom feed.
//!
//! This module queries arXiv's public API (`https://export.arxiv.org/api/query`)
//! for the newest submissions matching a keyword, and parses the Atom
//! response into [`RawPaper`] values with a streaming XML reader.
//!
//! The fetch path is built to survive a flaky upstream: each attempt runs
//! under a hard timeout, and timeouts, rate limiting, service unavailability,
//! and non-XML bodies are all retried with capped exponential backoff. When
//! every attempt has failed the client returns an empty list — a fetch never
//! raises to its caller.
//!
//! # Examples
//!
//! ```no_run
//! use catcher::{feed::{FeedClient, FetchPapers}, paper::RawPaper};
//!
//! # async fn example() {
//! let client = FeedClient::new();
//! let papers: Vec<RawPaper> = client.fetch("machine learning", 10).await;
//! for paper in &papers {
//!   println!("{}: {}", paper.source_id, paper.title);
//! }
//! # }
//! ```

use std::future::Future;

use quick_xml::{events::Event, Reader};
use reqwest::StatusCode;

use super::*;
use crate::paper::RawPaper;

lazy_static! {
  /// Trailing version marker on feed identifiers, e.g. "2401.00001v2"
  static ref VERSION_SUFFIX: Regex = Regex::new(r"v\d+$").unwrap();
  /// Any run of whitespace, including newlines inside wrapped titles
  static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Network and retry parameters for the feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
  /// Query endpoint of the feed API
  pub base_url:     Url,
  /// Hard budget for a single attempt, enforced by cancellation
  pub timeout:      Duration,
  /// Total number of attempts before giving up
  pub max_retries:  u32,
  /// Backoff before the second attempt; doubles per attempt thereafter
  pub backoff_base: Duration,
  /// Upper bound on any single backoff sleep
  pub backoff_cap:  Duration,
  /// Identification sent with every request
  pub user_agent:   String,
}

impl Default for FeedConfig {
  fn default() -> Self {
    Self {
      base_url:     Url::parse("https://export.arxiv.org/api/query").expect("static URL parses"),
      timeout:      Duration::from_secs(15),
      max_retries:  3,
      backoff_base: Duration::from_millis(1000),
      backoff_cap:  Duration::from_millis(10000),
      user_agent:   "catcher/0.1 (academic research tool)".to_string(),
    }
  }
}

/// Seam between the ingestion pipeline and the paper feed.
///
/// Implementations must be infallible: exhausted retries or an unreachable
/// upstream degrade to an empty list.
#[async_trait]
pub trait FetchPapers: Send + Sync {
  /// Fetches up to `max_results` papers for `keyword`, newest first.
  async fn fetch(&self, keyword: &str, max_results: usize) -> Vec<RawPaper>;
}

/// Client for the arXiv Atom feed API.
pub struct FeedClient {
  /// Internal web client reused across requests
  client: reqwest::Client,
  /// Network and retry parameters
  config: FeedConfig,
}

impl FeedClient {
  /// Creates a client with the default endpoint and retry parameters.
  pub fn new() -> Self { Self::with_config(FeedConfig::default()) }

  /// Creates a client with explicit parameters.
  pub fn with_config(config: FeedConfig) -> Self {
    Self { client: reqwest::Client::new(), config }
  }

  /// Builds the query URL for `keyword`, newest submissions first.
  fn query_url(&self, keyword: &str, max_results: usize) -> Url {
    let mut url = self.config.base_url.clone();
    url
      .query_pairs_mut()
      .append_pair("search_query", &format!("all:{keyword}"))
      .append_pair("start", "0")
      .append_pair("max_results", &max_results.to_string())
      .append_pair("sortBy", "submittedDate")
      .append_pair("sortOrder", "descending");
    url
  }

  /// Runs one fetch attempt under the configured timeout and validates the
  /// response enough to decide whether parsing is worth trying.
  async fn attempt(&self, url: &Url) -> core::result::Result<String, AttemptError> {
    let request =
      self.client.get(url.clone()).header(reqwest::header::USER_AGENT, &self.config.user_agent);

    let response = match tokio::time::timeout(self.config.timeout, request.send()).await {
      Ok(sent) => sent.map_err(AttemptError::Request)?,
      Err(_) => return Err(AttemptError::Timeout),
    };

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE {
      return Err(AttemptError::Unavailable(status));
    }
    if !status.is_success() {
      return Err(AttemptError::Status(status));
    }

    let body = response.text().await.map_err(AttemptError::Request)?;
    if !body.contains("<?xml") && !body.contains("<feed") {
      return Err(AttemptError::NotXml);
    }
    Ok(body)
  }
}

impl Default for FeedClient {
  fn default() -> Self { Self::new() }
}

#[async_trait]
impl FetchPapers for FeedClient {
  async fn fetch(&self, keyword: &str, max_results: usize) -> Vec<RawPaper> {
    let url = self.query_url(keyword, max_results);
    debug!("Fetching from arXiv via: {url}");

    let Some(body) = fetch_with_retry(&self.config, keyword, || self.attempt(&url)).await else {
      warn!("Giving up on {keyword:?} after {} attempts", self.config.max_retries);
      return Vec::new();
    };

    let papers = parse_feed(&body, keyword);
    debug!("Fetched {} papers for {keyword:?}", papers.len());
    papers
  }
}

/// Reasons a single fetch attempt can fail. Every one of these is retried.
#[derive(Debug)]
enum AttemptError {
  /// The attempt's time budget elapsed
  Timeout,
  /// Upstream asked us to back off (429) or is down (503)
  Unavailable(StatusCode),
  /// Any other non-success HTTP status
  Status(StatusCode),
  /// The body is not an XML document
  NotXml,
  /// The transport failed outright
  Request(reqwest::Error),
}

impl std::fmt::Display for AttemptError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      AttemptError::Timeout => write!(f, "request timed out"),
      AttemptError::Unavailable(status) => write!(f, "upstream unavailable ({status})"),
      AttemptError::Status(status) => write!(f, "unexpected status {status}"),
      AttemptError::NotXml => write!(f, "response body is not XML"),
      AttemptError::Request(e) => write!(f, "request failed: {e}"),
    }
  }
}

/// Runs `attempt` up to `config.max_retries` times with capped exponential
/// backoff between attempts, returning the first successful body or `None`
/// once every attempt has failed.
async fn fetch_with_retry<F, Fut>(
  config: &FeedConfig,
  keyword: &str,
  mut attempt: F,
) -> Option<String>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = core::result::Result<String, AttemptError>>,
{
  for n in 1..=config.max_retries {
    debug!("Fetching papers for {keyword:?} (attempt {n}/{})", config.max_retries);
    match attempt().await {
      Ok(body) => return Some(body),
      Err(e) => {
        warn!("Attempt {n}/{} for {keyword:?} failed: {e}", config.max_retries);
        if n < config.max_retries {
          tokio::time::sleep(backoff_delay(config, n)).await;
        }
      },
    }
  }
  None
}

/// Backoff before the attempt after `attempt`: `min(base * 2^(attempt-1), cap)`.
fn backoff_delay(config: &FeedConfig, attempt: u32) -> Duration {
  config.backoff_base.saturating_mul(2u32.saturating_pow(attempt - 1)).min(config.backoff_cap)
}

/// Accumulates one `<entry>` block's fields as the reader walks it.
#[derive(Debug, Default)]
struct EntryBuilder {
  /// Raw text of the entry's `<id>` element
  id_url:        String,
  /// Raw title text, possibly split across text events
  title:         String,
  /// Raw `<summary>` text
  abstract_text: String,
  /// Raw `<published>` timestamp text
  published:     String,
  /// One string per `<author><name>` element, in document order
  authors:       Vec<String>,
  /// `term` attribute of `<arxiv:primary_category>`, when present
  category:      Option<String>,
}

impl EntryBuilder {
  /// Routes a text event to the field owned by the element at `path`.
  fn record(&mut self, path: &[String], text: &str) {
    if text.is_empty() {
      return;
    }
    let Some(pos) = path.iter().rposition(|segment| segment == "entry") else { return };
    match path[pos + 1..].join("/").as_str() {
      "id" => append(&mut self.id_url, text),
      "title" => append(&mut self.title, text),
      "summary" => append(&mut self.abstract_text, text),
      "published" => append(&mut self.published, text),
      "author/name" =>
        if let Some(author) = self.authors.last_mut() {
          append(author, text);
        },
      _ => (),
    }
  }

  /// Finishes the entry, or drops it when no source identifier can be
  /// derived from its `<id>` URL.
  fn build(self, keyword: &str) -> Option<RawPaper> {
    let source_id = derive_source_id(self.id_url.trim());
    if source_id.is_empty() {
      return None;
    }

    let source_url = self.id_url.trim().replacen("http://", "https://", 1);
    // The PDF link is versionless; arXiv serves the latest revision there.
    let pdf_url =
      format!("{}.pdf", VERSION_SUFFIX.replace(&source_url.replace("/abs/", "/pdf/"), ""));

    let authors = self
      .authors
      .iter()
      .map(|author| collapse_whitespace(author))
      .filter(|author| !author.is_empty())
      .collect::<Vec<_>>()
      .join(", ");

    Some(RawPaper {
      source_id,
      title: collapse_whitespace(&self.title),
      authors,
      abstract_text: collapse_whitespace(&self.abstract_text),
      category: self.category.unwrap_or_else(|| "arXiv".to_string()),
      published_at: DateTime::parse_from_rfc3339(self.published.trim())
        .ok()
        .map(|dt| dt.timestamp_millis()),
      source_url,
      pdf_url,
      origin_keyword: keyword.to_string(),
    })
  }
}

/// Parses an Atom feed body into one [`RawPaper`] per well-formed entry.
fn parse_feed(xml: &str, keyword: &str) -> Vec<RawPaper> {
  let mut reader = Reader::from_reader(xml.as_bytes());
  let mut papers = Vec::new();
  let mut entry: Option<EntryBuilder> = None;
  let mut path_stack: Vec<String> = Vec::new();
  let mut buf = Vec::new();

  while let Ok(event) = reader.read_event_into(&mut buf) {
    match event {
      Event::Start(e) => {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        match name.as_str() {
          "entry" => entry = Some(EntryBuilder::default()),
          "name" =>
            if path_stack.last().map(String::as_str) == Some("author") {
              if let Some(entry) = entry.as_mut() {
                entry.authors.push(String::new());
              }
            },
          "arxiv:primary_category" =>
            if let Some(entry) = entry.as_mut() {
              entry.category = attribute_value(&e, "term");
            },
          _ => (),
        }
        path_stack.push(name);
      },
      Event::Empty(e) =>
        if e.name().as_ref() == b"arxiv:primary_category" {
          if let Some(entry) = entry.as_mut() {
            entry.category = attribute_value(&e, "term");
          }
        },
      Event::Text(e) =>
        if let (Some(entry), Ok(text)) = (entry.as_mut(), e.unescape()) {
          entry.record(&path_stack, text.trim());
        },
      Event::End(e) => {
        path_stack.pop();
        if e.name().as_ref() == b"entry" {
          if let Some(paper) = entry.take().and_then(|builder| builder.build(keyword)) {
            papers.push(paper);
          }
        }
      },
      Event::Eof => break,
      _ => (),
    }
    buf.clear();
  }

  papers
}

/// Reads one attribute's unescaped value off a start tag.
fn attribute_value(e: &quick_xml::events::BytesStart<'_>, name: &str) -> Option<String> {
  e.try_get_attribute(name)
    .ok()
    .flatten()
    .and_then(|attr| attr.unescape_value().ok())
    .map(|value| value.into_owned())
}

/// Derives the stable source identifier from an entry's `<id>` URL: the text
/// after `/abs/` (or the last path segment), with a trailing `v<digits>`
/// version suffix stripped. Empty when the URL has no usable tail.
fn derive_source_id(id_url: &str) -> String {
  let tail = id_url
    .split_once("/abs/")
    .map(|(_, tail)| tail)
    .or_else(|| id_url.rsplit('/').next())
    .unwrap_or("");
  VERSION_SUFFIX.replace(tail, "").into_owned()
}

/// Collapses runs of whitespace to single spaces and trims the ends.
fn collapse_whitespace(text: &str) -> String {
  WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Appends a text fragment to a field, space-separating fragments that the
/// reader delivered as separate events.
fn append(field: &mut String, text: &str) {
  if !field.is_empty() {
    field.push(' ');
  }
  field.push_str(text);
}
