//! LLM-backed translation of paper titles and abstracts.
//!
//! The translator sends a chat-completion request to an OpenAI-compatible
//! endpoint (an Ollama host by default) with a strict JSON-schema response
//! format, and parses the first choice's message content into a
//! [`Translation`]. Translation is advisory everywhere it is used: any
//! failure — transport error, missing choices, empty content, content that
//! is not the requested JSON — degrades to an empty [`Translation`] rather
//! than an error.
//!
//! # Examples
//!
//! ```no_run
//! use catcher::translator::{Translate, Translator, TranslatorConfig};
//!
//! # async fn example() -> Result<(), catcher::error::CatcherError> {
//! let translator = Translator::with_config(TranslatorConfig {
//!   language: "German".to_string(),
//!   ..TranslatorConfig::default()
//! });
//!
//! let translation = translator.translate("Attention Is All You Need", "We propose…").await?;
//! if translation.is_empty() {
//!   println!("translation unavailable, storing the paper untranslated");
//! }
//! # Ok(())
//! # }
//! ```

use serde_json::json;

use super::*;

/// Connection and prompt settings for the translator.
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
  /// Base URL of the OpenAI-compatible endpoint
  pub host:     Url,
  /// Model identifier passed through to the endpoint
  pub model:    String,
  /// Optional bearer token for hosted endpoints
  pub api_key:  Option<String>,
  /// Target language for translations
  pub language: String,
}

impl Default for TranslatorConfig {
  fn default() -> Self {
    Self {
      host:     Url::parse("http://localhost:11434").expect("static URL parses"),
      model:    "llama3.2:3b".to_string(),
      api_key:  None,
      language: "Japanese".to_string(),
    }
  }
}

impl TranslatorConfig {
  /// Builds a config from `CATCHER_LLM_HOST`, `CATCHER_LLM_MODEL`,
  /// `CATCHER_LLM_API_KEY`, and `CATCHER_LLM_LANGUAGE`, falling back to the
  /// defaults for anything unset or unparseable.
  pub fn from_env() -> Self {
    let mut config = Self::default();
    if let Some(host) = std::env::var("CATCHER_LLM_HOST").ok().and_then(|h| Url::parse(&h).ok()) {
      config.host = host;
    }
    if let Ok(model) = std::env::var("CATCHER_LLM_MODEL") {
      config.model = model;
    }
    if let Ok(api_key) = std::env::var("CATCHER_LLM_API_KEY") {
      config.api_key = Some(api_key);
    }
    if let Ok(language) = std::env::var("CATCHER_LLM_LANGUAGE") {
      config.language = language;
    }
    config
  }
}

/// A translated title/abstract pair. Both fields are empty when translation
/// failed or has not happened yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Translation {
  /// Translated paper title
  pub title_translated:    String,
  /// Translated paper abstract
  pub abstract_translated: String,
}

impl Translation {
  /// True when neither field carries any translated text.
  pub fn is_empty(&self) -> bool {
    self.title_translated.is_empty() && self.abstract_translated.is_empty()
  }
}

/// Seam between the ingestion pipeline and the language model.
#[async_trait]
pub trait Translate: Send + Sync {
  /// Produces a translated title/abstract pair for a paper. Implementations
  /// should degrade to an empty [`Translation`] for expected failure modes;
  /// an `Err` is treated by callers exactly like an empty result.
  async fn translate(&self, title: &str, abstract_text: &str) -> Result<Translation>;
}

/// Message structure for the chat-completion request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
  /// "system" or "user"
  pub role:    String,
  /// The message text
  pub content: String,
}

/// Chat-completion request body.
#[derive(Serialize)]
struct ChatRequest<'a> {
  /// Model identifier
  model:           &'a str,
  /// System + user messages, in order
  messages:        Vec<Message>,
  /// Strict JSON-schema constraint on the model's output
  response_format: ResponseFormat,
}

/// `response_format` object constraining the model to a JSON schema.
#[derive(Serialize)]
struct ResponseFormat {
  /// Always "json_schema"
  #[serde(rename = "type")]
  kind:        &'static str,
  /// The schema itself
  json_schema: JsonSchema,
}

/// Named, strict schema wrapper.
#[derive(Serialize)]
struct JsonSchema {
  /// Schema name surfaced to the endpoint
  name:   &'static str,
  /// Reject any output not matching the schema
  strict: bool,
  /// The JSON schema body
  schema: serde_json::Value,
}

/// Chat-completion response body; only the content path we read.
#[derive(Debug, Deserialize)]
struct ChatResponse {
  /// Completion choices; the first one carries the answer
  #[serde(default)]
  choices: Vec<Choice>,
}

/// One completion choice.
#[derive(Debug, Deserialize)]
struct Choice {
  /// The assistant message of this choice
  message: ChoiceMessage,
}

/// The assistant message payload.
#[derive(Debug, Deserialize)]
struct ChoiceMessage {
  /// JSON text matching the requested schema
  content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completion endpoint.
pub struct Translator {
  /// Internal web client reused across requests
  client: reqwest::Client,
  /// Connection and prompt settings
  config: TranslatorConfig,
}

impl Translator {
  /// Creates a translator with the default localhost endpoint.
  pub fn new() -> Self { Self::with_config(TranslatorConfig::default()) }

  /// Creates a translator with explicit settings.
  pub fn with_config(config: TranslatorConfig) -> Self {
    Self { client: reqwest::Client::new(), config }
  }

  /// The full chat-completions URL for the configured host.
  fn endpoint(&self) -> Url {
    self.config.host.join("v1/chat/completions").unwrap_or_else(|_| {
      warn!("Failed to join chat endpoint onto host, using host as-is");
      self.config.host.clone()
    })
  }

  /// Builds the request body asking for a strict two-field JSON object.
  fn request_body(&self, title: &str, abstract_text: &str) -> ChatRequest<'_> {
    let language = &self.config.language;
    let system = format!(
      "You are a translator of academic papers. Translate the given English paper title and \
       abstract into accurate, scholarly {language}. Render technical terms appropriately and \
       keep the register of an academic publication. Answer in JSON."
    );
    let user = format!(
      "Translate the following paper title and abstract into {language}.\n\nTitle: \
       {title}\n\nAbstract: {abstract_text}"
    );

    ChatRequest {
      model:           &self.config.model,
      messages:        vec![
        Message { role: "system".to_string(), content: system },
        Message { role: "user".to_string(), content: user },
      ],
      response_format: ResponseFormat {
        kind:        "json_schema",
        json_schema: JsonSchema {
          name:   "translation",
          strict: true,
          schema: json!({
            "type": "object",
            "properties": {
              "title_translated": { "type": "string" },
              "abstract_translated": { "type": "string" }
            },
            "required": ["title_translated", "abstract_translated"],
            "additionalProperties": false
          }),
        },
      },
    }
  }

  /// Sends the request and parses the first choice into a [`Translation`].
  async fn send(&self, body: &ChatRequest<'_>) -> Result<Translation> {
    let mut request = self.client.post(self.endpoint()).json(body);
    if let Some(api_key) = &self.config.api_key {
      request = request.bearer_auth(api_key);
    }

    let response: ChatResponse = request.send().await?.json().await?;
    parse_response(response)
  }
}

impl Default for Translator {
  fn default() -> Self { Self::new() }
}

#[async_trait]
impl Translate for Translator {
  async fn translate(&self, title: &str, abstract_text: &str) -> Result<Translation> {
    debug!("Starting translation for: {:.50}", title);

    let body = self.request_body(title, abstract_text);
    match self.send(&body).await {
      Ok(translation) => Ok(translation),
      Err(e) => {
        warn!("Translation failed: {e}");
        Ok(Translation::default())
      },
    }
  }
}

/// Extracts and parses the first choice's content. Only conforming output is
/// surfaced; anything else is an error for the caller to degrade.
fn parse_response(response: ChatResponse) -> Result<Translation> {
  let content = response
    .choices
    .first()
    .and_then(|choice| choice.message.content.as_deref())
    .unwrap_or("");

  if content.is_empty() {
    return Err(CatcherError::Translator("empty response content".to_string()));
  }

  serde_json::from_str(content)
    .map_err(|e| CatcherError::Translator(format!("unparseable translation JSON: {e}")))
}
