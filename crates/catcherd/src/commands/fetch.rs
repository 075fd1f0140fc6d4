//! The ingestion run: fetch, dedup, translate, store.

use catcher::{
  feed::FeedClient,
  pipeline::DEFAULT_MAX_RESULTS,
  translator::{Translator, TranslatorConfig},
};

use super::*;

/// Arguments for the fetch command
#[derive(Args, Clone)]
pub struct FetchArgs {
  /// Maximum entries requested per keyword
  #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
  pub max_results: usize,
}

/// Function for the fetch command in the CLI.
pub async fn fetch(db: Database, args: FetchArgs) -> Result<()> {
  let translator = Translator::with_config(TranslatorConfig::from_env());
  let pipeline = IngestionPipeline::new(db, FeedClient::new(), translator)
    .with_max_results(args.max_results);

  let outcome = pipeline.run().await?;
  if outcome.success {
    println!("{} {}", style(SUCCESS_PREFIX).green(), outcome.message);
  } else {
    println!("{} {}", style(WARNING_PREFIX).yellow(), outcome.message);
  }
  Ok(())
}
