//! Stored-paper operations: listing, related lookup, deletion, retranslation.

use catcher::{
  feed::FeedClient,
  related::find_related,
  translator::{Translator, TranslatorConfig},
};
use dialoguer::Confirm;

use super::*;

/// Paper operations
#[derive(Subcommand, Clone)]
pub enum PaperCommands {
  /// List stored papers
  List {
    /// Ordering of the listing
    #[arg(long, value_enum, default_value_t = ListSort::CreatedAt)]
    sort: ListSort,
  },
  /// Show papers related to a reference paper
  Related {
    /// Database id of the reference paper
    id:    i64,
    /// Maximum number of related papers to show
    #[arg(long)]
    limit: Option<usize>,
  },
  /// List the categories present in the catalog
  Categories,
  /// Delete a paper
  Delete {
    /// Database id of the paper
    id: i64,
  },
}

/// Storage-level orderings exposed on the command line
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ListSort {
  /// Newest records first
  #[default]
  CreatedAt,
  /// Most recently published first
  PublishedAt,
  /// Category ascending
  Category,
}

impl From<ListSort> for PaperOrder {
  fn from(arg: ListSort) -> Self {
    match arg {
      ListSort::CreatedAt => PaperOrder::CreatedAt,
      ListSort::PublishedAt => PaperOrder::PublishedAt,
      ListSort::Category => PaperOrder::Category,
    }
  }
}

/// Function for the papers subcommands in the CLI.
pub async fn papers(cli: &Cli, db: Database, cmd: PaperCommands) -> Result<()> {
  match cmd {
    PaperCommands::List { sort } => {
      let papers = db.list_papers(sort.into()).await?;
      if papers.is_empty() {
        println!("{} No papers stored", style(INFO_PREFIX).cyan());
        return Ok(());
      }
      println!("{} {} papers", style(INFO_PREFIX).cyan(), papers.len());
      for paper in &papers {
        print_paper_line(paper);
      }
    },

    PaperCommands::Related { id, limit } => {
      let related = find_related(&db, id, limit).await?;
      if related.is_empty() {
        println!("{} No related papers found", style(INFO_PREFIX).cyan());
        return Ok(());
      }
      for paper in &related {
        print_paper_line(paper);
      }
    },

    PaperCommands::Categories => {
      let categories = db.categories().await?;
      if categories.is_empty() {
        println!("{} No categories yet", style(INFO_PREFIX).cyan());
        return Ok(());
      }
      for category in categories {
        println!("{}", style(category).yellow());
      }
    },

    PaperCommands::Delete { id } => {
      if !cli.accept_defaults
        && !Confirm::new().with_prompt(format!("Delete paper {id}?")).default(false).interact()?
      {
        println!("{} Keeping paper {id}", style(INFO_PREFIX).cyan());
        return Ok(());
      }

      if db.delete_paper(id).await? {
        println!("{} Deleted paper {id}", style(SUCCESS_PREFIX).green());
      } else {
        println!("{} No paper with id {id}", style(ERROR_PREFIX).red());
      }
    },
  }

  Ok(())
}

/// Function for the retranslate command in the CLI.
pub async fn retranslate(db: Database, id: i64) -> Result<()> {
  let pipeline = translation_pipeline(db);
  let outcome = pipeline.retranslate(id).await?;
  if outcome.success {
    println!("{} {}", style(SUCCESS_PREFIX).green(), outcome.message);
  } else {
    println!("{} {}", style(ERROR_PREFIX).red(), outcome.message);
  }
  Ok(())
}

/// Function for the retranslate-all command in the CLI.
pub async fn retranslate_all(db: Database) -> Result<()> {
  let pipeline = translation_pipeline(db);
  let outcome = pipeline.retranslate_all().await?;
  println!("{} {}", style(SUCCESS_PREFIX).green(), outcome.message);
  Ok(())
}

/// A pipeline wired for translation work only; the feed client is idle.
fn translation_pipeline(db: Database) -> IngestionPipeline<FeedClient, Translator> {
  let translator = Translator::with_config(TranslatorConfig::from_env());
  IngestionPipeline::new(db, FeedClient::new(), translator)
}
