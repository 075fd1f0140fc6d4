//! Keyword management: the registry that drives ingestion runs.

use dialoguer::Confirm;

use super::*;

/// Keyword operations
#[derive(Subcommand, Clone)]
pub enum KeywordCommands {
  /// Register a new keyword; it participates in fetches immediately
  Add {
    /// The search term sent to the feed
    text: String,
  },
  /// List all registered keywords
  List,
  /// Flip a keyword's active flag
  Toggle {
    /// Database id of the keyword
    id: i64,
  },
  /// Remove a keyword
  Remove {
    /// Database id of the keyword
    id: i64,
  },
}

/// Function for the keyword subcommands in the CLI.
pub async fn keyword(cli: &Cli, db: Database, cmd: KeywordCommands) -> Result<()> {
  match cmd {
    KeywordCommands::Add { text } => match db.add_keyword(&text).await? {
      Some(keyword) => {
        println!(
          "{} Registered keyword {} (#{})",
          style(SUCCESS_PREFIX).green(),
          style(&keyword.text).cyan(),
          keyword.id
        );
      },
      None => {
        println!(
          "{} Keyword {} is already registered",
          style(WARNING_PREFIX).yellow(),
          style(text.trim()).cyan()
        );
      },
    },

    KeywordCommands::List => {
      let keywords = db.list_keywords().await?;
      if keywords.is_empty() {
        println!("{} No keywords registered", style(INFO_PREFIX).cyan());
        return Ok(());
      }
      for keyword in keywords {
        let state = if keyword.is_active {
          style("active").green()
        } else {
          style("inactive").dim()
        };
        println!("{:>5}  {}  [{}]", style(keyword.id).dim(), style(&keyword.text).cyan(), state);
      }
    },

    KeywordCommands::Toggle { id } => match db.toggle_keyword(id).await? {
      Some(keyword) => {
        let state = if keyword.is_active { "active" } else { "inactive" };
        println!(
          "{} Keyword {} is now {}",
          style(SUCCESS_PREFIX).green(),
          style(&keyword.text).cyan(),
          state
        );
      },
      None => println!("{} No keyword with id {id}", style(ERROR_PREFIX).red()),
    },

    KeywordCommands::Remove { id } => {
      if !cli.accept_defaults
        && !Confirm::new().with_prompt(format!("Remove keyword {id}?")).default(false).interact()?
      {
        println!("{} Keeping keyword {id}", style(INFO_PREFIX).cyan());
        return Ok(());
      }

      if db.delete_keyword(id).await? {
        println!("{} Removed keyword {id}", style(SUCCESS_PREFIX).green());
      } else {
        println!("{} No keyword with id {id}", style(ERROR_PREFIX).red());
      }
    },
  }

  Ok(())
}
