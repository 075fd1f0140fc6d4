//! Per-user favorites over stored papers.

use super::*;

/// Favorite operations
#[derive(Subcommand, Clone)]
pub enum FavoriteCommands {
  /// Bookmark a paper
  Add {
    /// Database id of the paper
    paper_id: i64,
    /// The user the bookmark belongs to
    #[arg(long, default_value_t = 1)]
    user:     i64,
  },
  /// Remove a bookmark
  Remove {
    /// Database id of the paper
    paper_id: i64,
    /// The user the bookmark belongs to
    #[arg(long, default_value_t = 1)]
    user:     i64,
  },
  /// List a user's bookmarked papers
  List {
    /// The user whose bookmarks to list
    #[arg(long, default_value_t = 1)]
    user: i64,
  },
  /// Check whether a paper is bookmarked
  Check {
    /// Database id of the paper
    paper_id: i64,
    /// The user the bookmark belongs to
    #[arg(long, default_value_t = 1)]
    user:     i64,
  },
}

/// Function for the favorite subcommands in the CLI.
pub async fn favorite(db: Database, cmd: FavoriteCommands) -> Result<()> {
  match cmd {
    FavoriteCommands::Add { paper_id, user } =>
      if db.add_favorite(user, paper_id).await?.is_some() {
        println!("{} Bookmarked paper {paper_id}", style(SUCCESS_PREFIX).green());
      } else {
        println!(
          "{} Paper {paper_id} is already bookmarked (or does not exist)",
          style(WARNING_PREFIX).yellow()
        );
      },

    FavoriteCommands::Remove { paper_id, user } =>
      if db.remove_favorite(user, paper_id).await? {
        println!("{} Removed bookmark on paper {paper_id}", style(SUCCESS_PREFIX).green());
      } else {
        println!("{} Paper {paper_id} was not bookmarked", style(WARNING_PREFIX).yellow());
      },

    FavoriteCommands::List { user } => {
      let favorites = db.list_favorites(user).await?;
      if favorites.is_empty() {
        println!("{} No favorites yet", style(INFO_PREFIX).cyan());
        return Ok(());
      }
      for paper in &favorites {
        print_paper_line(paper);
      }
    },

    FavoriteCommands::Check { paper_id, user } =>
      if db.is_favorite(user, paper_id).await? {
        println!("{} Paper {paper_id} is bookmarked", style(SUCCESS_PREFIX).green());
      } else {
        println!("{} Paper {paper_id} is not bookmarked", style(INFO_PREFIX).cyan());
      },
  }

  Ok(())
}
