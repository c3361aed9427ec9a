//! Available commands
use clap::Subcommand;
use hadisatlas::preferences::Theme;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
  /// List top-level categories
  #[command(visible_alias = "r")]
  Roots,

  /// List every category, or the children of one
  #[command(visible_alias = "c")]
  Categories {
    /// Only show direct children of this category
    #[arg(long)]
    parent: Option<String>,
  },

  /// Show the whole category tree
  #[command(visible_alias = "t")]
  Tree,

  /// List hadiths in a category
  #[command(visible_alias = "h")]
  Hadeeths {
    #[arg(long)]
    category: String,

    /// Page to show, starting at 1
    #[arg(
      long,
      default_value_t = 1,
      value_parser = clap::value_parser!(u32).range(1..),
      conflicts_with = "all"
    )]
    page: u32,

    /// Load every page
    #[arg(long)]
    all: bool,
  },

  /// Read a single hadith
  #[command(visible_alias = "s")]
  Show { id: String },

  /// Print a hadith as shareable text
  Share { id: String },

  /// Manage favorites
  #[command(visible_alias = "f", subcommand)]
  Favorite(FavoriteCommand),

  /// Show or change reading settings
  #[command(subcommand)]
  Settings(SettingsCommand),

  /// Show or change the content language
  #[command(visible_alias = "lang")]
  Language {
    /// Language code to switch to (tr, en, ar)
    code: Option<String>,
  },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum FavoriteCommand {
  /// List saved favorites
  List,
  /// Add or remove a hadith
  Toggle { id: String },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SettingsCommand {
  Show,
  Set {
    #[arg(long)]
    font_size: Option<u32>,
    #[arg(long)]
    arabic_font_size: Option<u32>,
    #[arg(long)]
    offline_mode: Option<bool>,
    #[arg(long)]
    theme: Option<Theme>,
  },
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::Parser;

  #[derive(Parser, Debug)]
  struct Cli {
    #[command(subcommand)]
    command: Command,
  }

  fn parse(args: &[&str]) -> Result<Command, clap::Error> {
    let argv = std::iter::once("hadisatlas").chain(args.iter().copied());
    Cli::try_parse_from(argv).map(|cli| cli.command)
  }

  #[test]
  fn test_alias_matches_command() {
    assert_eq!(parse(&["r"]).unwrap(), Command::Roots);
    assert_eq!(parse(&["roots"]).unwrap(), Command::Roots);
    assert_eq!(
      parse(&["lang", "ar"]).unwrap(),
      Command::Language {
        code: Some("ar".into())
      }
    );
  }

  #[test]
  fn test_hadeeths_defaults_to_first_page() {
    assert_eq!(
      parse(&["hadeeths", "--category", "3"]).unwrap(),
      Command::Hadeeths {
        category: "3".into(),
        page: 1,
        all: false,
      }
    );
  }

  #[test]
  fn test_page_conflicts_with_all() {
    assert!(parse(&["hadeeths", "--category", "3", "--page", "2", "--all"]).is_err());
  }

  #[test]
  fn test_page_zero_rejected() {
    assert!(parse(&["hadeeths", "--category", "3", "--page", "0"]).is_err());
    assert_eq!(
      parse(&["hadeeths", "--category", "3", "--page", "2"]).unwrap(),
      Command::Hadeeths {
        category: "3".into(),
        page: 2,
        all: false,
      }
    );
  }

  #[test]
  fn test_settings_set_parses_values() {
    let cmd = parse(&[
      "settings",
      "set",
      "--font-size",
      "18",
      "--offline-mode",
      "true",
      "--theme",
      "dark",
    ])
    .unwrap();
    assert_eq!(
      cmd,
      Command::Settings(SettingsCommand::Set {
        font_size: Some(18),
        arabic_font_size: None,
        offline_mode: Some(true),
        theme: Some(Theme::Dark),
      })
    );
  }

  #[test]
  fn test_favorite_toggle() {
    assert_eq!(
      parse(&["favorite", "toggle", "55"]).unwrap(),
      Command::Favorite(FavoriteCommand::Toggle { id: "55".into() })
    );
  }
}
