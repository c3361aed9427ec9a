use crate::commands::{Command, FavoriteCommand, SettingsCommand};
use color_eyre::Result;
use hadisatlas::cache::SqliteStorage;
use hadisatlas::config::Config;
use hadisatlas::connectivity::{Oracle, StaticConnectivity, TcpProbe};
use hadisatlas::display::{share_text, truncate_title, LocalizedHadith};
use hadisatlas::favorites::Favorites;
use hadisatlas::hadeeth::types::subcategories_of;
use hadisatlas::hadeeth::{
  CachedHadeethClient, Category, Hadith, HadeethClient, HadeethPager, HadithListItem, Language,
};
use hadisatlas::preferences::{Preferences, Settings, SettingsUpdate, Theme};
use std::collections::HashSet;
use std::fmt::Write as _;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};

type Client = CachedHadeethClient<HadeethClient, SqliteStorage, Oracle>;

/// Main application state
pub struct App {
  /// Application configuration
  config: Config,

  /// Content language for this run
  language: Language,

  client: Client,
  preferences: Preferences<SqliteStorage>,
  favorites: Favorites<SqliteStorage>,
}

impl App {
  /// `language` overrides the stored preference for this run only;
  /// `offline` skips the reachability probe and reports no connection.
  pub fn new(config: Config, language: Option<Language>, offline: bool) -> Result<Self> {
    let storage = Arc::new(match &config.storage.path {
      Some(path) => SqliteStorage::open(path)?,
      None => SqliteStorage::open_default()?,
    });

    let base_url = config.api_base_url()?;
    let oracle = if offline {
      Oracle::Static(StaticConnectivity(false))
    } else {
      match TcpProbe::for_url(&base_url) {
        Some(probe) => Oracle::Probe(probe),
        None => Oracle::Static(StaticConnectivity(true)),
      }
    };

    let api = HadeethClient::new(&config)?;
    let client = CachedHadeethClient::new(api, Arc::clone(&storage), Arc::new(oracle));
    let preferences = Preferences::new(Arc::clone(&storage));
    let favorites = Favorites::new(storage);

    let language = language.unwrap_or_else(|| preferences.language());
    debug!(%language, base_url = %base_url, "App initialized");

    Ok(Self {
      config,
      language,
      client,
      preferences,
      favorites,
    })
  }

  pub async fn run(&self, command: Command, out: &mut impl Write) -> Result<()> {
    info!(?command, language = %self.language, "Running command");

    let text = match command {
      Command::Roots => {
        let roots = self.client.root_categories(self.language).await?;
        format_categories(&roots)
      }
      Command::Categories { parent: None } => {
        let all = self.client.all_categories(self.language).await?;
        format_categories(&all)
      }
      Command::Categories {
        parent: Some(parent),
      } => {
        let children = self.client.subcategories(self.language, &parent).await?;
        format_categories(&children)
      }
      Command::Tree => {
        let (roots, all) = futures::try_join!(
          self.client.root_categories(self.language),
          self.client.all_categories(self.language)
        )?;
        format_tree(&roots, &all)
      }
      Command::Hadeeths {
        category,
        page,
        all,
      } => {
        if all {
          let mut pager = HadeethPager::new(self.language, category, self.config.per_page);
          let items = pager.load_all(&self.client).await?;
          format_list(items)
        } else {
          let items = self
            .client
            .hadeeths_page(self.language, &category, page, self.config.per_page)
            .await?;
          format_list(&items)
        }
      }
      Command::Show { id } => {
        let hadith = self.client.open_hadeeth(self.language, &id).await?;
        let favorite = self.favorites.contains(&hadith.id)?;
        format_hadith(&hadith, self.language, favorite)
      }
      Command::Share { id } => {
        let hadith = self.client.open_hadeeth(self.language, &id).await?;
        format!("{}\n", share_text(&hadith))
      }
      Command::Favorite(FavoriteCommand::List) => {
        let favorites = self.favorites.list()?;
        format_favorites(&favorites)
      }
      Command::Favorite(FavoriteCommand::Toggle { id }) => {
        let hadith = self.client.open_hadeeth(self.language, &id).await?;
        let added = self.favorites.toggle(self.language, &hadith)?;
        let verb = if added { "Added to" } else { "Removed from" };
        format!("{} favorites: {}\n", verb, truncate_title(&hadith.title))
      }
      Command::Settings(SettingsCommand::Show) => {
        format_settings(&self.preferences.settings(), self.preferences.theme())
      }
      Command::Settings(SettingsCommand::Set {
        font_size,
        arabic_font_size,
        offline_mode,
        theme,
      }) => {
        if let Some(theme) = theme {
          self.preferences.set_theme(theme)?;
        }
        let update = SettingsUpdate {
          font_size,
          arabic_font_size,
          offline_mode,
        };
        let settings = if update.is_empty() {
          self.preferences.settings()
        } else {
          self.preferences.update_settings(update)?
        };
        format_settings(&settings, self.preferences.theme())
      }
      Command::Language { code: None } => format_languages(self.preferences.language()),
      Command::Language { code: Some(code) } => {
        let language: Language = code.parse()?;
        self.preferences.set_language(language)?;
        format!("Language set to {}\n", language.native_name())
      }
    };

    out.write_all(text.as_bytes())?;
    Ok(())
  }
}

fn format_categories(categories: &[Category]) -> String {
  if categories.is_empty() {
    return "No categories\n".to_string();
  }
  let mut out = String::new();
  for c in categories {
    let _ = writeln!(out, "{:>6}  {} ({})", c.id, c.title, c.hadeeths_count);
  }
  out
}

/// Roots with their descendants indented below them.
fn format_tree(roots: &[Category], all: &[Category]) -> String {
  fn walk(
    out: &mut String,
    node: &Category,
    all: &[Category],
    depth: usize,
    seen: &mut HashSet<String>,
  ) {
    if !seen.insert(node.id.clone()) {
      return;
    }
    let _ = writeln!(
      out,
      "{}{} {} ({})",
      "  ".repeat(depth),
      node.id,
      node.title,
      node.hadeeths_count
    );
    for child in subcategories_of(all, &node.id) {
      walk(out, child, all, depth + 1, seen);
    }
  }

  let mut out = String::new();
  let mut seen = HashSet::new();
  for root in roots {
    walk(&mut out, root, all, 0, &mut seen);
  }
  out
}

fn format_list(items: &[HadithListItem]) -> String {
  if items.is_empty() {
    return "No hadiths\n".to_string();
  }
  let mut out = String::new();
  for item in items {
    let _ = writeln!(out, "{:>6}  {}", item.id, truncate_title(&item.title));
  }
  out
}

fn format_hadith(hadith: &Hadith, language: Language, favorite: bool) -> String {
  let view = LocalizedHadith::new(hadith, language);
  let mut out = String::new();

  let marker = if favorite { " *" } else { "" };
  let _ = writeln!(out, "{}{}\n", view.title, marker);
  let _ = writeln!(out, "{}\n", view.text);
  if !view.attribution.is_empty() || !view.grade.is_empty() {
    let _ = writeln!(out, "{}", view.attribution);
    let _ = writeln!(out, "{}\n", view.grade);
  }
  if !view.explanation.is_empty() {
    let _ = writeln!(out, "{}\n", view.explanation);
  }
  for hint in view.hints {
    let _ = writeln!(out, "- {}", hint);
  }
  out
}

fn format_favorites(favorites: &[Hadith]) -> String {
  if favorites.is_empty() {
    return "No favorites\n".to_string();
  }
  let mut out = String::new();
  for h in favorites {
    let _ = writeln!(out, "{:>6}  {}", h.id, truncate_title(&h.title));
  }
  out
}

fn format_settings(settings: &Settings, theme: Theme) -> String {
  format!(
    "font_size: {}\narabic_font_size: {}\noffline_mode: {}\ntheme: {}\n",
    settings.font_size, settings.arabic_font_size, settings.offline_mode, theme
  )
}

fn format_languages(current: Language) -> String {
  let mut out = String::new();
  for lang in Language::ALL {
    let marker = if *lang == current { "*" } else { " " };
    let _ = writeln!(out, "{} {}  {}", marker, lang.code(), lang.native_name());
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  fn category(id: &str, parent: Option<&str>) -> Category {
    Category {
      id: id.into(),
      title: format!("Category {}", id),
      hadeeths_count: "1".into(),
      parent_id: parent.map(Into::into),
    }
  }

  fn hadith() -> Hadith {
    serde_json::from_value(serde_json::json!({
      "id": "55",
      "title": "Intentions",
      "hadeeth": "Actions are judged by intentions.",
      "hadeeth_ar": "إنما الأعمال بالنيات",
      "attribution": "Agreed upon",
      "grade": "Sahih",
      "explanation": "Every deed depends on its intention.",
      "hints": ["Intention matters"],
    }))
    .unwrap()
  }

  #[test]
  fn test_tree_nests_children() {
    let roots = vec![category("1", None), category("2", None)];
    let all = vec![
      category("1", None),
      category("2", None),
      category("3", Some("1")),
      category("4", Some("3")),
    ];
    assert_eq!(
      format_tree(&roots, &all),
      "1 Category 1 (1)\n  3 Category 3 (1)\n    4 Category 4 (1)\n2 Category 2 (1)\n"
    );
  }

  #[test]
  fn test_tree_survives_parent_cycle() {
    let roots = vec![category("1", Some("2"))];
    let all = vec![category("1", Some("2")), category("2", Some("1"))];
    let tree = format_tree(&roots, &all);
    assert_eq!(tree.lines().count(), 2);
  }

  #[test]
  fn test_list_truncates_titles() {
    let items = vec![HadithListItem {
      id: "7".into(),
      title: "x".repeat(150),
      translations: vec![],
    }];
    let out = format_list(&items);
    assert!(out.trim_end().ends_with("..."));
    assert_eq!(format_list(&[]), "No hadiths\n");
  }

  #[test]
  fn test_hadith_view_uses_language() {
    let h = hadith();
    let en = format_hadith(&h, Language::En, false);
    assert!(en.starts_with("Intentions\n"));
    assert!(en.contains("Actions are judged by intentions."));
    assert!(en.contains("- Intention matters"));

    let ar = format_hadith(&h, Language::Ar, true);
    assert!(ar.starts_with("Intentions *\n"));
    assert!(ar.contains("إنما الأعمال بالنيات"));
  }

  #[test]
  fn test_languages_mark_current() {
    let out = format_languages(Language::En);
    assert!(out.contains("* en"));
    assert!(out.contains("  tr"));
  }

  #[test]
  fn test_settings_layout() {
    let out = format_settings(&Settings::default(), Theme::Dark);
    assert_eq!(
      out,
      "font_size: 16\narabic_font_size: 20\noffline_mode: false\ntheme: dark\n"
    );
  }
}
