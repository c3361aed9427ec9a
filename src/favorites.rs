//! Favorites list and the saved-hadith map.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::KeyValueStore;
use crate::error::StoreError;
use crate::hadeeth::types::{Hadith, Language};

const FAVORITES_KEY: &str = "favorites";

/// Full hadith records the user marked, deduplicated by id.
pub struct Favorites<S: KeyValueStore> {
  storage: Arc<S>,
  saved: SavedHadiths<S>,
}

impl<S: KeyValueStore> Favorites<S> {
  pub fn new(storage: Arc<S>) -> Self {
    Self {
      saved: SavedHadiths::new(Arc::clone(&storage)),
      storage,
    }
  }

  fn load(&self) -> Result<Vec<Hadith>, StoreError> {
    Ok(
      self
        .storage
        .get_json::<Vec<Hadith>>(FAVORITES_KEY)?
        .unwrap_or_default(),
    )
  }

  /// All favorites in insertion order. Duplicates are dropped and the
  /// cleaned list written back.
  pub fn list(&self) -> Result<Vec<Hadith>, StoreError> {
    let stored = self.load()?;
    let total = stored.len();

    let mut seen = HashSet::new();
    let unique: Vec<Hadith> = stored
      .into_iter()
      .filter(|h| seen.insert(h.id.clone()))
      .collect();

    if unique.len() != total {
      debug!(removed = total - unique.len(), "Removing duplicate favorites");
      self.storage.set_json(FAVORITES_KEY, &unique)?;
    }

    Ok(unique)
  }

  pub fn contains(&self, id: &str) -> Result<bool, StoreError> {
    Ok(self.load()?.iter().any(|h| h.id == id))
  }

  /// Add or remove `hadith`; returns whether it is a favorite afterwards.
  ///
  /// The hadith is also kept in the saved map for `language` so it can be
  /// opened without a network round trip.
  pub fn toggle(&self, language: Language, hadith: &Hadith) -> Result<bool, StoreError> {
    let mut favorites = self.load()?;
    let was_favorite = favorites.iter().any(|h| h.id == hadith.id);

    if was_favorite {
      favorites.retain(|h| h.id != hadith.id);
    } else {
      favorites.push(hadith.clone());
    }
    self.storage.set_json(FAVORITES_KEY, &favorites)?;

    if let Err(e) = self.saved.put(language, hadith) {
      warn!(error = %e, id = %hadith.id, "Failed to save favorited hadith");
    }

    Ok(!was_favorite)
  }
}

/// Per-language map of hadith id to full record, kept for opened and
/// favorited hadiths. Checked before the network when opening a hadith.
pub struct SavedHadiths<S: KeyValueStore> {
  storage: Arc<S>,
}

impl<S: KeyValueStore> SavedHadiths<S> {
  pub fn new(storage: Arc<S>) -> Self {
    Self { storage }
  }

  fn key(language: Language) -> String {
    format!("cached_hadiths_{}", language.code())
  }

  fn load(&self, language: Language) -> Result<HashMap<String, Hadith>, StoreError> {
    Ok(
      self
        .storage
        .get_json(&Self::key(language))?
        .unwrap_or_default(),
    )
  }

  pub fn get(&self, language: Language, id: &str) -> Result<Option<Hadith>, StoreError> {
    Ok(self.load(language)?.remove(id))
  }

  pub fn put(&self, language: Language, hadith: &Hadith) -> Result<(), StoreError> {
    let mut saved = self.load(language)?;
    saved.insert(hadith.id.clone(), hadith.clone());
    self.storage.set_json(&Self::key(language), &saved)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::SqliteStorage;

  fn hadith(id: &str) -> Hadith {
    serde_json::from_value(serde_json::json!({
      "id": id,
      "title": format!("Hadith {}", id),
      "hadeeth": "text",
    }))
    .unwrap()
  }

  fn favorites() -> (Arc<SqliteStorage>, Favorites<SqliteStorage>) {
    let storage = Arc::new(SqliteStorage::in_memory().unwrap());
    (Arc::clone(&storage), Favorites::new(storage))
  }

  #[test]
  fn test_toggle_adds_then_removes() {
    let (_, favs) = favorites();
    let h = hadith("55");

    assert!(favs.toggle(Language::En, &h).unwrap());
    assert!(favs.contains("55").unwrap());

    assert!(!favs.toggle(Language::En, &h).unwrap());
    assert!(!favs.contains("55").unwrap());
    assert!(favs.list().unwrap().is_empty());
  }

  #[test]
  fn test_list_removes_duplicates_and_persists() {
    let (storage, favs) = favorites();
    let stored = vec![hadith("1"), hadith("2"), hadith("1")];
    storage.set_json(FAVORITES_KEY, &stored).unwrap();

    let ids: Vec<String> = favs.list().unwrap().into_iter().map(|h| h.id).collect();
    assert_eq!(ids, vec!["1", "2"]);

    let persisted: Vec<Hadith> = storage.get_json(FAVORITES_KEY).unwrap().unwrap();
    assert_eq!(persisted.len(), 2);
  }

  #[test]
  fn test_toggle_saves_hadith_for_language() {
    let (storage, favs) = favorites();
    favs.toggle(Language::Tr, &hadith("7")).unwrap();

    let saved = SavedHadiths::new(storage);
    assert_eq!(saved.get(Language::Tr, "7").unwrap(), Some(hadith("7")));
    assert_eq!(saved.get(Language::En, "7").unwrap(), None);
  }

  #[test]
  fn test_saved_map_overwrites_by_id() {
    let storage = Arc::new(SqliteStorage::in_memory().unwrap());
    let saved = SavedHadiths::new(storage);

    let mut h = hadith("3");
    saved.put(Language::Ar, &h).unwrap();
    h.title = "Updated".into();
    saved.put(Language::Ar, &h).unwrap();

    assert_eq!(saved.get(Language::Ar, "3").unwrap().unwrap().title, "Updated");
  }
}
