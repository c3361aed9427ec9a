//! User preferences persisted in the key-value store.
//!
//! Nothing here is held in memory between calls: every accessor reads the
//! store, so a change made elsewhere is seen by the next fetch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

use crate::cache::KeyValueStore;
use crate::error::StoreError;
use crate::hadeeth::types::Language;

const SETTINGS_KEY: &str = "settings_preferences";
const LANGUAGE_KEY: &str = "language_preference";
const THEME_KEY: &str = "theme_preference";

/// Reading settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
  pub font_size: u32,
  pub arabic_font_size: u32,
  /// Treat the cache as authoritative regardless of age.
  pub offline_mode: bool,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      font_size: 16,
      arabic_font_size: 20,
      offline_mode: false,
    }
  }
}

/// Partial settings change; `None` leaves the field as stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsUpdate {
  pub font_size: Option<u32>,
  pub arabic_font_size: Option<u32>,
  pub offline_mode: Option<bool>,
}

impl SettingsUpdate {
  pub fn is_empty(&self) -> bool {
    self.font_size.is_none() && self.arabic_font_size.is_none() && self.offline_mode.is_none()
  }

  fn apply(self, settings: Settings) -> Settings {
    Settings {
      font_size: self.font_size.unwrap_or(settings.font_size),
      arabic_font_size: self.arabic_font_size.unwrap_or(settings.arabic_font_size),
      offline_mode: self.offline_mode.unwrap_or(settings.offline_mode),
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
  #[default]
  Light,
  Dark,
}

impl Theme {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Light => "light",
      Self::Dark => "dark",
    }
  }
}

impl fmt::Display for Theme {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Theme {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "light" => Ok(Self::Light),
      "dark" => Ok(Self::Dark),
      other => Err(format!("unknown theme: {}", other)),
    }
  }
}

/// Accessor for all persisted preferences.
pub struct Preferences<S: KeyValueStore> {
  storage: Arc<S>,
}

impl<S: KeyValueStore> Clone for Preferences<S> {
  fn clone(&self) -> Self {
    Self {
      storage: Arc::clone(&self.storage),
    }
  }
}

impl<S: KeyValueStore> Preferences<S> {
  pub fn new(storage: Arc<S>) -> Self {
    Self { storage }
  }

  /// Current settings; saved fields override defaults, failures yield defaults.
  pub fn settings(&self) -> Settings {
    match self.storage.get_json::<Settings>(SETTINGS_KEY) {
      Ok(saved) => saved.unwrap_or_default(),
      Err(e) => {
        warn!(error = %e, "Failed to load settings, using defaults");
        Settings::default()
      }
    }
  }

  /// Apply `update` over the stored settings and persist the result.
  pub fn update_settings(&self, update: SettingsUpdate) -> Result<Settings, StoreError> {
    let updated = update.apply(self.settings());
    self.storage.set_json(SETTINGS_KEY, &updated)?;
    Ok(updated)
  }

  /// Whether offline mode is on. Read fresh on every call.
  pub fn offline_mode(&self) -> bool {
    self.settings().offline_mode
  }

  /// Saved display language; unknown or unreadable values give the default.
  pub fn language(&self) -> Language {
    match self.storage.get(LANGUAGE_KEY) {
      Ok(Some(code)) => code.parse().unwrap_or_else(|e| {
        warn!(error = %e, "Ignoring saved language");
        Language::default()
      }),
      Ok(None) => Language::default(),
      Err(e) => {
        warn!(error = %e, "Failed to load language");
        Language::default()
      }
    }
  }

  pub fn set_language(&self, language: Language) -> Result<(), StoreError> {
    self.storage.set(LANGUAGE_KEY, language.code())
  }

  pub fn theme(&self) -> Theme {
    match self.storage.get(THEME_KEY) {
      Ok(Some(value)) => value.parse().unwrap_or_default(),
      Ok(None) => Theme::default(),
      Err(e) => {
        warn!(error = %e, "Failed to load theme");
        Theme::default()
      }
    }
  }

  pub fn set_theme(&self, theme: Theme) -> Result<(), StoreError> {
    self.storage.set(THEME_KEY, theme.as_str())
  }
}
