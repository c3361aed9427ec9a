use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

const DEFAULT_API_URL: &str = "https://hadeethenc.com/api/v1";
const API_URL_ENV: &str = "HADISATLAS_API_URL";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub api: ApiConfig,
  #[serde(default)]
  pub storage: StorageConfig,
  /// Hadiths requested per list page
  #[serde(default = "default_per_page")]
  pub per_page: u32,
}

fn default_per_page() -> u32 {
  20
}

impl Default for Config {
  fn default() -> Self {
    Self {
      api: ApiConfig::default(),
      storage: StorageConfig::default(),
      per_page: default_per_page(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  #[serde(default = "default_base_url")]
  pub base_url: String,
  /// Request timeout; the HTTP client's default applies when unset
  pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
  DEFAULT_API_URL.to_string()
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      timeout_secs: None,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
  /// SQLite file for cache, preferences and favorites
  pub path: Option<PathBuf>,
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./hadisatlas.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/hadisatlas/config.yaml
  ///
  /// With no file found the defaults are used. `HADISATLAS_API_URL`
  /// overrides the API base URL in every case.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let mut config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Self::default(),
    };

    if let Ok(url) = std::env::var(API_URL_ENV) {
      config.api.base_url = url;
    }

    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("hadisatlas.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("hadisatlas").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    // An empty file deserializes to null
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }

    let config: Config = serde_yaml::from_str(contents)?;
    if config.per_page == 0 {
      return Err(eyre!("per_page must be at least 1"));
    }
    Ok(config)
  }

  /// The parsed API base URL.
  pub fn api_base_url(&self) -> Result<Url> {
    Url::parse(&self.api.base_url)
      .map_err(|e| eyre!("Invalid API base URL '{}': {}", self.api.base_url, e))
  }

  /// Directory for the log file; next to the store.
  pub fn data_dir(&self) -> Option<PathBuf> {
    match &self.storage.path {
      Some(path) => path.parent().map(Path::to_path_buf),
      None => dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
        .map(|dir| dir.join("hadisatlas")),
    }
  }
}
