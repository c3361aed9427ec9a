//! Persistent key-value store trait and SQLite implementation.

use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use crate::error::StoreError;

/// Durable string-keyed storage shared by the cache, preferences and favorites.
///
/// `get`/`set` are atomic per key; there are no transactions across keys.
pub trait KeyValueStore: Send + Sync {
  /// Read the raw value stored under `key`.
  fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

  /// Replace the value stored under `key`.
  fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

  /// Read and deserialize a JSON value.
  fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError>
  where
    Self: Sized,
  {
    match self.get(key)? {
      Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
      None => Ok(None),
    }
  }

  /// Serialize a value as JSON and store it.
  fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError>
  where
    Self: Sized,
  {
    let raw = serde_json::to_string(value)?;
    self.set(key, &raw)
  }
}

/// SQLite-based key-value storage.
pub struct SqliteStorage {
  conn: Mutex<Connection>,
}

impl SqliteStorage {
  /// Open (or create) the store at the default location.
  pub fn open_default() -> Result<Self, StoreError> {
    Self::open(&Self::default_path()?)
  }

  /// Open (or create) the store at `path`.
  pub fn open(path: &Path) -> Result<Self, StoreError> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;
    debug!(path = %path.display(), "Opened key-value store");
    Self::with_connection(conn)
  }

  /// A store that lives only as long as this value.
  pub fn in_memory() -> Result<Self, StoreError> {
    Self::with_connection(Connection::open_in_memory()?)
  }

  fn with_connection(conn: Connection) -> Result<Self, StoreError> {
    conn.execute_batch(STORE_SCHEMA)?;
    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  /// Get the default database path.
  pub fn default_path() -> Result<PathBuf, StoreError> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| {
        StoreError::Io(std::io::Error::new(
          std::io::ErrorKind::NotFound,
          "could not determine data directory",
        ))
      })?;

    Ok(data_dir.join("hadisatlas").join("store.db"))
  }
}

/// Schema for the key-value table.
const STORE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

impl KeyValueStore for SqliteStorage {
  fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
    let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;

    let value = conn
      .query_row(
        "SELECT value FROM kv_store WHERE key = ?",
        params![key],
        |row| row.get(0),
      )
      .optional()?;

    Ok(value)
  }

  fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
    let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;

    conn.execute(
      "INSERT OR REPLACE INTO kv_store (key, value, updated_at)
       VALUES (?, ?, datetime('now'))",
      params![key, value],
    )?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde::Deserialize;

  #[derive(Debug, PartialEq, Serialize, Deserialize)]
  struct Sample {
    name: String,
    count: u32,
  }

  #[test]
  fn test_missing_key_is_none() {
    let store = SqliteStorage::in_memory().unwrap();
    assert_eq!(store.get("absent").unwrap(), None);
  }

  #[test]
  fn test_set_replaces_whole_value() {
    let store = SqliteStorage::in_memory().unwrap();
    store.set("k", "first").unwrap();
    store.set("k", "second").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));
  }

  #[test]
  fn test_json_helpers() {
    let store = SqliteStorage::in_memory().unwrap();
    let sample = Sample {
      name: "belief".into(),
      count: 3,
    };
    store.set_json("sample", &sample).unwrap();
    assert_eq!(store.get_json::<Sample>("sample").unwrap(), Some(sample));
  }

  #[test]
  fn test_get_json_rejects_garbage() {
    let store = SqliteStorage::in_memory().unwrap();
    store.set("sample", "{not json").unwrap();
    assert!(matches!(
      store.get_json::<Sample>("sample"),
      Err(StoreError::Serialize(_))
    ));
  }

  #[test]
  fn test_values_survive_reopen() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("nested").join("store.db");

    {
      let store = SqliteStorage::open(&path).unwrap();
      store.set("language_preference", "en").unwrap();
    }

    let store = SqliteStorage::open(&path).unwrap();
    assert_eq!(
      store.get("language_preference").unwrap().as_deref(),
      Some("en")
    );
  }
}
