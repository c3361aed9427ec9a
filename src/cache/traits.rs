//! Core traits and types for the caching system.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::policy::FreshnessClass;

/// A logical request that can be cached.
pub trait QueryKey {
  /// Deterministic store key; distinct requests never share one.
  fn cache_hash(&self) -> String;

  /// Human-readable description for logs.
  fn description(&self) -> String;

  /// How long a cached answer to this request stays fresh.
  fn freshness(&self) -> FreshnessClass;
}

/// What is persisted under a cache key.
///
/// Serialized as `{ "data": <payload>, "timestamp": <epoch ms> }`. Entries are
/// replaced wholesale on every successful fetch and never patched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry<T> {
  pub data: T,
  pub timestamp: i64,
}

impl<T> CacheEntry<T> {
  /// Create an entry stamped with `stored_at`.
  pub fn new(data: T, stored_at: DateTime<Utc>) -> Self {
    Self {
      data,
      timestamp: stored_at.timestamp_millis(),
    }
  }

  /// When the entry was written.
  pub fn stored_at(&self) -> DateTime<Utc> {
    Utc
      .timestamp_millis_opt(self.timestamp)
      .single()
      .unwrap_or(DateTime::<Utc>::MIN_UTC)
  }
}

/// Result from a cache operation, including data and metadata about the source.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: CacheSource,
  /// When the data was cached (if from cache)
  pub cached_at: Option<DateTime<Utc>>,
}

impl<T> CacheResult<T> {
  /// Fresh data from the network.
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
      cached_at: None,
    }
  }

  /// Cached data served by the policy, or as a fallback after a failed fetch.
  pub fn from_cache(data: T, cached_at: DateTime<Utc>, is_stale: bool) -> Self {
    Self {
      data,
      source: if is_stale {
        CacheSource::CacheStale
      } else {
        CacheSource::CacheFresh
      },
      cached_at: Some(cached_at),
    }
  }

  /// Cached data served because the user is offline or the network is unreachable.
  pub fn offline(data: T, cached_at: DateTime<Utc>) -> Self {
    Self {
      data,
      source: CacheSource::Offline,
      cached_at: Some(cached_at),
    }
  }
}

/// Indicates where returned data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Fresh data from network
  Network,
  /// Data from cache, still considered fresh
  CacheFresh,
  /// Data from cache after the network fetch failed
  CacheStale,
  /// Offline mode or no connectivity - serving cached data
  Offline,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_entry_wire_format() {
    let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
    let entry = CacheEntry::new(vec!["a".to_string()], at);
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(
      json,
      serde_json::json!({ "data": ["a"], "timestamp": 1_700_000_000_123i64 })
    );
    assert_eq!(entry.stored_at(), at);
  }

  #[test]
  fn test_cache_result_sources() {
    let at = Utc::now();
    assert_eq!(CacheResult::from_network(1).source, CacheSource::Network);
    assert_eq!(
      CacheResult::from_cache(1, at, false).source,
      CacheSource::CacheFresh
    );
    assert_eq!(
      CacheResult::from_cache(1, at, true).source,
      CacheSource::CacheStale
    );
    assert_eq!(CacheResult::offline(1, at).source, CacheSource::Offline);
  }
}
