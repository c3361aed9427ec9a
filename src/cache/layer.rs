//! Cache layer that orchestrates caching logic with network fetching.

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::policy::{self, Decision};
use super::storage::KeyValueStore;
use super::traits::{CacheEntry, CacheResult, QueryKey};
use crate::connectivity::Connectivity;
use crate::error::ApiError;
use crate::preferences::Preferences;

/// Cache layer that manages caching logic and network fetching.
///
/// This layer sits between the application and the network client. Nothing is
/// kept in memory between calls: every fetch re-reads its entry and the
/// offline-mode preference from the store.
pub struct CacheLayer<S: KeyValueStore, C: Connectivity> {
  storage: Arc<S>,
  connectivity: Arc<C>,
  preferences: Preferences<S>,
}

impl<S: KeyValueStore, C: Connectivity> CacheLayer<S, C> {
  pub fn new(storage: Arc<S>, connectivity: Arc<C>) -> Self {
    Self {
      preferences: Preferences::new(Arc::clone(&storage)),
      storage,
      connectivity,
    }
  }

  /// Read a cache entry. Read failures and unparseable entries count as a miss.
  fn read_entry<T: DeserializeOwned>(&self, key: &str, description: &str) -> Option<CacheEntry<T>> {
    match self.storage.get_json::<CacheEntry<T>>(key) {
      Ok(entry) => entry,
      Err(e) => {
        warn!(error = %e, query = description, "Cache read failed, treating as miss");
        None
      }
    }
  }

  /// Persist a fresh entry. Failures are logged and swallowed.
  fn write_entry<T: Serialize>(&self, key: &str, description: &str, data: &T) {
    let entry = CacheEntry::new(data, Utc::now());
    if let Err(e) = self.storage.set_json(key, &entry) {
      warn!(error = %e, query = description, "Cache write failed, returning fetched data anyway");
    }
  }

  /// Fetch a resource with cache-first strategy.
  ///
  /// 1. Fresh entry, or any entry while offline mode is on: serve it
  /// 2. Otherwise check connectivity; when unreachable serve whatever is
  ///    cached, or fail with [`ApiError::Connectivity`] on a cold miss
  /// 3. Fetch; on success replace the entry
  /// 4. On fetch failure fall back to the cached entry if there is one
  pub async fn fetch<K, T, F, Fut>(&self, key: &K, fetcher: F) -> Result<CacheResult<T>, ApiError>
  where
    K: QueryKey,
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
  {
    let store_key = key.cache_hash();
    let description = key.description();
    let class = key.freshness();

    let cached = self.read_entry::<T>(&store_key, &description);
    let cached_at = cached.as_ref().map(CacheEntry::stored_at);
    let offline_mode = self.preferences.offline_mode();
    let now = Utc::now();

    let mut decision = policy::evaluate(class, cached_at, offline_mode, None, now);
    let mut reachable = true;

    if decision == Decision::FetchRemote && !offline_mode {
      reachable = self.connectivity.is_connected().await;
      if !reachable {
        decision = policy::evaluate(class, cached_at, offline_mode, Some(false), now);
      }
    }

    match (decision, cached) {
      (Decision::ServeCache, Some(entry)) => {
        let stored_at = entry.stored_at();
        if offline_mode || !reachable {
          info!(query = %description, offline_mode, "Serving cached data offline");
          Ok(CacheResult::offline(entry.data, stored_at))
        } else {
          debug!(query = %description, "Cache hit");
          Ok(CacheResult::from_cache(entry.data, stored_at, false))
        }
      }
      (Decision::FetchRemote, cached) => {
        debug!(query = %description, cold = cached.is_none(), "Fetching from network");
        match fetcher().await {
          Ok(data) => {
            self.write_entry(&store_key, &description, &data);
            Ok(CacheResult::from_network(data))
          }
          Err(e) => match cached {
            Some(entry) => {
              warn!(error = %e, query = %description, "Fetch failed, serving stale cache");
              let stored_at = entry.stored_at();
              Ok(CacheResult::from_cache(entry.data, stored_at, true))
            }
            None => Err(e),
          },
        }
      }
      (Decision::FailNoData, _) | (Decision::ServeCache, None) => {
        info!(query = %description, "No connection and nothing cached");
        Err(ApiError::Connectivity)
      }
    }
  }
}

impl<S: KeyValueStore, C: Connectivity> Clone for CacheLayer<S, C> {
  fn clone(&self) -> Self {
    Self {
      storage: Arc::clone(&self.storage),
      connectivity: Arc::clone(&self.connectivity),
      preferences: self.preferences.clone(),
    }
  }
}
