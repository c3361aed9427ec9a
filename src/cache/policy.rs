//! Cache policy: decides between serving the cache and going to the network.

use chrono::{DateTime, Duration, Utc};

/// Freshness class of a resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessClass {
  /// Category listings (24 hours)
  Categories,
  /// Hadith pages and single hadiths (7 days)
  Hadiths,
}

impl FreshnessClass {
  /// Maximum age before a cached entry of this class is stale.
  pub fn duration(self) -> Duration {
    match self {
      Self::Categories => Duration::hours(24),
      Self::Hadiths => Duration::days(7),
    }
  }

  /// An entry stored at `stored_at` is expired once its age reaches the duration.
  pub fn is_expired(self, stored_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - stored_at >= self.duration()
  }
}

/// Action to take for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
  ServeCache,
  FetchRemote,
  FailNoData,
}

/// Decide what to do for a request.
///
/// `cached_at` is the timestamp of the cached entry, if any. `connected` is
/// `None` while connectivity has not been probed yet; a known disconnect
/// turns a remote fetch into serving whatever is cached, or into failure on
/// a cold miss.
pub fn evaluate(
  class: FreshnessClass,
  cached_at: Option<DateTime<Utc>>,
  offline_mode: bool,
  connected: Option<bool>,
  now: DateTime<Utc>,
) -> Decision {
  let disconnected = connected == Some(false);

  let Some(stored_at) = cached_at else {
    return if disconnected {
      Decision::FailNoData
    } else {
      Decision::FetchRemote
    };
  };

  if offline_mode || !class.is_expired(stored_at, now) || disconnected {
    Decision::ServeCache
  } else {
    Decision::FetchRemote
  }
}
