//! Error taxonomy for the data-access core.

use thiserror::Error;

/// Failures of the persistent key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("failed to (de)serialize stored value: {0}")]
  Serialize(#[from] serde_json::Error),

  #[error("storage lock poisoned")]
  LockPoisoned,

  #[error("storage io error: {0}")]
  Io(#[from] std::io::Error),
}

/// Failures surfaced by the remote client and the data-access facade.
#[derive(Debug, Error)]
pub enum ApiError {
  /// No network and nothing cached for the requested resource.
  #[error("no internet connection and no cached data available")]
  Connectivity,

  /// The request never produced a response (DNS, TLS, reset, ...).
  #[error("request failed: {0}")]
  Transport(String),

  /// The remote answered with a non-success status.
  #[error("HTTP {status} from {url}")]
  Status { status: u16, url: String },

  /// The response body did not match the expected shape.
  #[error("failed to decode response: {0}")]
  Decode(#[from] serde_json::Error),
}

impl ApiError {
  /// Transport and status failures; the "network error" class.
  pub fn is_network(&self) -> bool {
    matches!(self, Self::Transport(_) | Self::Status { .. })
  }
}

impl From<reqwest::Error> for ApiError {
  fn from(err: reqwest::Error) -> Self {
    match err.status() {
      Some(status) => Self::Status {
        status: status.as_u16(),
        url: err.url().map(|u| u.to_string()).unwrap_or_default(),
      },
      None => Self::Transport(err.to_string()),
    }
  }
}
