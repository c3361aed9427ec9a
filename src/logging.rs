//! Tracing setup. Logs go to a file so stdout carries only command output.

use color_eyre::{eyre::eyre, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "HADISATLAS_LOG";
const LOG_FILE: &str = "hadisatlas.log";
const DEFAULT_FILTER: &str = "hadisatlas=info";

/// Install the global subscriber writing to `<dir>/hadisatlas.log`, or to
/// stderr when no directory is known. Keep the guard alive until exit.
pub fn init(dir: Option<&Path>) -> Result<WorkerGuard> {
  let (writer, guard) = match dir {
    Some(dir) => {
      std::fs::create_dir_all(dir)
        .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;
      tracing_appender::non_blocking(tracing_appender::rolling::never(dir, LOG_FILE))
    }
    None => tracing_appender::non_blocking(std::io::stderr()),
  };

  let filter =
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .try_init()
    .map_err(|e| eyre!("Failed to install tracing subscriber: {}", e))?;

  Ok(guard)
}
