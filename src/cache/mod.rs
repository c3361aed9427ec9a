//! Caching layer for remote content and offline support.
//!
//! This module provides an API-agnostic caching mechanism that:
//! - Stores each response wholesale under a derived key, stamped with its write time
//! - Decides per request between cache and network based on a freshness class
//! - Honors the user's offline mode and the current connectivity
//! - Falls back to the last cached value whenever a fetch fails

mod layer;
pub mod policy;
mod storage;
mod traits;

pub use layer::CacheLayer;
pub use policy::{Decision, FreshnessClass};
pub use storage::{KeyValueStore, SqliteStorage};
pub use traits::{CacheEntry, CacheResult, CacheSource, QueryKey};
