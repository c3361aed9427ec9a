//! Offline-first access to the HadeethEnc encyclopedia.
//!
//! [`hadeeth::CachedHadeethClient`] is the entry point: it answers category,
//! list and hadith requests from a local SQLite-backed cache when that is
//! fresh enough (or when the network is unavailable) and from the API
//! otherwise.

pub mod cache;
pub mod config;
pub mod connectivity;
pub mod display;
pub mod error;
pub mod favorites;
pub mod hadeeth;
pub mod logging;
pub mod preferences;
