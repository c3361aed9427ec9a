//! HadeethEnc encyclopedia: API client, cache keys and the cached facade.

pub mod api_types;
pub mod cache;
pub mod cached_client;
pub mod client;
pub mod pagination;
pub mod types;

pub use cached_client::CachedHadeethClient;
pub use client::{HadeethApi, HadeethClient};
pub use pagination::HadeethPager;
pub use types::{Category, Hadith, HadithListItem, Language};
