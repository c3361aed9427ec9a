//! Cached HadeethEnc client: the single entry point screens call.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::{CacheLayer, KeyValueStore};
use crate::connectivity::Connectivity;
use crate::error::ApiError;
use crate::favorites::SavedHadiths;

use super::cache::ResourceKey;
use super::client::HadeethApi;
use super::types::{subcategories_of, Category, Hadith, HadithListItem, Language};

/// HadeethEnc client with transparent caching support.
///
/// This wraps the underlying API client and provides the same operations,
/// but caches every successful answer and degrades to the last cached
/// answer for the exact same request whenever the network cannot be used.
pub struct CachedHadeethClient<A: HadeethApi, S: KeyValueStore, C: Connectivity> {
  inner: A,
  cache: CacheLayer<S, C>,
  saved: SavedHadiths<S>,
}

impl<A: HadeethApi, S: KeyValueStore, C: Connectivity> CachedHadeethClient<A, S, C> {
  pub fn new(inner: A, storage: Arc<S>, connectivity: Arc<C>) -> Self {
    Self {
      inner,
      saved: SavedHadiths::new(Arc::clone(&storage)),
      cache: CacheLayer::new(storage, connectivity),
    }
  }

  /// Top-level categories.
  pub async fn root_categories(&self, language: Language) -> Result<Vec<Category>, ApiError> {
    let key = ResourceKey::RootCategories { language };

    let result = self
      .cache
      .fetch(&key, || self.inner.root_categories(language))
      .await?;

    Ok(result.data)
  }

  /// Every category as a flat list.
  pub async fn all_categories(&self, language: Language) -> Result<Vec<Category>, ApiError> {
    let key = ResourceKey::AllCategories { language };

    let result = self
      .cache
      .fetch(&key, || self.inner.all_categories(language))
      .await?;

    Ok(result.data)
  }

  /// Direct children of `parent_id`, derived from the full category list.
  pub async fn subcategories(
    &self,
    language: Language,
    parent_id: &str,
  ) -> Result<Vec<Category>, ApiError> {
    let all = self.all_categories(language).await?;
    Ok(
      subcategories_of(&all, parent_id)
        .into_iter()
        .cloned()
        .collect(),
    )
  }

  /// One page of a category's hadiths; each page is cached separately.
  pub async fn hadeeths_page(
    &self,
    language: Language,
    category_id: &str,
    page: u32,
    per_page: u32,
  ) -> Result<Vec<HadithListItem>, ApiError> {
    let key = ResourceKey::HadeethsList {
      language,
      category_id: category_id.to_string(),
      page,
      per_page,
    };

    let result = self
      .cache
      .fetch(&key, || {
        self
          .inner
          .hadeeths_list(language, category_id, page, per_page)
      })
      .await?;

    Ok(result.data)
  }

  /// A single hadith.
  pub async fn hadeeth(&self, language: Language, id: &str) -> Result<Hadith, ApiError> {
    let key = ResourceKey::Hadeeth {
      language,
      id: id.to_string(),
    };

    let result = self
      .cache
      .fetch(&key, || self.inner.hadeeth(language, id))
      .await?;

    Ok(result.data)
  }

  /// Open a hadith for reading.
  ///
  /// Hadiths opened or favorited before are served from the saved map without
  /// touching the cache policy; others go through [`Self::hadeeth`] and are
  /// saved afterwards.
  pub async fn open_hadeeth(&self, language: Language, id: &str) -> Result<Hadith, ApiError> {
    match self.saved.get(language, id) {
      Ok(Some(hadith)) => {
        debug!(id, %language, "Serving saved hadith");
        return Ok(hadith);
      }
      Ok(None) => {}
      Err(e) => warn!(error = %e, id, "Failed to read saved hadiths"),
    }

    let hadith = self.hadeeth(language, id).await?;
    if let Err(e) = self.saved.put(language, &hadith) {
      warn!(error = %e, id, "Failed to save opened hadith");
    }
    Ok(hadith)
  }
}
