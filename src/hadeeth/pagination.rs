//! Page-by-page loading of a category's hadith list.

use crate::cache::KeyValueStore;
use crate::connectivity::Connectivity;
use crate::error::ApiError;

use super::cached_client::CachedHadeethClient;
use super::client::HadeethApi;
use super::types::{HadithListItem, Language};

/// Accumulates pages of one category's list.
///
/// There is no total count: a page shorter than `per_page` (or empty) ends the
/// list. When the true last page is exactly `per_page` long, one extra, empty
/// page is requested before the list is known to be complete.
#[derive(Debug, Clone)]
pub struct HadeethPager {
  language: Language,
  category_id: String,
  per_page: u32,
  next_page: u32,
  has_more: bool,
  items: Vec<HadithListItem>,
}

impl HadeethPager {
  pub fn new(language: Language, category_id: impl Into<String>, per_page: u32) -> Self {
    Self {
      language,
      category_id: category_id.into(),
      per_page: per_page.max(1),
      next_page: 1,
      has_more: true,
      items: Vec::new(),
    }
  }

  pub fn has_more(&self) -> bool {
    self.has_more
  }

  /// The page `load_next` will request.
  pub fn next_page(&self) -> u32 {
    self.next_page
  }

  /// Everything loaded so far, in page order.
  pub fn items(&self) -> &[HadithListItem] {
    &self.items
  }

  /// Load the next page and return just its items.
  ///
  /// Once the list has ended this returns an empty slice without a request.
  /// A failed page leaves the pager where it was, so the call can be repeated.
  pub async fn load_next<A, S, C>(
    &mut self,
    client: &CachedHadeethClient<A, S, C>,
  ) -> Result<&[HadithListItem], ApiError>
  where
    A: HadeethApi,
    S: KeyValueStore,
    C: Connectivity,
  {
    if !self.has_more {
      return Ok(&[]);
    }

    let page = client
      .hadeeths_page(self.language, &self.category_id, self.next_page, self.per_page)
      .await?;

    self.has_more = page.len() == self.per_page as usize;
    self.next_page += 1;

    let start = self.items.len();
    self.items.extend(page);
    Ok(&self.items[start..])
  }

  /// Load pages until the list ends.
  pub async fn load_all<A, S, C>(
    &mut self,
    client: &CachedHadeethClient<A, S, C>,
  ) -> Result<&[HadithListItem], ApiError>
  where
    A: HadeethApi,
    S: KeyValueStore,
    C: Connectivity,
  {
    while self.has_more {
      self.load_next(client).await?;
    }
    Ok(&self.items)
  }
}
