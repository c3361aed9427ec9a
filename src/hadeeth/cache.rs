//! Cache keys for the HadeethEnc resources.

use sha2::{Digest, Sha256};

use crate::cache::{FreshnessClass, QueryKey};

use super::types::Language;

/// The four fetchable resources with everything that identifies one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceKey {
  /// Top-level categories
  RootCategories { language: Language },
  /// Flat list of every category
  AllCategories { language: Language },
  /// One page of a category's hadith list
  HadeethsList {
    language: Language,
    category_id: String,
    page: u32,
    per_page: u32,
  },
  /// A single hadith
  Hadeeth { language: Language, id: String },
}

impl QueryKey for ResourceKey {
  fn cache_hash(&self) -> String {
    // Free-form ids are followed only by numeric fields, so the input is
    // unambiguous before hashing.
    let input = match self {
      Self::RootCategories { language } => format!("root_categories:{}", language.code()),
      Self::AllCategories { language } => format!("all_categories:{}", language.code()),
      Self::HadeethsList {
        language,
        category_id,
        page,
        per_page,
      } => format!(
        "hadeeths_list:{}:{}:{}:{}",
        language.code(),
        category_id,
        page,
        per_page
      ),
      Self::Hadeeth { language, id } => format!("hadeeth:{}:{}", language.code(), id),
    };

    // SHA256 hash for stable, fixed-length keys
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("cache:{}", hex::encode(hasher.finalize()))
  }

  fn description(&self) -> String {
    match self {
      Self::RootCategories { language } => format!("root categories [{}]", language),
      Self::AllCategories { language } => format!("all categories [{}]", language),
      Self::HadeethsList {
        language,
        category_id,
        page,
        per_page,
      } => format!(
        "category {} page {} ({} per page) [{}]",
        category_id, page, per_page, language
      ),
      Self::Hadeeth { language, id } => format!("hadeeth {} [{}]", id, language),
    }
  }

  fn freshness(&self) -> FreshnessClass {
    match self {
      Self::RootCategories { .. } | Self::AllCategories { .. } => FreshnessClass::Categories,
      Self::HadeethsList { .. } | Self::Hadeeth { .. } => FreshnessClass::Hadiths,
    }
  }
}
