use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display languages the remote API is queried in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
  #[default]
  Tr,
  En,
  Ar,
}

impl Language {
  pub const ALL: &'static [Language] = &[Language::Tr, Language::En, Language::Ar];

  /// Code sent as the `language` query parameter.
  pub fn code(self) -> &'static str {
    match self {
      Self::Tr => "tr",
      Self::En => "en",
      Self::Ar => "ar",
    }
  }

  /// Name of the language in itself.
  pub fn native_name(self) -> &'static str {
    match self {
      Self::Tr => "Türkçe",
      Self::En => "English",
      Self::Ar => "العربية",
    }
  }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.code())
  }
}

/// Error for language codes outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language code: {0}")]
pub struct UnsupportedLanguage(pub String);

impl FromStr for Language {
  type Err = UnsupportedLanguage;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let code = s.trim().to_lowercase();
    Language::ALL
      .iter()
      .copied()
      .find(|lang| lang.code() == code)
      .ok_or(UnsupportedLanguage(code))
  }
}

/// Category node; roots have no parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub id: String,
  pub title: String,
  pub hadeeths_count: String,
  pub parent_id: Option<String>,
}

/// Entry of a paginated hadith list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HadithListItem {
  pub id: String,
  pub title: String,
  #[serde(default)]
  pub translations: Vec<String>,
}

/// Full hadith record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hadith {
  pub id: String,
  pub title: String,
  #[serde(default)]
  pub hadeeth: String,
  #[serde(default)]
  pub attribution: String,
  #[serde(default)]
  pub grade: String,
  #[serde(default)]
  pub explanation: String,
  #[serde(default)]
  pub hints: Vec<String>,
  #[serde(default)]
  pub categories: Vec<String>,
  #[serde(default)]
  pub translations: Vec<String>,
  #[serde(default)]
  pub hadeeth_intro: String,
  #[serde(default)]
  pub hadeeth_ar: String,
  #[serde(default)]
  pub hadeeth_intro_ar: String,
  #[serde(default)]
  pub explanation_ar: String,
  #[serde(default)]
  pub hints_ar: Vec<String>,
  #[serde(default)]
  pub attribution_ar: String,
  #[serde(default)]
  pub grade_ar: String,
}

/// Direct children of `parent_id` in a flat category list, in list order.
pub fn subcategories_of<'a>(categories: &'a [Category], parent_id: &str) -> Vec<&'a Category> {
  categories
    .iter()
    .filter(|c| c.parent_id.as_deref() == Some(parent_id))
    .collect()
}
