//! Text helpers shared by anything that shows or shares a hadith.

use crate::hadeeth::types::{Hadith, Language};

/// Longest title shown before truncation.
pub const MAX_TITLE_LENGTH: usize = 100;

/// Truncate to `max_chars` characters, adding "..." if truncated.
pub fn truncate(s: &str, max_chars: usize) -> String {
  match s.char_indices().nth(max_chars) {
    Some((idx, _)) => format!("{}...", &s[..idx]),
    None => s.to_string(),
  }
}

pub fn truncate_title(title: &str) -> String {
  truncate(title, MAX_TITLE_LENGTH)
}

fn pick<'a>(language: Language, default: &'a str, arabic: &'a str) -> &'a str {
  if language == Language::Ar && !arabic.is_empty() {
    arabic
  } else {
    default
  }
}

/// Hadith fields as they should be read in a given language.
///
/// Arabic readers get the `_ar` variants where the record has them.
pub struct LocalizedHadith<'a> {
  pub title: &'a str,
  pub text: &'a str,
  pub attribution: &'a str,
  pub grade: &'a str,
  pub explanation: &'a str,
  pub hints: &'a [String],
}

impl<'a> LocalizedHadith<'a> {
  pub fn new(hadith: &'a Hadith, language: Language) -> Self {
    let hints = if language == Language::Ar && !hadith.hints_ar.is_empty() {
      &hadith.hints_ar
    } else {
      &hadith.hints
    };

    Self {
      title: &hadith.title,
      text: pick(language, &hadith.hadeeth, &hadith.hadeeth_ar),
      attribution: pick(language, &hadith.attribution, &hadith.attribution_ar),
      grade: pick(language, &hadith.grade, &hadith.grade_ar),
      explanation: pick(language, &hadith.explanation, &hadith.explanation_ar),
      hints,
    }
  }
}

/// Plain-text form used when sharing a hadith.
pub fn share_text(hadith: &Hadith) -> String {
  format!(
    "{}\n\n{}\n{}",
    hadith.hadeeth, hadith.attribution, hadith.grade
  )
}
