//! Serde types matching HadeethEnc response envelopes.
//!
//! Only shapes that differ from the domain types live here; categories and
//! single hadiths deserialize straight into `types`.

use serde::Deserialize;

use super::types::HadithListItem;

/// `GET /hadeeths/list` wraps its items in a `data` field.
#[derive(Debug, Deserialize)]
pub struct ApiHadeethListResponse {
  #[serde(default)]
  pub data: Vec<HadithListItem>,
}
