use color_eyre::{eyre::eyre, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::ApiError;
use crate::hadeeth::api_types::ApiHadeethListResponse;
use crate::hadeeth::types::{Category, Hadith, HadithListItem, Language};

/// Read operations of the remote content API.
///
/// Implementations perform exactly one request per call and never retry.
pub trait HadeethApi: Send + Sync {
  fn root_categories(
    &self,
    language: Language,
  ) -> impl Future<Output = Result<Vec<Category>, ApiError>> + Send;

  fn all_categories(
    &self,
    language: Language,
  ) -> impl Future<Output = Result<Vec<Category>, ApiError>> + Send;

  /// One 1-indexed page of a category's hadiths.
  fn hadeeths_list(
    &self,
    language: Language,
    category_id: &str,
    page: u32,
    per_page: u32,
  ) -> impl Future<Output = Result<Vec<HadithListItem>, ApiError>> + Send;

  fn hadeeth(&self, language: Language, id: &str)
    -> impl Future<Output = Result<Hadith, ApiError>> + Send;
}

impl<T: HadeethApi> HadeethApi for Arc<T> {
  fn root_categories(
    &self,
    language: Language,
  ) -> impl Future<Output = Result<Vec<Category>, ApiError>> + Send {
    (**self).root_categories(language)
  }

  fn all_categories(
    &self,
    language: Language,
  ) -> impl Future<Output = Result<Vec<Category>, ApiError>> + Send {
    (**self).all_categories(language)
  }

  fn hadeeths_list(
    &self,
    language: Language,
    category_id: &str,
    page: u32,
    per_page: u32,
  ) -> impl Future<Output = Result<Vec<HadithListItem>, ApiError>> + Send {
    (**self).hadeeths_list(language, category_id, page, per_page)
  }

  fn hadeeth(&self, language: Language, id: &str)
    -> impl Future<Output = Result<Hadith, ApiError>> + Send {
    (**self).hadeeth(language, id)
  }
}

/// HadeethEnc API client
#[derive(Clone)]
pub struct HadeethClient {
  client: Client,
  base_url: Url,
}

impl HadeethClient {
  pub fn new(config: &Config) -> Result<Self> {
    let base_url = config.api_base_url()?;

    let mut builder = Client::builder().user_agent(format!(
      "hadisatlas/{}",
      env!("CARGO_PKG_VERSION")
    ));
    if let Some(secs) = config.api.timeout_secs {
      builder = builder.timeout(Duration::from_secs(secs));
    }

    let client = builder
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { client, base_url })
  }

  /// Issue a GET and decode the JSON body.
  async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, ApiError> {
    let url = endpoint_url(&self.base_url, path, query);
    debug!(url = %url, "GET");

    let response = self.client.get(url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
      return Err(ApiError::Status {
        status: status.as_u16(),
        url: url.to_string(),
      });
    }

    let body = response.text().await?;
    decode_body(&body)
  }
}

impl HadeethApi for HadeethClient {
  async fn root_categories(&self, language: Language) -> Result<Vec<Category>, ApiError> {
    self
      .get("categories/roots", &[("language", language.code())])
      .await
  }

  async fn all_categories(&self, language: Language) -> Result<Vec<Category>, ApiError> {
    self
      .get("categories/list", &[("language", language.code())])
      .await
  }

  async fn hadeeths_list(
    &self,
    language: Language,
    category_id: &str,
    page: u32,
    per_page: u32,
  ) -> Result<Vec<HadithListItem>, ApiError> {
    let page = page.to_string();
    let per_page = per_page.to_string();
    let response: ApiHadeethListResponse = self
      .get(
        "hadeeths/list",
        &[
          ("language", language.code()),
          ("category_id", category_id),
          ("page", page.as_str()),
          ("per_page", per_page.as_str()),
        ],
      )
      .await?;

    Ok(response.data)
  }

  async fn hadeeth(&self, language: Language, id: &str) -> Result<Hadith, ApiError> {
    self
      .get("hadeeths/one", &[("language", language.code()), ("id", id)])
      .await
  }
}

/// Append `path` to the base URL's path and set the query parameters.
pub fn endpoint_url(base: &Url, path: &str, query: &[(&str, &str)]) -> Url {
  let mut url = base.clone();
  if let Ok(mut segments) = url.path_segments_mut() {
    segments
      .pop_if_empty()
      .extend(path.split('/').filter(|s| !s.is_empty()));
  }
  url.query_pairs_mut().clear().extend_pairs(query);
  url
}

/// Parse a response body into the expected shape.
pub fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
  Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_endpoint_url_joins_paths() {
    let base = Url::parse("https://hadeethenc.com/api/v1").unwrap();
    let url = endpoint_url(&base, "categories/roots", &[("language", "en")]);
    assert_eq!(
      url.as_str(),
      "https://hadeethenc.com/api/v1/categories/roots?language=en"
    );

    let base = Url::parse("https://hadeethenc.com/api/v1/").unwrap();
    let url = endpoint_url(&base, "/hadeeths/one", &[("language", "tr"), ("id", "55")]);
    assert_eq!(
      url.as_str(),
      "https://hadeethenc.com/api/v1/hadeeths/one?language=tr&id=55"
    );
  }

  #[test]
  fn test_endpoint_url_encodes_parameters() {
    let base = Url::parse("http://localhost:8080").unwrap();
    let url = endpoint_url(
      &base,
      "hadeeths/list",
      &[
        ("language", "ar"),
        ("category_id", "a b&c"),
        ("page", "2"),
        ("per_page", "20"),
      ],
    );
    assert_eq!(
      url.as_str(),
      "http://localhost:8080/hadeeths/list?language=ar&category_id=a+b%26c&page=2&per_page=20"
    );
  }

  #[test]
  fn test_decode_categories() {
    let body = r#"[{"id":"1","title":"Belief","hadeeths_count":"120","parent_id":null}]"#;
    let categories: Vec<Category> = decode_body(body).unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].title, "Belief");
  }

  #[test]
  fn test_decode_list_envelope() {
    let body = r#"{"data":[{"id":"9","title":"Mercy","translations":["en","tr"]}]}"#;
    let response: ApiHadeethListResponse = decode_body(body).unwrap();
    assert_eq!(response.data[0].id, "9");
    assert_eq!(response.data[0].translations, vec!["en", "tr"]);
  }

  #[test]
  fn test_decode_error_on_wrong_shape() {
    let err = decode_body::<Vec<Category>>(r#"{"message":"oops"}"#).unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));

    let err = decode_body::<Hadith>("<html>502</html>").unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
  }

  #[tokio::test]
  async fn test_unreachable_host_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HadeethClient {
      client: Client::new(),
      base_url: Url::parse(&format!("http://{}/api/v1", addr)).unwrap(),
    };
    let err = client.root_categories(Language::En).await.unwrap_err();
    assert!(err.is_network(), "{:?}", err);
  }

  /// Serve one raw HTTP response on a local port and return a client for it.
  async fn client_for_response(response: &'static str) -> HadeethClient {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      let (mut socket, _) = listener.accept().await.unwrap();
      let mut buf = [0u8; 1024];
      let _ = socket.read(&mut buf).await;
      socket.write_all(response.as_bytes()).await.unwrap();
      socket.shutdown().await.unwrap();
    });

    HadeethClient {
      client: Client::new(),
      base_url: Url::parse(&format!("http://{}/api/v1", addr)).unwrap(),
    }
  }

  #[tokio::test]
  async fn test_error_status_is_network_error() {
    let client = client_for_response(
      "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
    )
    .await;

    let err = client.root_categories(Language::En).await.unwrap_err();
    match &err {
      ApiError::Status { status, url } => {
        assert_eq!(*status, 500);
        assert!(url.ends_with("/api/v1/categories/roots?language=en"), "{}", url);
      }
      other => panic!("expected status error, got {:?}", other),
    }
    assert!(err.is_network());
  }

  #[tokio::test]
  async fn test_unparseable_body_is_decode_error() {
    let client = client_for_response(
      "HTTP/1.1 200 OK\r\ncontent-type: text/html\r\ncontent-length: 16\r\nconnection: close\r\n\r\n<html>502</html>",
    )
    .await;

    let err = client.root_categories(Language::En).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "{:?}", err);
    assert!(!err.is_network());
  }
}
