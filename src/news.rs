use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::config::NewsConfig;

#[derive(Error, Debug)]
pub enum NewsError {
  #[error("Network error: {0}")]
  ReqwestError(#[from] reqwest::Error),

  #[error("Invalid endpoint: {0}")]
  InvalidEndpoint(String),

  #[error("Malformed response: {0}")]
  JsonError(#[from] serde_json::Error),

  #[error("News API error ({code}): {message}")]
  Api { code: String, message: String },

  #[error("No API key configured, set news.api_key or NUUSVOER_NEWS__API_KEY")]
  MissingApiKey,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Source {
  pub id: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub name: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
  #[serde(default, deserialize_with = "null_as_default")]
  pub title: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub source: Source,
  pub author: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub url: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub published_at: String,
}

/// Feeds leave fields out or set them to `null`; both read as the default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Article {
  pub fn source_label(&self) -> &str {
    if self.source.name.trim().is_empty() {
      "Unknown Source"
    } else {
      &self.source.name
    }
  }

  pub fn author_label(&self) -> &str {
    match self.author.as_deref() {
      Some(author) if !author.trim().is_empty() => author,
      _ => "Unknown Author",
    }
  }

  pub fn published(&self) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&self.published_at).ok().map(|date| date.with_timezone(&Utc))
  }

  /// Publication date as `10 Sep 2024`.
  pub fn published_label(&self) -> String {
    match self.published() {
      Some(date) => date.format("%d %b %Y").to_string(),
      None => "Invalid Date".to_string(),
    }
  }

  fn sanitize(mut self) -> Self {
    self.title = strip_ansi_escapes::strip_str(&self.title);
    self.source.name = strip_ansi_escapes::strip_str(&self.source.name);
    self.author = self.author.map(|author| strip_ansi_escapes::strip_str(author));
    self
  }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeadlinesResponse {
  status: String,
  #[serde(default)]
  articles: Vec<Article>,
  code: Option<String>,
  message: Option<String>,
}

/// Parses a top-headlines response body into articles.
pub fn parse_headlines(body: &str) -> Result<Vec<Article>, NewsError> {
  let response: HeadlinesResponse = serde_json::from_str(body)?;
  if response.status != "ok" {
    return Err(NewsError::Api {
      code: response.code.unwrap_or_else(|| response.status.clone()),
      message: response.message.unwrap_or_default(),
    });
  }
  Ok(response.articles.into_iter().map(Article::sanitize).collect())
}

#[derive(Clone)]
pub struct NewsClient {
  client: Client,
  config: NewsConfig,
}

impl NewsClient {
  pub fn new(config: NewsConfig) -> Result<Self, NewsError> {
    let client = Client::builder().user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))).build()?;
    Ok(Self { client, config })
  }

  pub fn headlines_url(&self) -> Result<Url, NewsError> {
    let api_key = self.config.api_key.as_deref().filter(|key| !key.is_empty()).ok_or(NewsError::MissingApiKey)?;
    let url = Url::parse_with_params(&self.config.endpoint, &[("country", self.config.country.as_str()), ("apiKey", api_key)])
      .map_err(|e| NewsError::InvalidEndpoint(e.to_string()))?;
    Ok(url)
  }

  pub async fn top_headlines(&self) -> Result<Vec<Article>, NewsError> {
    let url = self.headlines_url()?;
    log::info!("Fetching headlines for country {}", self.config.country);
    // The API reports its own failures in the JSON body, so the status code is not checked.
    let body = self.client.get(url).send().await?.text().await?;
    let articles = parse_headlines(&body)?;
    log::info!("Fetched {} articles", articles.len());
    Ok(articles)
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  const RESPONSE: &str = r#"{
    "status": "ok",
    "totalResults": 2,
    "articles": [
      {
        "source": { "id": null, "name": "The Hindu" },
        "author": "Staff Reporter",
        "title": "Monsoon arrives early",
        "description": "ignored",
        "url": "https://example.com/monsoon",
        "urlToImage": null,
        "publishedAt": "2024-09-10T05:30:00Z",
        "content": null
      },
      {
        "source": { "id": "bbc-news", "name": "" },
        "author": null,
        "title": "\u001b[31mRed\u001b[0m headline",
        "url": "https://example.com/red",
        "publishedAt": "not a date"
      }
    ]
  }"#;

  fn config(api_key: Option<&str>) -> NewsConfig {
    NewsConfig { api_key: api_key.map(str::to_string), ..NewsConfig::default() }
  }

  #[test]
  fn parses_articles() {
    let articles = parse_headlines(RESPONSE).unwrap();
    assert_eq!(articles.len(), 2);

    let first = &articles[0];
    assert_eq!(first.title, "Monsoon arrives early");
    assert_eq!(first.source, Source { id: None, name: "The Hindu".to_string() });
    assert_eq!(first.source_label(), "The Hindu");
    assert_eq!(first.author_label(), "Staff Reporter");
    assert_eq!(first.published_label(), "10 Sep 2024");
  }

  #[test]
  fn missing_fields_fall_back_to_labels() {
    let articles = parse_headlines(RESPONSE).unwrap();
    let second = &articles[1];
    assert_eq!(second.title, "Red headline");
    assert_eq!(second.source_label(), "Unknown Source");
    assert_eq!(second.author_label(), "Unknown Author");
    assert_eq!(second.published_label(), "Invalid Date");
  }

  #[test]
  fn incomplete_articles_still_load() {
    let body = r#"{
      "status": "ok",
      "articles": [
        { "source": null, "author": null, "title": null, "url": "https://example.com/a", "publishedAt": null },
        { "source": { "id": null, "name": null }, "title": "Missing link" },
        { "source": { "name": "Reuters" }, "title": "Complete", "url": "https://example.com/c", "publishedAt": "2024-09-11T08:00:00Z" }
      ]
    }"#;
    let articles = parse_headlines(body).unwrap();
    assert_eq!(articles.len(), 3);

    assert_eq!(articles[0].title, "");
    assert_eq!(articles[0].url, "https://example.com/a");
    assert_eq!(articles[0].source_label(), "Unknown Source");
    assert_eq!(articles[0].published_label(), "Invalid Date");

    assert_eq!(articles[1].title, "Missing link");
    assert_eq!(articles[1].url, "");
    assert_eq!(articles[1].source_label(), "Unknown Source");

    assert_eq!(articles[2].source_label(), "Reuters");
    assert_eq!(articles[2].published_label(), "11 Sep 2024");
  }

  #[test]
  fn api_errors_are_reported() {
    let body = r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid."}"#;
    match parse_headlines(body) {
      Err(NewsError::Api { code, message }) => {
        assert_eq!(code, "apiKeyInvalid");
        assert_eq!(message, "Your API key is invalid.");
      },
      other => panic!("unexpected result: {other:?}"),
    }
  }

  #[test]
  fn garbage_is_a_json_error() {
    assert!(matches!(parse_headlines("<html>"), Err(NewsError::JsonError(_))));
  }

  #[test]
  fn headlines_url_carries_country_and_key() {
    let client = NewsClient::new(config(Some("secret"))).unwrap();
    let url = client.headlines_url().unwrap();
    assert_eq!(url.as_str(), "https://newsapi.org/v2/top-headlines?country=in&apiKey=secret");
  }

  #[test]
  fn headlines_url_requires_a_key() {
    let client = NewsClient::new(config(None)).unwrap();
    assert!(matches!(client.headlines_url(), Err(NewsError::MissingApiKey)));

    let client = NewsClient::new(config(Some(""))).unwrap();
    assert!(matches!(client.headlines_url(), Err(NewsError::MissingApiKey)));
  }
}
