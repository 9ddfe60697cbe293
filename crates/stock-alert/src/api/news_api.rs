//! NewsAPI client for company headlines

use crate::api::{Article, NewsProvider, check_status};
use crate::error::{AlertError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

pub const BASE_URL: &str = "https://newsapi.org";

const PROVIDER: &str = "NewsAPI";

/// `/v2/everything` response body
#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    /// Decoded per article, after truncation
    #[serde(default)]
    articles: Vec<serde_json::Value>,
}

/// NewsAPI client
#[derive(Debug, Clone)]
pub struct NewsApiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl NewsApiClient {
    /// Create a new NewsAPI client against the public endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the client at a different host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Search all articles matching `query`, in provider ranking order
    ///
    /// # Arguments
    /// * `query` - Free-text query, e.g. a company name
    pub async fn everything(&self, query: &str) -> Result<Vec<Article>> {
        self.search(query, None).await
    }

    async fn search(&self, query: &str, limit: Option<usize>) -> Result<Vec<Article>> {
        tracing::debug!(query, ?limit, "Searching news");

        let response = self
            .client
            .get(format!("{}/v2/everything", self.base_url))
            .query(&[("q", query), ("apiKey", self.api_key.as_str())])
            .send()
            .await?;
        let response = check_status(PROVIDER, response).await?;

        let raw = response.text().await?;
        parse_articles(&raw, limit)
    }
}

/// Decode the first `limit` articles of an `/v2/everything` body.
///
/// Articles past the limit are never inspected, so a malformed entry the
/// caller would not use cannot fail the request.
fn parse_articles(raw: &str, limit: Option<usize>) -> Result<Vec<Article>> {
    let mut body: EverythingResponse = serde_json::from_str(raw)?;
    if body.status != "ok" {
        return Err(AlertError::Api {
            provider: PROVIDER,
            message: body.message.unwrap_or(body.status),
        });
    }

    if let Some(limit) = limit {
        body.articles.truncate(limit);
    }

    body.articles
        .into_iter()
        .map(|article| serde_json::from_value(article).map_err(AlertError::from))
        .collect()
}

#[async_trait]
impl NewsProvider for NewsApiClient {
    async fn top_articles(&self, query: &str, limit: usize) -> Result<Vec<Article>> {
        self.search(query, Some(limit)).await
    }
}
