//! API clients for price, news and SMS providers
//!
//! Each provider sits behind a trait so the pipeline can be exercised
//! without network access.

pub mod alpha_vantage;
pub mod news_api;
pub mod twilio;

use async_trait::async_trait;
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{AlertError, Result};

pub use alpha_vantage::AlphaVantageClient;
pub use news_api::NewsApiClient;
pub use twilio::TwilioClient;

/// Daily closing prices for one symbol
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    pub symbol: String,
    /// Timezone the exchange's trading day is defined in
    pub time_zone: Tz,
    pub closes: BTreeMap<NaiveDate, f64>,
}

impl DailySeries {
    /// Closing price on `date`
    pub fn close_on(&self, date: NaiveDate) -> Result<f64> {
        self.closes
            .get(&date)
            .copied()
            .ok_or_else(|| AlertError::MissingClose {
                symbol: self.symbol.clone(),
                date,
            })
    }
}

/// News article as ranked by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: Option<String>,
    /// May contain HTML markup
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Status returned by the SMS provider for a submitted message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryStatus {
    pub sid: String,
    pub status: String,
}

/// Source of daily price series
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn daily_series(&self, symbol: &str) -> Result<DailySeries>;
}

/// Source of news articles
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// First `limit` articles matching `query`, in provider order
    async fn top_articles(&self, query: &str, limit: usize) -> Result<Vec<Article>>;
}

/// Outbound SMS gateway
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, from: &str, to: &str, body: &str) -> Result<DeliveryStatus>;
}

/// Turn an unsuccessful response into [`AlertError::Http`]
pub(crate) async fn check_status(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(AlertError::Http {
        provider,
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_on_missing_date() {
        let series = DailySeries {
            symbol: "TSLA".to_string(),
            time_zone: chrono_tz::US::Eastern,
            closes: BTreeMap::from([(NaiveDate::from_ymd_opt(2024, 6, 7).unwrap(), 100.0)]),
        };

        assert_eq!(
            series.close_on(NaiveDate::from_ymd_opt(2024, 6, 7).unwrap()).unwrap(),
            100.0
        );
        let err = series
            .close_on(NaiveDate::from_ymd_opt(2024, 6, 6).unwrap())
            .unwrap_err();
        assert!(matches!(err, AlertError::MissingClose { .. }));
    }

    #[test]
    fn test_article_accepts_null_fields() {
        let article: Article = serde_json::from_value(serde_json::json!({
            "title": null,
            "description": null,
            "url": "https://example.com/a"
        }))
        .unwrap();
        assert_eq!(article.title, None);
        assert_eq!(article.description, None);
        assert_eq!(article.url.as_deref(), Some("https://example.com/a"));
    }

    #[test]
    fn test_article_accepts_null_url() {
        let article: Article = serde_json::from_value(serde_json::json!({
            "title": "Wire story",
            "description": "Text",
            "url": null
        }))
        .unwrap();
        assert_eq!(article.url, None);
    }
}
