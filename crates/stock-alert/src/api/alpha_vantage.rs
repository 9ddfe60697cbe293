//! Alpha Vantage API client

use crate::api::{DailySeries, PriceProvider, check_status};
use crate::error::{AlertError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use chrono_tz::Tz;
use reqwest::Client;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

pub const BASE_URL: &str = "https://www.alphavantage.co";

const PROVIDER: &str = "Alpha Vantage";

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct DailyResponse {
    #[serde(rename = "Meta Data")]
    meta: MetaData,
    #[serde(rename = "Time Series (Daily)")]
    series: BTreeMap<String, DailyBar>,
}

#[derive(Debug, Deserialize)]
struct MetaData {
    #[serde(rename = "5. Time Zone")]
    time_zone: String,
}

#[derive(Debug, Deserialize)]
struct DailyBar {
    #[serde(rename = "4. close")]
    close: String,
}

impl AlphaVantageClient {
    /// Create a new Alpha Vantage client against the public endpoint
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

    /// Get daily time series data
    pub async fn get_daily(&self, symbol: &str) -> Result<DailySeries> {
        let mut params = HashMap::new();
        params.insert("function", "TIME_SERIES_DAILY");
        params.insert("symbol", symbol);
        params.insert("apikey", &self.api_key);

        tracing::debug!(symbol, "Requesting daily series");
        let response = self
            .client
            .get(format!("{}/query", self.base_url))
            .query(&params)
            .send()
            .await?;
        let response = check_status(PROVIDER, response).await?;

        let raw = response.text().await?;
        tracing::info!(symbol, response = %raw, "Daily series payload");

        parse_daily(symbol, &raw)
    }
}

#[async_trait]
impl PriceProvider for AlphaVantageClient {
    async fn daily_series(&self, symbol: &str) -> Result<DailySeries> {
        self.get_daily(symbol).await
    }
}

fn parse_daily(symbol: &str, raw: &str) -> Result<DailySeries> {
    let data: serde_json::Value = serde_json::from_str(raw)?;

    // Alpha Vantage reports errors and throttling with HTTP 200
    for key in ["Error Message", "Note", "Information"] {
        if let Some(message) = data.get(key) {
            return Err(AlertError::Api {
                provider: PROVIDER,
                message: message.as_str().unwrap_or_default().to_string(),
            });
        }
    }

    let response: DailyResponse = serde_json::from_value(data)?;

    let time_zone: Tz = response
        .meta
        .time_zone
        .parse()
        .map_err(|_| AlertError::InvalidTimezone(response.meta.time_zone.clone()))?;

    let mut closes = BTreeMap::new();
    for (day, bar) in response.series {
        let date = NaiveDate::parse_from_str(&day, "%Y-%m-%d").map_err(|e| AlertError::Api {
            provider: PROVIDER,
            message: format!("bad date key {day:?}: {e}"),
        })?;
        let close = bar.close.parse::<f64>().map_err(|e| AlertError::Api {
            provider: PROVIDER,
            message: format!("bad close {:?} on {day}: {e}", bar.close),
        })?;
        closes.insert(date, close);
    }

    Ok(DailySeries {
        symbol: symbol.to_string(),
        time_zone,
        closes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "Meta Data": {
            "1. Information": "Daily Prices (open, high, low, close) and Volumes",
            "2. Symbol": "TSLA",
            "3. Last Refreshed": "2024-06-10",
            "4. Output Size": "Compact",
            "5. Time Zone": "US/Eastern"
        },
        "Time Series (Daily)": {
            "2024-06-10": {"1. open": "176.06", "2. high": "178.57", "3. low": "173.17", "4. close": "173.79", "5. volume": "50869684"},
            "2024-06-07": {"1. open": "176.13", "2. high": "179.35", "3. low": "175.58", "4. close": "177.48", "5. volume": "56244929"}
        }
    }"#;

    #[test]
    fn test_client_creation() {
        let client = AlphaVantageClient::new("test_key").with_base_url("http://localhost:9/");
        assert_eq!(client.api_key, "test_key");
        assert_eq!(client.base_url, "http://localhost:9");
    }

    #[test]
    fn test_parse_daily() {
        let series = parse_daily("TSLA", SAMPLE).unwrap();
        assert_eq!(series.symbol, "TSLA");
        assert_eq!(series.time_zone, chrono_tz::US::Eastern);
        assert_eq!(series.closes.len(), 2);
        assert_eq!(
            series.close_on(NaiveDate::from_ymd_opt(2024, 6, 7).unwrap()).unwrap(),
            177.48
        );
    }

    #[test]
    fn test_parse_in_band_error() {
        let raw = r#"{"Error Message": "Invalid API call."}"#;
        let err = parse_daily("NOPE", raw).unwrap_err();
        assert!(matches!(err, AlertError::Api { .. }));
        assert!(err.to_string().contains("Invalid API call."));
    }

    #[test]
    fn test_parse_rate_limit_note() {
        let raw = r#"{"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute"}"#;
        assert!(matches!(
            parse_daily("TSLA", raw).unwrap_err(),
            AlertError::Api { .. }
        ));
    }

    #[test]
    fn test_parse_unknown_timezone() {
        let raw = r#"{
            "Meta Data": {"5. Time Zone": "Mars/Olympus"},
            "Time Series (Daily)": {}
        }"#;
        assert!(matches!(
            parse_daily("TSLA", raw).unwrap_err(),
            AlertError::InvalidTimezone(_)
        ));
    }
}
