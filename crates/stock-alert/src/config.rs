//! Configuration for stock alert runs

use alert_utils::EnvSource;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::api::{alpha_vantage, news_api, twilio};
use crate::error::{AlertError, Result};

/// A watched ticker and the company name used for news searches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchEntry {
    pub symbol: String,
    pub company: String,
}

impl WatchEntry {
    pub fn new(symbol: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            company: company.into(),
        }
    }
}

/// Watchlist used when none is configured
pub fn default_watchlist() -> Vec<WatchEntry> {
    vec![
        WatchEntry::new("TSLA", "Tesla Inc"),
        WatchEntry::new("FB", "Facebook Inc"),
        WatchEntry::new("SIEGY", "SIEMENS AG"),
        WatchEntry::new("AAPL", "Apple Inc"),
        WatchEntry::new("AMZN", "Amazon.com Inc"),
    ]
}

/// Parse `SYMBOL=Company;SYMBOL=Company`
pub fn parse_watchlist(spec: &str) -> Result<Vec<WatchEntry>> {
    let mut entries = Vec::new();
    for item in spec.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let (symbol, company) = item
            .split_once('=')
            .map(|(s, c)| (s.trim(), c.trim()))
            .filter(|(s, c)| !s.is_empty() && !c.is_empty())
            .ok_or_else(|| {
                AlertError::Config(format!("watchlist entry {item:?} is not SYMBOL=Company"))
            })?;
        entries.push(WatchEntry::new(symbol.to_uppercase(), company));
    }
    Ok(entries)
}

/// What to do when one symbol fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the run at the first failing symbol
    #[default]
    Abort,
    /// Log the failure and carry on with the rest of the watchlist
    Continue,
}

impl FromStr for FailurePolicy {
    type Err = AlertError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "continue" => Ok(Self::Continue),
            other => Err(AlertError::Config(format!(
                "unknown failure policy {other:?}, expected abort or continue"
            ))),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => f.write_str("abort"),
            Self::Continue => f.write_str("continue"),
        }
    }
}

/// Configuration for a stock alert run
#[derive(Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Symbols to report on, in order
    pub watchlist: Vec<WatchEntry>,

    /// Per-symbol failure handling
    pub failure_policy: FailurePolicy,

    /// Alpha Vantage API key
    pub alpha_vantage_api_key: String,

    /// NewsAPI key
    pub news_api_key: String,

    /// Twilio account SID
    pub twilio_account_sid: String,

    /// Twilio auth token
    pub twilio_auth_token: String,

    /// Number messages are sent from
    pub sender_number: String,

    /// Number messages are sent to
    pub receiver_number: String,

    pub alpha_vantage_base_url: String,
    pub news_api_base_url: String,
    pub twilio_base_url: String,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            watchlist: default_watchlist(),
            failure_policy: FailurePolicy::Abort,
            alpha_vantage_api_key: String::new(),
            news_api_key: String::new(),
            twilio_account_sid: String::new(),
            twilio_auth_token: String::new(),
            sender_number: String::new(),
            receiver_number: String::new(),
            alpha_vantage_base_url: alpha_vantage::BASE_URL.to_string(),
            news_api_base_url: news_api::BASE_URL.to_string(),
            twilio_base_url: twilio::BASE_URL.to_string(),
        }
    }
}

// Keep secrets out of logs
impl fmt::Debug for AlertConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertConfig")
            .field("watchlist", &self.watchlist)
            .field("failure_policy", &self.failure_policy)
            .field("sender_number", &self.sender_number)
            .field("receiver_number", &self.receiver_number)
            .field("alpha_vantage_base_url", &self.alpha_vantage_base_url)
            .field("news_api_base_url", &self.news_api_base_url)
            .field("twilio_base_url", &self.twilio_base_url)
            .finish_non_exhaustive()
    }
}

impl AlertConfig {
    /// Create a new configuration builder
    pub fn builder() -> AlertConfigBuilder {
        AlertConfigBuilder::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Credentials are not checked here; a missing key shows up as an
    /// authentication failure from the provider that needs it.
    pub fn from_env(env: &impl EnvSource) -> Result<Self> {
        let mut builder = Self::builder()
            .alpha_vantage_api_key(env.var_or("ALPHA_VANTAGE_API_KEY", ""))
            .news_api_key(env.var_or("NEWS_API_KEY", ""))
            .twilio_credentials(
                env.var_or("TWILIO_ACCOUNT_SID", ""),
                env.var_or("TWILIO_AUTH_TOKEN", ""),
            )
            .sender_number(env.var_or("TWILIO_SENDER_NUMBER", ""))
            .receiver_number(env.var_or("TWILIO_RECEIVER_NUMBER", ""));

        if let Some(spec) = env.var("STOCK_ALERT_WATCHLIST") {
            builder = builder.watchlist(parse_watchlist(&spec)?);
        }
        if let Some(policy) = env.var("STOCK_ALERT_FAILURE_POLICY") {
            builder = builder.failure_policy(policy.parse()?);
        }
        if let Some(url) = env.var("ALPHA_VANTAGE_BASE_URL") {
            builder = builder.alpha_vantage_base_url(url);
        }
        if let Some(url) = env.var("NEWS_API_BASE_URL") {
            builder = builder.news_api_base_url(url);
        }
        if let Some(url) = env.var("TWILIO_BASE_URL") {
            builder = builder.twilio_base_url(url);
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.watchlist.is_empty() {
            return Err(AlertError::Config("watchlist is empty".to_string()));
        }

        let mut seen = HashSet::new();
        for entry in &self.watchlist {
            if !seen.insert(entry.symbol.as_str()) {
                return Err(AlertError::Config(format!(
                    "symbol {} appears more than once in the watchlist",
                    entry.symbol
                )));
            }
        }

        Ok(())
    }
}

/// Builder for AlertConfig
#[derive(Debug, Default)]
pub struct AlertConfigBuilder {
    watchlist: Option<Vec<WatchEntry>>,
    failure_policy: Option<FailurePolicy>,
    alpha_vantage_api_key: Option<String>,
    news_api_key: Option<String>,
    twilio_account_sid: Option<String>,
    twilio_auth_token: Option<String>,
    sender_number: Option<String>,
    receiver_number: Option<String>,
    alpha_vantage_base_url: Option<String>,
    news_api_base_url: Option<String>,
    twilio_base_url: Option<String>,
}

impl AlertConfigBuilder {
    /// Set the watchlist
    pub fn watchlist(mut self, watchlist: Vec<WatchEntry>) -> Self {
        self.watchlist = Some(watchlist);
        self
    }

    /// Append one watchlist entry
    pub fn watch(mut self, symbol: impl Into<String>, company: impl Into<String>) -> Self {
        self.watchlist
            .get_or_insert_with(Vec::new)
            .push(WatchEntry::new(symbol, company));
        self
    }

    /// Set the failure policy
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = Some(policy);
        self
    }

    /// Set Alpha Vantage API key
    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    /// Set NewsAPI key
    pub fn news_api_key(mut self, key: impl Into<String>) -> Self {
        self.news_api_key = Some(key.into());
        self
    }

    /// Set Twilio account SID and auth token
    pub fn twilio_credentials(
        mut self,
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Self {
        self.twilio_account_sid = Some(account_sid.into());
        self.twilio_auth_token = Some(auth_token.into());
        self
    }

    /// Set the sending number
    pub fn sender_number(mut self, number: impl Into<String>) -> Self {
        self.sender_number = Some(number.into());
        self
    }

    /// Set the receiving number
    pub fn receiver_number(mut self, number: impl Into<String>) -> Self {
        self.receiver_number = Some(number.into());
        self
    }

    pub fn alpha_vantage_base_url(mut self, url: impl Into<String>) -> Self {
        self.alpha_vantage_base_url = Some(url.into());
        self
    }

    pub fn news_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.news_api_base_url = Some(url.into());
        self
    }

    pub fn twilio_base_url(mut self, url: impl Into<String>) -> Self {
        self.twilio_base_url = Some(url.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AlertConfig> {
        let defaults = AlertConfig::default();

        let config = AlertConfig {
            watchlist: self.watchlist.unwrap_or(defaults.watchlist),
            failure_policy: self.failure_policy.unwrap_or(defaults.failure_policy),
            alpha_vantage_api_key: self.alpha_vantage_api_key.unwrap_or_default(),
            news_api_key: self.news_api_key.unwrap_or_default(),
            twilio_account_sid: self.twilio_account_sid.unwrap_or_default(),
            twilio_auth_token: self.twilio_auth_token.unwrap_or_default(),
            sender_number: self.sender_number.unwrap_or_default(),
            receiver_number: self.receiver_number.unwrap_or_default(),
            alpha_vantage_base_url: self
                .alpha_vantage_base_url
                .unwrap_or(defaults.alpha_vantage_base_url),
            news_api_base_url: self.news_api_base_url.unwrap_or(defaults.news_api_base_url),
            twilio_base_url: self.twilio_base_url.unwrap_or(defaults.twilio_base_url),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alert_utils::MapEnv;

    #[test]
    fn test_default_config() {
        let config = AlertConfig::default();
        assert_eq!(config.watchlist.len(), 5);
        assert_eq!(config.watchlist[0], WatchEntry::new("TSLA", "Tesla Inc"));
        assert_eq!(config.failure_policy, FailurePolicy::Abort);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = AlertConfig::builder()
            .watch("TSLA", "Tesla Inc")
            .failure_policy(FailurePolicy::Continue)
            .sender_number("+15550000000")
            .build()
            .unwrap();

        assert_eq!(config.watchlist, vec![WatchEntry::new("TSLA", "Tesla Inc")]);
        assert_eq!(config.failure_policy, FailurePolicy::Continue);
        assert_eq!(config.sender_number, "+15550000000");
        assert_eq!(config.twilio_base_url, twilio::BASE_URL);
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let result = AlertConfig::builder()
            .watch("TSLA", "Tesla Inc")
            .watch("TSLA", "Tesla Motors")
            .build();
        assert!(matches!(result, Err(AlertError::Config(_))));
    }

    #[test]
    fn test_empty_watchlist_rejected() {
        assert!(AlertConfig::builder().watchlist(Vec::new()).build().is_err());
    }

    #[test]
    fn test_parse_watchlist() {
        let entries = parse_watchlist(" tsla = Tesla Inc ; AMZN=Amazon.com Inc;").unwrap();
        assert_eq!(
            entries,
            vec![
                WatchEntry::new("TSLA", "Tesla Inc"),
                WatchEntry::new("AMZN", "Amazon.com Inc"),
            ]
        );
    }

    #[test]
    fn test_parse_watchlist_malformed() {
        assert!(parse_watchlist("TSLA").is_err());
        assert!(parse_watchlist("=Tesla Inc").is_err());
        assert!(parse_watchlist("TSLA=").is_err());
    }

    #[test]
    fn test_failure_policy_parse() {
        assert_eq!("Continue".parse::<FailurePolicy>().unwrap(), FailurePolicy::Continue);
        assert_eq!("abort".parse::<FailurePolicy>().unwrap(), FailurePolicy::Abort);
        assert!("retry".parse::<FailurePolicy>().is_err());
    }

    #[test]
    fn test_from_env() {
        let env = MapEnv::new()
            .with("ALPHA_VANTAGE_API_KEY", "av")
            .with("NEWS_API_KEY", "news")
            .with("TWILIO_ACCOUNT_SID", "AC1")
            .with("TWILIO_AUTH_TOKEN", "token")
            .with("TWILIO_SENDER_NUMBER", "+15550000000")
            .with("TWILIO_RECEIVER_NUMBER", "+15551111111")
            .with("STOCK_ALERT_WATCHLIST", "AAPL=Apple Inc")
            .with("STOCK_ALERT_FAILURE_POLICY", "continue")
            .with("NEWS_API_BASE_URL", "http://localhost:1234");

        let config = AlertConfig::from_env(&env).unwrap();
        assert_eq!(config.alpha_vantage_api_key, "av");
        assert_eq!(config.twilio_account_sid, "AC1");
        assert_eq!(config.receiver_number, "+15551111111");
        assert_eq!(config.watchlist, vec![WatchEntry::new("AAPL", "Apple Inc")]);
        assert_eq!(config.failure_policy, FailurePolicy::Continue);
        assert_eq!(config.news_api_base_url, "http://localhost:1234");
        assert_eq!(config.alpha_vantage_base_url, alpha_vantage::BASE_URL);
    }

    #[test]
    fn test_from_env_missing_keys_is_not_an_error() {
        let config = AlertConfig::from_env(&MapEnv::new()).unwrap();
        assert!(config.alpha_vantage_api_key.is_empty());
        assert_eq!(config.watchlist, default_watchlist());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = AlertConfig::builder()
            .twilio_credentials("AC1", "super-secret")
            .build()
            .unwrap();
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
