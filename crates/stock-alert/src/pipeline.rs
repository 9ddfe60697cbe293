//! Watchlist run: price change, headlines, message, SMS

use std::sync::Arc;

use crate::api::{
    AlphaVantageClient, DeliveryStatus, NewsApiClient, NewsProvider, PriceProvider, SmsSender,
    TwilioClient,
};
use crate::change::{PriceChange, PriceChangeCalculator};
use crate::config::{AlertConfig, FailurePolicy, WatchEntry};
use crate::error::{AlertError, Result};
use crate::market_day::{Clock, SystemClock};
use crate::message::compose;
use crate::notifier::Notifier;

/// Articles included per alert
pub const HEADLINE_LIMIT: usize = 3;

/// What happened for one watchlist entry
#[derive(Debug)]
pub struct SymbolOutcome {
    pub entry: WatchEntry,
    pub change: PriceChange,
    pub message: String,
    /// `None` when there was nothing to send
    pub delivery: Option<DeliveryStatus>,
}

/// A symbol that failed under [`FailurePolicy::Continue`]
#[derive(Debug)]
pub struct SymbolFailure {
    pub entry: WatchEntry,
    pub error: AlertError,
}

/// Result of a whole run
#[derive(Debug, Default)]
pub struct RunReport {
    pub delivered: Vec<SymbolOutcome>,
    pub failed: Vec<SymbolFailure>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs the alert for every watchlist entry in order
pub struct AlertPipeline {
    watchlist: Vec<WatchEntry>,
    policy: FailurePolicy,
    calculator: PriceChangeCalculator,
    news: Arc<dyn NewsProvider>,
    notifier: Notifier,
}

impl AlertPipeline {
    /// Assemble a pipeline from explicit providers
    pub fn new(
        config: &AlertConfig,
        prices: Arc<dyn PriceProvider>,
        news: Arc<dyn NewsProvider>,
        sms: Arc<dyn SmsSender>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            watchlist: config.watchlist.clone(),
            policy: config.failure_policy,
            calculator: PriceChangeCalculator::new(prices, clock),
            news,
            notifier: Notifier::new(sms, &config.sender_number, &config.receiver_number),
        }
    }

    /// Pipeline backed by Alpha Vantage, NewsAPI, Twilio and the system clock
    pub fn from_config(config: &AlertConfig) -> Self {
        let prices = AlphaVantageClient::new(&config.alpha_vantage_api_key)
            .with_base_url(&config.alpha_vantage_base_url);
        let news =
            NewsApiClient::new(&config.news_api_key).with_base_url(&config.news_api_base_url);
        let sms = TwilioClient::new(&config.twilio_account_sid, &config.twilio_auth_token)
            .with_base_url(&config.twilio_base_url);

        Self::new(
            config,
            Arc::new(prices),
            Arc::new(news),
            Arc::new(sms),
            Arc::new(SystemClock),
        )
    }

    /// Process the whole watchlist.
    ///
    /// Under [`FailurePolicy::Abort`] the first error is returned and the
    /// remaining symbols are skipped.
    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!(
            symbols = self.watchlist.len(),
            policy = %self.policy,
            "Starting alert run"
        );

        let mut report = RunReport::default();
        for entry in &self.watchlist {
            match self.process(entry).await {
                Ok(outcome) => report.delivered.push(outcome),
                Err(error) => match self.policy {
                    FailurePolicy::Abort => {
                        tracing::error!(symbol = %entry.symbol, error = %error, "Aborting run");
                        return Err(error);
                    }
                    FailurePolicy::Continue => {
                        tracing::warn!(symbol = %entry.symbol, error = %error, "Skipping symbol");
                        report.failed.push(SymbolFailure {
                            entry: entry.clone(),
                            error,
                        });
                    }
                },
            }
        }

        tracing::info!(
            delivered = report.delivered.len(),
            failed = report.failed.len(),
            "Alert run finished"
        );
        Ok(report)
    }

    /// Run one entry end to end
    pub async fn process(&self, entry: &WatchEntry) -> Result<SymbolOutcome> {
        let change = self.calculator.change_for(&entry.symbol).await?;
        let articles = self.news.top_articles(&entry.company, HEADLINE_LIMIT).await?;
        let message = compose(change.percent, &articles, &entry.company);
        let delivery = self.notifier.notify(&message).await?;

        Ok(SymbolOutcome {
            entry: entry.clone(),
            change,
            message,
            delivery,
        })
    }
}
