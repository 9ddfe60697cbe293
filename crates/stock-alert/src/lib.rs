//! Daily stock alerts by SMS
//!
//! For each stock on a watchlist this crate:
//!
//! - resolves the last two trading days in the stock's market timezone
//! - fetches daily closes from Alpha Vantage and computes the percentage change
//! - fetches the top headlines for the company from NewsAPI
//! - composes a plain-text summary and sends it through Twilio
//!
//! # Example
//!
//! ```rust,ignore
//! use alert_utils::ProcessEnv;
//! use stock_alert::{AlertConfig, AlertPipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AlertConfig::from_env(&ProcessEnv)?;
//!     let report = AlertPipeline::from_config(&config).run().await?;
//!     println!("{} alerts sent", report.delivered.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod change;
pub mod config;
pub mod error;
pub mod market_day;
pub mod message;
pub mod notifier;
pub mod pipeline;

// Re-export main types for convenience
pub use api::{Article, DailySeries, DeliveryStatus, NewsProvider, PriceProvider, SmsSender};
pub use change::{PriceChange, PriceChangeCalculator, percent_change};
pub use config::{AlertConfig, FailurePolicy, WatchEntry};
pub use error::{AlertError, Result};
pub use market_day::{Clock, FixedClock, SystemClock, trading_day_before};
pub use message::compose;
pub use notifier::Notifier;
pub use pipeline::{AlertPipeline, RunReport, SymbolOutcome};
