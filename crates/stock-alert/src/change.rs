//! Day-over-day price change

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

use crate::api::PriceProvider;
use crate::error::{AlertError, Result};
use crate::market_day::{Clock, DAY_BEFORE_YESTERDAY, YESTERDAY, market_now, trading_day_before};

/// Closing price on a trading day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Close {
    pub date: NaiveDate,
    pub price: f64,
}

/// Change between the last two trading days' closes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceChange {
    pub symbol: String,
    pub latest: Close,
    pub previous: Close,
    /// Percent of the latest close, rounded to two decimals
    pub percent: f64,
}

/// Percentage change from `previous` to `latest`, relative to `latest`.
///
/// Fails when `latest` is zero or either close is not finite.
pub fn percent_change(latest: f64, previous: f64) -> Result<f64> {
    if latest == 0.0 || !latest.is_finite() || !previous.is_finite() {
        return Err(AlertError::InvalidPrice(format!(
            "cannot compute change from {previous} to {latest}"
        )));
    }
    Ok(round2((latest - previous) * 100.0 / latest))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Computes [`PriceChange`] from a provider's daily series
pub struct PriceChangeCalculator {
    provider: Arc<dyn PriceProvider>,
    clock: Arc<dyn Clock>,
}

impl PriceChangeCalculator {
    pub fn new(provider: Arc<dyn PriceProvider>, clock: Arc<dyn Clock>) -> Self {
        Self { provider, clock }
    }

    /// Fetch `symbol`'s series and compare yesterday's close with the day before
    pub async fn change_for(&self, symbol: &str) -> Result<PriceChange> {
        let series = self.provider.daily_series(symbol).await?;

        let now = market_now(self.clock.as_ref(), &series.time_zone);
        let latest_date = trading_day_before(&now, YESTERDAY)?;
        let previous_date = trading_day_before(&now, DAY_BEFORE_YESTERDAY)?;

        let latest = Close {
            date: latest_date,
            price: series.close_on(latest_date)?,
        };
        let previous = Close {
            date: previous_date,
            price: series.close_on(previous_date)?,
        };
        let percent = percent_change(latest.price, previous.price).map_err(|_| {
            AlertError::InvalidPrice(format!(
                "{symbol} on {}: close {} cannot be compared with {}",
                latest.date, latest.price, previous.price
            ))
        })?;

        tracing::info!(
            symbol,
            latest = %latest.date,
            previous = %previous.date,
            percent,
            "Computed price change"
        );

        Ok(PriceChange {
            symbol: symbol.to_string(),
            latest,
            previous,
            percent,
        })
    }
}
