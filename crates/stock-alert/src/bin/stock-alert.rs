//! Stock alert runner
//!
//! Sends one SMS per watched stock with yesterday's move and the top
//! headlines, then exits.
//!
//! # Usage
//!
//! ```bash
//! export ALPHA_VANTAGE_API_KEY=...
//! export NEWS_API_KEY=...
//! export TWILIO_ACCOUNT_SID=... TWILIO_AUTH_TOKEN=...
//! export TWILIO_SENDER_NUMBER=+1... TWILIO_RECEIVER_NUMBER=+1...
//!
//! cargo run --bin stock-alert -p stock-alert
//! ```

use alert_utils::ProcessEnv;
use anyhow::Context;
use stock_alert::message::format_change;
use stock_alert::{AlertConfig, AlertPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = alert_utils::load_dotenv();
    alert_utils::init_tracing();
    match dotenv {
        Ok(Some(path)) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env"),
    }

    let config = AlertConfig::from_env(&ProcessEnv).context("invalid configuration")?;
    tracing::debug!(?config, "Loaded configuration");

    let report = match AlertPipeline::from_config(&config).run().await {
        Ok(report) => report,
        Err(e) if e.is_auth_failure() => {
            return Err(e).context("provider rejected credentials, check the API keys");
        }
        Err(e) => return Err(e.into()),
    };

    for outcome in &report.delivered {
        let status = outcome
            .delivery
            .as_ref()
            .map_or("not sent", |d| d.status.as_str());
        println!(
            "{}: {}% ({status})",
            outcome.entry.symbol,
            format_change(outcome.change.percent)
        );
    }

    if !report.is_success() {
        for failure in &report.failed {
            eprintln!("{}: {}", failure.entry.symbol, failure.error);
        }
        anyhow::bail!("{} of the watchlist symbols failed", report.failed.len());
    }

    Ok(())
}
