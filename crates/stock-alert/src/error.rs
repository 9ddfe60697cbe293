//! Error types for stock alert operations

use chrono::NaiveDate;
use thiserror::Error;

/// Stock alert specific errors
#[derive(Debug, Error)]
pub enum AlertError {
    /// Provider answered with an unsuccessful HTTP status
    #[error("{provider} HTTP error {status}: {body}")]
    Http {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// Provider reported an error inside a successful response
    #[error("{provider} error: {message}")]
    Api {
        provider: &'static str,
        message: String,
    },

    /// Network or transport error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A resolved trading day has no entry in the price series
    #[error("No closing price for {symbol} on {date}")]
    MissingClose { symbol: String, date: NaiveDate },

    /// Closing price that cannot be used in a calculation
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Market timezone reported by the provider is not a known IANA name
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Argument outside its accepted range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for stock alert operations
pub type Result<T> = std::result::Result<T, AlertError>;

impl AlertError {
    /// Whether the provider rejected the credentials
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Http { status: 401 | 403, .. })
    }
}
