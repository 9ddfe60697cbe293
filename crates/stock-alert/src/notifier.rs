//! SMS delivery of composed alerts

use std::sync::Arc;

use crate::api::{DeliveryStatus, SmsSender};
use crate::error::Result;

/// Sends alerts from a fixed sender number to a fixed receiver number
pub struct Notifier {
    sender: Arc<dyn SmsSender>,
    from: String,
    to: String,
}

impl Notifier {
    pub fn new(sender: Arc<dyn SmsSender>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            sender,
            from: from.into(),
            to: to.into(),
        }
    }

    /// Send `message`. An empty message is skipped and yields `None`.
    pub async fn notify(&self, message: &str) -> Result<Option<DeliveryStatus>> {
        if message.is_empty() {
            tracing::debug!("Empty message, nothing to send");
            return Ok(None);
        }

        let status = self.sender.send(&self.from, &self.to, message).await?;
        tracing::info!(sid = %status.sid, status = %status.status, "SMS submitted");
        Ok(Some(status))
    }
}
