//! Twilio Programmable Messaging client

use crate::api::{DeliveryStatus, SmsSender, check_status};
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;

pub const BASE_URL: &str = "https://api.twilio.com";

const PROVIDER: &str = "Twilio";

/// Twilio REST client for sending SMS
#[derive(Debug, Clone)]
pub struct TwilioClient {
    client: Client,
    account_sid: String,
    auth_token: String,
    base_url: String,
}

impl TwilioClient {
    /// Create a client authenticated as `account_sid`
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the client at a different host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        )
    }

    /// Create a message resource
    pub async fn create_message(&self, from: &str, to: &str, body: &str) -> Result<DeliveryStatus> {
        tracing::debug!(from, to, chars = body.chars().count(), "Submitting SMS");

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("From", from), ("To", to), ("Body", body)])
            .send()
            .await?;
        let response = check_status(PROVIDER, response).await?;

        Ok(response.json::<DeliveryStatus>().await?)
    }
}

#[async_trait]
impl SmsSender for TwilioClient {
    async fn send(&self, from: &str, to: &str, body: &str) -> Result<DeliveryStatus> {
        self.create_message(from, to, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_url() {
        let client = TwilioClient::new("AC123", "secret").with_base_url("http://127.0.0.1:8080/");
        assert_eq!(
            client.messages_url(),
            "http://127.0.0.1:8080/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[test]
    fn test_status_ignores_extra_fields() {
        let status: DeliveryStatus = serde_json::from_str(
            r#"{"sid":"SM1","status":"queued","to":"+15550001111","body":"hi","error_code":null}"#,
        )
        .unwrap();
        assert_eq!(status.status, "queued");
    }
}
