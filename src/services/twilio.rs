use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::AlerterError;

/// Outbound SMS. Returns the provider's message id.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, from: &str, to: &str, text: &str) -> Result<String, AlerterError>;
}

#[derive(Clone)]
pub struct TwilioClient {
    http: Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,
}

impl TwilioClient {
    pub fn new(
        base_url: impl Into<String>,
        account_sid: Option<String>,
        auth_token: Option<String>,
    ) -> Result<Self, AlerterError> {
        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            account_sid: account_sid.unwrap_or_default(),
            auth_token: auth_token.unwrap_or_default(),
        })
    }

    pub fn has_credentials(&self) -> bool {
        !self.account_sid.trim().is_empty() && !self.auth_token.trim().is_empty()
    }
}

#[async_trait]
impl SmsSender for TwilioClient {
    async fn send(&self, from: &str, to: &str, text: &str) -> Result<String, AlerterError> {
        if !self.has_credentials() {
            return Err(AlerterError::SmsNotConfigured("TWILIO_ACCOUNT_SID / TWILIO_AUTH_TOKEN missing"));
        }
        if from.trim().is_empty() {
            return Err(AlerterError::SmsNotConfigured("TWILIO_FROM missing"));
        }

        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        );
        let res = self
            .http
            .post(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("From", from), ("To", to), ("Body", text)])
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(AlerterError::SmsRejected { status, body });
        }

        let msg = res.json::<MessageResponse>().await?;
        debug!(sid = %msg.sid, "twilio accepted message");
        Ok(msg.sid)
    }
}
