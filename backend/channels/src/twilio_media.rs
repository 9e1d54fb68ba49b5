//! Twilio Media Handling
//!
//! Downloads inbound documents/images referenced by `MediaUrlN`. Twilio media
//! URLs require HTTP basic auth with the account SID and auth token, and
//! usually redirect to a pre-signed storage URL.

use async_trait::async_trait;
use bytes::Bytes;
use intake_core::{FetchError, MediaFetcher};
use reqwest::Client;
use tracing::{debug, info};

pub struct TwilioMediaFetcher {
    http_client: Client,
    account_sid: String,
    auth_token: String,
}

impl TwilioMediaFetcher {
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
        }
    }

    /// Use a shared client (carries the configured timeout).
    pub fn with_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }
}

#[async_trait]
impl MediaFetcher for TwilioMediaFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        debug!(url, "Fetching Twilio media");
        let response = self
            .http_client
            .get(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        info!(url, size = bytes.len(), "Downloaded Twilio media");
        Ok(bytes)
    }
}
