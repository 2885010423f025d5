use crate::domain::ports::DeliveryTransport;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

#[derive(Debug, Deserialize)]
struct SessionStatus {
    connected: bool,
}

#[derive(Debug, Serialize)]
struct OutboundMessage<'a> {
    to: &'a str,
    body: &'a str,
}

/// Delivery capability backed by the session service's HTTP API:
/// `GET {endpoint}/sessions/{id}/status` and `POST {endpoint}/sessions/{id}/messages`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base: Url,
}

impl HttpTransport {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(endpoint)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    fn session_url(&self, session_id: &str, leaf: &str) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::ConfigError {
                message: format!("transport endpoint '{}' cannot be used as a base URL", self.base),
            })?
            .pop_if_empty()
            .extend(["sessions", session_id, leaf]);
        Ok(url)
    }

    async fn fetch_status(&self, session_id: &str) -> Result<bool> {
        let url = self.session_url(session_id, "status")?;
        tracing::debug!("Checking session status at: {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            tracing::debug!("Session status returned {}", response.status());
            return Ok(false);
        }

        let status: SessionStatus = response.json().await?;
        Ok(status.connected)
    }
}

#[async_trait]
impl DeliveryTransport for HttpTransport {
    async fn has_active_session(&self, session_id: &str) -> bool {
        match self.fetch_status(session_id).await {
            Ok(connected) => connected,
            Err(e) => {
                tracing::warn!(session = %session_id, error = %e, "Session status check failed");
                false
            }
        }
    }

    async fn send_message(&self, session_id: &str, to: &str, body: &str) -> Result<()> {
        let url = self.session_url(session_id, "messages")?;

        let response = self
            .client
            .post(url)
            .json(&OutboundMessage { to, body })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = response.text().await.unwrap_or_default();
        Err(GatewayError::delivery(status.as_u16(), detail))
    }
}
