use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::endpoint::Endpoint;
use crate::error::Result;

/// Identifying `User-Agent` sent with every lookup request.
pub const USER_AGENT: &str = "ServerlessEgressIP/1.0";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// A single lookup against one endpoint.
///
/// Implementations never fail: every problem collapses to `None`.
#[async_trait]
pub trait IpLookup: Send + Sync {
    async fn fetch(&self, endpoint: &Endpoint, timeout: Duration) -> Option<String>;
}

/// [`IpLookup`] backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpLookup {
    client: Client,
}

impl HttpLookup {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;

        Ok(Self { client })
    }

    async fn fetch_body(&self, url: &str) -> reqwest::Result<String> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[async_trait]
impl IpLookup for HttpLookup {
    async fn fetch(&self, endpoint: &Endpoint, timeout: Duration) -> Option<String> {
        // Dropping the future at the deadline aborts the request
        let body = match tokio::time::timeout(timeout, self.fetch_body(&endpoint.url)).await {
            Ok(Ok(body)) => body,
            Ok(Err(e)) => {
                tracing::debug!("Failed to get IP from {}: {}", endpoint.url, e);
                return None;
            }
            Err(_) => {
                tracing::debug!("Timed out after {:?} waiting for {}", timeout, endpoint.url);
                return None;
            }
        };

        let candidate = endpoint.format.extract(&body);
        if candidate.is_none() {
            tracing::debug!(
                "No usable {} answer from {}",
                endpoint.format,
                endpoint.url
            );
        }

        candidate
    }
}
