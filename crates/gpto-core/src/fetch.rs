//! Bounded-timeout page fetching
//!
//! A fetch never fails from the caller's point of view: timeouts, aborted
//! connections and unreadable bodies all come back as `status == 0`, which is
//! distinguishable from any real HTTP status.

use crate::config::CrawlConfig;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Outcome of one GET request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResult {
    /// HTTP status, `0` when the request did not complete
    pub status: u16,
    pub body: String,
}

impl FetchResult {
    pub fn failed() -> Self {
        Self::default()
    }
}

/// Issues single GET requests with a per-request timeout. No retries.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_text(&self, url: &str, timeout: Duration) -> FetchResult;
}

/// `Fetcher` backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client that identifies itself with the configured user agent
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str, timeout: Duration) -> FetchResult {
        let response = match self.client.get(url).timeout(timeout).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Fetch failed for {}: {}", url, e);
                return FetchResult::failed();
            }
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => FetchResult { status, body },
            Err(e) => {
                debug!("Failed to read body of {}: {}", url, e);
                FetchResult::failed()
            }
        }
    }
}
