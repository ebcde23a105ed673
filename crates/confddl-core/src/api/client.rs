//! Client for the remote conference feed.
//!
//! The feed is a single YAML document. Mirrors are tried in order and a
//! response only counts if it is a 200 that looks like YAML, since some
//! proxies answer with an HTML error page and a 200 status.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use crate::config::Config;
use crate::ingest::parse_feed;
use crate::models::RawFeedItem;

use super::{ApiError, Transport};

/// Official feed location.
pub const DEFAULT_FEED_URL: &str = "https://ccfddl.com/conference/allconf.yml";

/// Reject bodies that are clearly not the YAML feed.
pub fn looks_like_feed(body: &str) -> bool {
    body.starts_with('-') || body.contains("title:")
}

/// Feed client. Clone is cheap, the transport is shared.
#[derive(Clone)]
pub struct FeedClient {
    transport: Arc<dyn Transport>,
    urls: Vec<String>,
    timeout: Duration,
}

impl FeedClient {
    pub fn new(transport: Arc<dyn Transport>, urls: Vec<String>, timeout: Duration) -> Self {
        Self {
            transport,
            urls,
            timeout,
        }
    }

    pub fn from_config(transport: Arc<dyn Transport>, config: &Config) -> Self {
        Self::new(
            transport,
            config.feed_urls.clone(),
            Duration::from_secs(config.feed_timeout_secs),
        )
    }

    /// Fetch the raw feed text from the first mirror that returns a plausible body.
    pub async fn fetch_feed(&self) -> Result<String, ApiError> {
        for url in &self.urls {
            debug!(url = %url, "Fetching conference feed");
            match self.fetch_one(url).await {
                Ok(body) => {
                    debug!(url = %url, bytes = body.len(), "Fetched conference feed");
                    return Ok(body);
                }
                Err(e) => warn!(url = %url, error = %e, "Feed mirror failed"),
            }
        }
        Err(ApiError::AllMirrorsFailed)
    }

    async fn fetch_one(&self, url: &str) -> Result<String, ApiError> {
        let response = self.transport.get(url, self.timeout).await?;
        if !response.is_ok() {
            return Err(ApiError::from_status(response.status, &response.body));
        }
        if !looks_like_feed(&response.body) {
            return Err(ApiError::InvalidFeed(url.to_string()));
        }
        Ok(response.body)
    }

    /// Fetch and parse the feed into raw venue records.
    pub async fn fetch_items(&self) -> Result<Vec<RawFeedItem>, ApiError> {
        let body = self.fetch_feed().await?;
        parse_feed(&body)
    }

    /// Best-effort connectivity check with a cache-busting query parameter.
    pub async fn probe_online(&self, probe_url: &str, timeout: Duration) -> bool {
        let separator = if probe_url.contains('?') { '&' } else { '?' };
        let url = format!("{}{}_={}", probe_url, separator, Utc::now().timestamp_millis());
        let online = self.transport.probe(&url, timeout).await;
        debug!(online, "Network probe finished");
        online
    }
}
