//! Transport seam between the store and the outside world.
//!
//! `Transport` fetches a location and reports the status and body. The HTTP
//! implementation also serves plain filesystem paths, which is how relative
//! acceptance-rate bases are read when no asset origin is configured.

use std::io::ErrorKind;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::ApiError;

const USER_AGENT: &str = concat!("confddl/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `location` (an http(s) URL or a local path) within `timeout`.
    async fn get(&self, location: &str, timeout: Duration) -> Result<TransportResponse, ApiError>;

    /// Best-effort reachability check. Any response within `timeout` counts as online.
    async fn probe(&self, url: &str, timeout: Duration) -> bool;
}

pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// reqwest-backed transport.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ApiError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    async fn read_local(path: &str) -> Result<TransportResponse, ApiError> {
        match tokio::fs::read_to_string(path).await {
            Ok(body) => Ok(TransportResponse::ok(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(TransportResponse {
                status: 404,
                body: String::new(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn map_error(e: reqwest::Error, timeout: Duration) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout(timeout.as_secs())
        } else {
            ApiError::NetworkError(e)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, location: &str, timeout: Duration) -> Result<TransportResponse, ApiError> {
        if !is_remote(location) {
            return Self::read_local(location).await;
        }

        let response = self
            .client
            .get(location)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Self::map_error(e, timeout))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Self::map_error(e, timeout))?;
        Ok(TransportResponse { status, body })
    }

    async fn probe(&self, url: &str, timeout: Duration) -> bool {
        match tokio::time::timeout(timeout, self.client.head(url).send()).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                debug!(url = %url, error = %e, "Probe request failed");
                false
            }
            Err(_) => {
                debug!(url = %url, "Probe timed out");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://ccfddl.com/conference/allconf.yml"));
        assert!(!is_remote("./static/accept_rates/AI/icml.json"));
    }

    #[tokio::test]
    async fn test_local_paths_are_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icml.json");
        std::fs::write(&path, r#"{"rate": 0.25}"#).unwrap();

        let transport = HttpTransport::new().unwrap();
        let found = transport
            .get(path.to_str().unwrap(), Duration::from_secs(5))
            .await
            .unwrap();
        assert!(found.is_ok());
        assert_eq!(found.body, r#"{"rate": 0.25}"#);

        let missing = dir.path().join("missing.json");
        let missing = transport
            .get(missing.to_str().unwrap(), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(missing.status, 404);
    }
}
