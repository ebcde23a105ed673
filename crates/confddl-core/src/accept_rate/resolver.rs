use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::api::{is_remote, ApiError, Transport};
use crate::config::Config;
use crate::models::{AcceptRatePayload, Conference};

use super::AcceptRateIndex;

#[derive(Error, Debug)]
pub enum RateLookupError {
    #[error("Conference has no sub/dblp keys")]
    MissingKeys,

    #[error("No acceptance rate found for {0}")]
    NotFound(String),
}

/// Attaches an acceptance-rate display string to a conference.
///
/// The bundled index is consulted first. Only when it yields nothing are the
/// per-venue files probed, one base at a time, first success wins.
#[derive(Clone)]
pub struct AcceptRateResolver {
    transport: Arc<dyn Transport>,
    bases: Vec<String>,
    origin: Option<String>,
    timeout: Duration,
}

impl AcceptRateResolver {
    pub fn new(
        transport: Arc<dyn Transport>,
        bases: Vec<String>,
        origin: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            bases,
            origin,
            timeout,
        }
    }

    pub fn from_config(transport: Arc<dyn Transport>, config: &Config) -> Self {
        Self::new(
            transport,
            config.accept_rate_bases.clone(),
            config.accept_rate_origin.clone(),
            Duration::from_secs(config.accept_rate_timeout_secs),
        )
    }

    /// Location of a venue file under `base`.
    ///
    /// Absolute URLs are used as-is. Relative bases are joined with the
    /// configured origin, or read from disk relative to the working directory.
    pub fn file_location(&self, base: &str, sub: &str, dblp: &str) -> String {
        let file = format!("{}/{}.json", sub, dblp);
        if is_remote(base) {
            return format!("{}/{}", base.trim_end_matches('/'), file);
        }
        let relative = base.trim_start_matches("./").trim_start_matches('/');
        let relative = relative.trim_end_matches('/');
        match &self.origin {
            Some(origin) => format!("{}/{}/{}", origin.trim_end_matches('/'), relative, file),
            None => format!("{}/{}", relative, file),
        }
    }

    /// Distinct file locations for a venue, in base order.
    pub fn file_locations(&self, sub: &str, dblp: &str) -> Vec<String> {
        let mut locations: Vec<String> = Vec::with_capacity(self.bases.len());
        for base in &self.bases {
            let location = self.file_location(base, sub, dblp);
            if !locations.contains(&location) {
                locations.push(location);
            }
        }
        locations
    }

    pub async fn resolve(&self, index: &AcceptRateIndex, conference: &Conference) -> Result<String, RateLookupError> {
        let (Some(sub), Some(dblp)) = (conference.sub.as_deref(), conference.dblp.as_deref()) else {
            return Err(RateLookupError::MissingKeys);
        };

        if let Some(rate) = index.lookup(sub, dblp).and_then(AcceptRatePayload::index_display_rate) {
            debug!(conference = %conference.id, rate = %rate, "Acceptance rate from index");
            return Ok(rate);
        }

        for location in self.file_locations(sub, dblp) {
            match self.fetch_rate(&location).await {
                Ok(Some(rate)) => {
                    debug!(conference = %conference.id, location = %location, rate = %rate, "Acceptance rate from file");
                    return Ok(rate);
                }
                Ok(None) => {}
                Err(e) => debug!(location = %location, error = %e, "Acceptance-rate file lookup failed"),
            }
        }

        Err(RateLookupError::NotFound(format!("{}/{}", sub, dblp)))
    }

    async fn fetch_rate(&self, location: &str) -> Result<Option<String>, ApiError> {
        let response = self.transport.get(location, self.timeout).await?;
        if !response.is_ok() || response.body.trim().is_empty() {
            return Ok(None);
        }
        let payload: AcceptRatePayload = serde_json::from_str(&response.body)?;
        Ok(payload.display_rate())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::api::TransportResponse;
    use crate::models::{RateValue, TBD};

    #[derive(Default)]
    struct FileTransport {
        files: HashMap<String, TransportResponse>,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Transport for FileTransport {
        async fn get(&self, location: &str, _timeout: Duration) -> Result<TransportResponse, ApiError> {
            self.requested.lock().unwrap().push(location.to_string());
            match self.files.get(location) {
                Some(response) => Ok(response.clone()),
                None => Err(ApiError::Timeout(5)),
            }
        }

        async fn probe(&self, _url: &str, _timeout: Duration) -> bool {
            true
        }
    }

    fn resolver(files: Vec<(&str, &str)>) -> (AcceptRateResolver, Arc<FileTransport>) {
        let transport = Arc::new(FileTransport {
            files: files
                .into_iter()
                .map(|(k, v)| (k.to_string(), TransportResponse::ok(v)))
                .collect(),
            requested: Mutex::new(Vec::new()),
        });
        let resolver = AcceptRateResolver::from_config(transport.clone(), &Config::default());
        (resolver, transport)
    }

    fn conference(sub: Option<&str>, dblp: Option<&str>) -> Conference {
        Conference {
            id: "icse2025".to_string(),
            title: "ICSE-2025".to_string(),
            full_title: "ICSE".to_string(),
            ccf_level: "A".to_string(),
            category: "软件工程".to_string(),
            deadline: TBD.to_string(),
            conference_date: TBD.to_string(),
            location: TBD.to_string(),
            website: None,
            acceptance_rate: None,
            abstract_deadline: None,
            dblp: dblp.map(str::to_string),
            sub: sub.map(str::to_string),
            year: Some(2025),
        }
    }

    #[test]
    fn test_file_locations() {
        let (resolver, _) = resolver(vec![]);
        assert_eq!(
            resolver.file_location("/static/accept_rates", "SE", "icse"),
            "static/accept_rates/SE/icse.json"
        );
        assert_eq!(
            resolver.file_location("https://cdn.example/rates/", "SE", "icse"),
            "https://cdn.example/rates/SE/icse.json"
        );

        let with_origin = AcceptRateResolver::new(
            Arc::new(FileTransport::default()),
            vec![],
            Some("https://ccfddl.example/".to_string()),
            Duration::from_secs(5),
        );
        assert_eq!(
            with_origin.file_location("./accept_rates", "SE", "icse"),
            "https://ccfddl.example/accept_rates/SE/icse.json"
        );
    }

    #[tokio::test]
    async fn test_missing_keys_is_a_no_op() {
        let (resolver, transport) = resolver(vec![]);
        let result = resolver
            .resolve(&AcceptRateIndex::new(), &conference(Some("SE"), None))
            .await;
        assert!(matches!(result, Err(RateLookupError::MissingKeys)));
        assert!(transport.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_index_hit_skips_files() {
        let (resolver, transport) = resolver(vec![]);
        let mut index = AcceptRateIndex::new();
        index.insert("SE/icse", AcceptRatePayload::Scalar(RateValue::Text("0,221".to_string())));

        let rate = resolver.resolve(&index, &conference(Some("SE"), Some("icse"))).await.unwrap();
        assert_eq!(rate, "22.1%");
        assert!(transport.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fallback_tries_bases_in_order() {
        let (resolver, transport) = resolver(vec![
            ("static/accept_rates/SE/icse.json", "<html>not json</html>"),
            ("accept_rates/SE/icse.json", r#"[{"accept_rates": [{"year": 2024, "rate": 0.231}]}]"#),
        ]);
        let rate = resolver
            .resolve(&AcceptRateIndex::new(), &conference(Some("SE"), Some("icse")))
            .await
            .unwrap();
        assert_eq!(rate, "23.1%");
        assert_eq!(
            *transport.requested.lock().unwrap(),
            vec!["static/accept_rates/SE/icse.json", "accept_rates/SE/icse.json"]
        );
    }

    #[tokio::test]
    async fn test_equivalent_bases_are_tried_once() {
        let (resolver, transport) = resolver(vec![]);
        assert_eq!(
            resolver.file_locations("SE", "icse"),
            vec!["static/accept_rates/SE/icse.json", "accept_rates/SE/icse.json"]
        );

        let result = resolver
            .resolve(&AcceptRateIndex::new(), &conference(Some("SE"), Some("icse")))
            .await;
        assert!(matches!(result, Err(RateLookupError::NotFound(_))));
        assert_eq!(transport.requested.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_index_list_uses_first_element() {
        let (resolver, _) = resolver(vec![]);
        let mut index = AcceptRateIndex::new();
        let payload: AcceptRatePayload =
            serde_json::from_str(r#"[{"year": 2023, "rate": 0.2}, {"year": 2024, "rate": 0.25}]"#).unwrap();
        index.insert("SE/icse", payload);

        let rate = resolver.resolve(&index, &conference(Some("SE"), Some("icse"))).await.unwrap();
        assert_eq!(rate, "20.0%");
    }

    #[tokio::test]
    async fn test_out_of_range_rate_is_unresolved() {
        let (resolver, _) = resolver(vec![("static/accept_rates/SE/icse.json", r#"{"rate": 1.25}"#)]);
        let result = resolver
            .resolve(&AcceptRateIndex::new(), &conference(Some("SE"), Some("icse")))
            .await;
        assert!(matches!(result, Err(RateLookupError::NotFound(_))));
    }
}
