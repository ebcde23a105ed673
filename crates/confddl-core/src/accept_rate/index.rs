//! The bundled acceptance-rate index.
//!
//! A single JSON object mapping `"{sub}/{dblp}"` to the venue's payload,
//! produced offline by `build_index` and loaded once at startup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::AcceptRatePayload;

/// File name of the index inside an acceptance-rate directory.
pub const INDEX_FILE: &str = "index.json";

/// Where the bundled index is looked for when no path is configured.
const BUNDLED_INDEX_PATHS: &[&str] = &[
    "data/accept_rates/index.json",
    "./static/accept_rates/index.json",
    "../data/accept_rates/index.json",
];

#[derive(Debug, Clone, Default)]
pub struct AcceptRateIndex {
    entries: HashMap<String, AcceptRatePayload>,
}

impl AcceptRateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an index document. Entries with an unrecognized shape are skipped.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, Value> =
            serde_json::from_str(json).context("Acceptance-rate index is not a JSON object")?;

        let mut entries = HashMap::with_capacity(raw.len());
        for (key, value) in raw {
            match serde_json::from_value::<AcceptRatePayload>(value) {
                Ok(payload) => {
                    entries.insert(key, payload);
                }
                Err(e) => debug!(key = %key, error = %e, "Skipping unrecognized index entry"),
            }
        }
        Ok(Self { entries })
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read acceptance-rate index: {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Failed to parse acceptance-rate index: {}", path.display()))
    }

    /// Load the configured index, or the first bundled one found.
    /// Falls back to an empty index, in which case lookups go to per-venue files.
    pub fn load_bundled(configured: Option<&Path>) -> Self {
        let candidates: Vec<PathBuf> = match configured {
            Some(path) => vec![path.to_path_buf()],
            None => BUNDLED_INDEX_PATHS.iter().map(PathBuf::from).collect(),
        };

        for path in &candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from(path) {
                Ok(index) => {
                    debug!(path = %path.display(), count = index.len(), "Loaded acceptance-rate index");
                    return index;
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to load acceptance-rate index"),
            }
        }

        debug!("No acceptance-rate index found, using per-venue files only");
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, payload: AcceptRatePayload) {
        self.entries.insert(key.into(), payload);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key forms tried in order: exact, lowercased, dots removed from dblp,
    /// dots turned into hyphens in a lowercased dblp.
    pub fn candidate_keys(sub: &str, dblp: &str) -> [String; 4] {
        let key = format!("{}/{}", sub, dblp);
        [
            key.clone(),
            key.to_lowercase(),
            format!("{}/{}", sub, dblp.replace('.', "")),
            format!("{}/{}", sub, dblp.replace('.', "-").to_lowercase()),
        ]
    }

    pub fn lookup(&self, sub: &str, dblp: &str) -> Option<&AcceptRatePayload> {
        Self::candidate_keys(sub, dblp)
            .iter()
            .find_map(|key| self.entries.get(key))
    }
}
