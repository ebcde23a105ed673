//! Application configuration management.
//!
//! Configuration is stored at `~/.config/confddl/config.json`. Every field
//! has a default, so a missing or partial file is fine.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_FEED_URL;

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "confddl";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Feed request timeout.
const DEFAULT_FEED_TIMEOUT_SECS: u64 = 8;

/// Per-file timeout for acceptance-rate fallback lookups.
const DEFAULT_ACCEPT_RATE_TIMEOUT_SECS: u64 = 5;

/// How long the connectivity probe may take before we call it offline.
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 3;

const DEFAULT_PROBE_URL: &str = "https://www.baidu.com/favicon.ico";

/// Where per-venue acceptance-rate files may live, tried in order.
pub const DEFAULT_ACCEPT_RATE_BASES: &[&str] = &[
    "/static/accept_rates",
    "./static/accept_rates",
    "/accept_rates",
    "./accept_rates",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed_urls: Vec<String>,
    pub feed_timeout_secs: u64,
    pub accept_rate_timeout_secs: u64,
    pub accept_rate_bases: Vec<String>,
    /// Origin that relative bases are joined with. Without one they are read from disk.
    pub accept_rate_origin: Option<String>,
    /// Override for the bundled acceptance-rate index file.
    pub accept_rate_index_path: Option<PathBuf>,
    pub probe_url: String,
    pub probe_timeout_secs: u64,
    /// Override for the cache directory.
    pub cache_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_urls: vec![DEFAULT_FEED_URL.to_string()],
            feed_timeout_secs: DEFAULT_FEED_TIMEOUT_SECS,
            accept_rate_timeout_secs: DEFAULT_ACCEPT_RATE_TIMEOUT_SECS,
            accept_rate_bases: DEFAULT_ACCEPT_RATE_BASES
                .iter()
                .map(|b| b.to_string())
                .collect(),
            accept_rate_origin: None,
            accept_rate_index_path: None,
            probe_url: DEFAULT_PROBE_URL.to_string(),
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            cache_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}
