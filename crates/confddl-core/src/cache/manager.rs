use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::models::Conference;

use super::storage::{Storage, StorageError};

pub const CACHE_KEY: &str = "conferences_cache";
pub const CACHE_TIME_KEY: &str = "conferences_cache_time";
pub const CACHE_TMP_KEY: &str = "conferences_cache_tmp";
pub const CACHE_TIME_TMP_KEY: &str = "conferences_cache_time_tmp";
pub const FAVORITES_KEY: &str = "favorites";

/// Consider cache stale after a day.
const CACHE_STALE_MINUTES: i64 = 24 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    /// Wrap data stored with a millisecond Unix timestamp. Unknown times map to the epoch.
    pub fn from_millis(data: T, millis: i64) -> Self {
        let cached_at = Utc
            .timestamp_millis_opt(millis)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        Self { data, cached_at }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Includes clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }
}

/// Persists the conference list and favorites.
///
/// Every storage failure is logged and reported as `false`/`None`;
/// nothing here returns an error to the caller.
#[derive(Clone)]
pub struct CacheManager {
    storage: Arc<dyn Storage>,
}

impl CacheManager {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    // ===== Conferences =====

    /// Write the conference list through the temp keys, then promote.
    ///
    /// Empty input is refused so a bad fetch can never wipe the cache.
    /// The primary key is only written with the re-read temp value, or
    /// with `data` itself when the temp round trip did not verify.
    pub fn save_to_cache(&self, data: &[Conference]) -> bool {
        if data.is_empty() {
            debug!("No conferences to cache, keeping previous cache");
            return false;
        }

        let value = match serde_json::to_value(data) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Failed to serialize conferences for cache");
                return false;
            }
        };

        let temp_written = match self.write_temp(&value) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Failed to write temp cache, writing primary directly");
                false
            }
        };

        let promoted = if temp_written {
            self.promote_temp().unwrap_or_else(|e| {
                warn!(error = %e, "Failed to promote temp cache, writing primary directly");
                false
            })
        } else {
            false
        };

        if promoted {
            debug!("Promoted temp cache to primary");
        } else if let Err(e) = self.write_primary(&value) {
            warn!(error = %e, "Failed to save cache");
            return false;
        } else {
            debug!("Wrote primary cache directly");
        }

        self.remove_temp();
        debug!(count = data.len(), "Cached conferences");
        true
    }

    fn write_temp(&self, value: &Value) -> Result<(), StorageError> {
        self.storage.set(CACHE_TMP_KEY, value)?;
        self.storage.set(CACHE_TIME_TMP_KEY, &json!(Utc::now().timestamp_millis()))
    }

    fn promote_temp(&self) -> Result<bool, StorageError> {
        let Some(temp) = self.storage.get(CACHE_TMP_KEY)? else {
            return Ok(false);
        };
        if !temp.as_array().is_some_and(|a| !a.is_empty()) {
            return Ok(false);
        }
        let temp_time = self
            .storage
            .get(CACHE_TIME_TMP_KEY)?
            .filter(|t| t.as_i64().is_some())
            .unwrap_or_else(|| json!(Utc::now().timestamp_millis()));

        self.storage.set(CACHE_KEY, &temp)?;
        self.storage.set(CACHE_TIME_KEY, &temp_time)?;
        Ok(true)
    }

    fn write_primary(&self, value: &Value) -> Result<(), StorageError> {
        self.storage.set(CACHE_KEY, value)?;
        self.storage.set(CACHE_TIME_KEY, &json!(Utc::now().timestamp_millis()))
    }

    fn remove_temp(&self) {
        let mut cleaned = false;
        for key in [CACHE_TMP_KEY, CACHE_TIME_TMP_KEY] {
            if let Ok(Some(_)) = self.storage.get(key) {
                match self.storage.remove(key) {
                    Ok(()) => cleaned = true,
                    Err(e) => debug!(key, error = %e, "Failed to remove temp cache key"),
                }
            }
        }
        if cleaned {
            debug!("Removed temp cache keys");
        }
    }

    /// Load the cached conference list. Only a non-empty list counts.
    pub fn load_from_cache(&self) -> Option<CachedData<Vec<Conference>>> {
        match self.try_load() {
            Ok(Some(cached)) => {
                debug!(count = cached.data.len(), "Loaded conferences from cache");
                Some(cached)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read cache");
                None
            }
        }
    }

    fn try_load(&self) -> Result<Option<CachedData<Vec<Conference>>>, StorageError> {
        let Some(value) = self.storage.get(CACHE_KEY)? else {
            return Ok(None);
        };
        let conferences: Vec<Conference> = serde_json::from_value(value)?;
        if conferences.is_empty() {
            return Ok(None);
        }
        let millis = self
            .storage
            .get(CACHE_TIME_KEY)?
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        Ok(Some(CachedData::from_millis(conferences, millis)))
    }

    // ===== Favorites =====

    pub fn load_favorites(&self) -> Option<Vec<String>> {
        let value = match self.storage.get(FAVORITES_KEY) {
            Ok(value) => value?,
            Err(e) => {
                warn!(error = %e, "Failed to load favorites");
                return None;
            }
        };
        match serde_json::from_value(value) {
            Ok(favorites) => Some(favorites),
            Err(e) => {
                warn!(error = %e, "Ignoring malformed favorites");
                None
            }
        }
    }

    pub fn save_favorites(&self, favorites: &[String]) -> bool {
        match self.storage.set(FAVORITES_KEY, &json!(favorites)) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Failed to save favorites");
                false
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
