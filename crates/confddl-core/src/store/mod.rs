//! Conference store: the orchestrator behind every front end.
//!
//! `ConferenceStore` owns the live state and coordinates the feed client,
//! deadline resolution, acceptance-rate lookups and the cache:
//!
//! - A fetch is single-flight. Callers arriving while one runs share its outcome.
//! - A successful fetch replaces the whole list, resolves acceptance rates for
//!   every conference concurrently (one failure never blocks the others),
//!   writes the cache, and only then clears the network error flag.
//! - A failed fetch sets the network error flag and falls back to the cache.
//! - Acceptance-rate loading has its own single-flight guard.
//!
//! The store is cheap to clone; clones share state.

pub mod single_flight;
pub mod state;

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use futures::future::join_all;
use tracing::{debug, error, info, warn};

use crate::accept_rate::{AcceptRateIndex, AcceptRateResolver, RateLookupError};
use crate::api::{FeedClient, Transport};
use crate::cache::{CacheManager, CachedData, Storage};
use crate::config::Config;
use crate::deadline::{display_now, DISPLAY_UTC_OFFSET_HOURS};
use crate::ingest::build_conferences;
use crate::models::Conference;

pub use single_flight::SingleFlight;
pub use state::{CategorizedConferences, StoreState};

// ============================================================================
// Outcomes
// ============================================================================

/// User-facing feedback for an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    LiveUpdated,
    /// The fetch succeeded although the probe said offline, so an HTTP cache answered.
    HttpCacheUsed,
    CacheFallback { cached_on: NaiveDate },
    UpdateFailed,
    FavoriteAdded,
    FavoriteRemoved,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::LiveUpdated => write!(f, "Data updated live"),
            Notice::HttpCacheUsed => write!(f, "Using HTTP-cached data"),
            Notice::CacheFallback { cached_on } => {
                write!(f, "Using local cache from {}", cached_on.format("%Y-%m-%d"))
            }
            Notice::UpdateFailed => write!(f, "Update failed, please check your network"),
            Notice::FavoriteAdded => write!(f, "Added to favorites"),
            Notice::FavoriteRemoved => write!(f, "Removed from favorites"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Updated { count: usize, notice: Notice },
    /// The feed parsed but yielded nothing; the current list was kept.
    NoConferences,
    FromCache { count: usize, notice: Notice },
    Failed { notice: Notice },
}

impl FetchOutcome {
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            FetchOutcome::Updated { notice, .. }
            | FetchOutcome::FromCache { notice, .. }
            | FetchOutcome::Failed { notice } => Some(notice),
            FetchOutcome::NoConferences => None,
        }
    }
}

// ============================================================================
// Store
// ============================================================================

struct StoreInner {
    state: Mutex<StoreState>,
    feed: FeedClient,
    resolver: AcceptRateResolver,
    cache: CacheManager,
    index: Mutex<Arc<AcceptRateIndex>>,
    index_path: Option<PathBuf>,
    probe_url: String,
    probe_timeout: Duration,
    fetch_flight: SingleFlight<FetchOutcome>,
    rates_flight: SingleFlight<()>,
}

#[derive(Clone)]
pub struct ConferenceStore {
    inner: Arc<StoreInner>,
}

impl ConferenceStore {
    pub fn new(
        config: &Config,
        transport: Arc<dyn Transport>,
        storage: Arc<dyn Storage>,
        index: AcceptRateIndex,
    ) -> Self {
        let inner = StoreInner {
            state: Mutex::new(StoreState::default()),
            feed: FeedClient::from_config(Arc::clone(&transport), config),
            resolver: AcceptRateResolver::from_config(transport, config),
            cache: CacheManager::new(storage),
            index: Mutex::new(Arc::new(index)),
            index_path: config.accept_rate_index_path.clone(),
            probe_url: config.probe_url.clone(),
            probe_timeout: Duration::from_secs(config.probe_timeout_secs),
            fetch_flight: SingleFlight::new(),
            rates_flight: SingleFlight::new(),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Fetch the remote feed, or join the fetch already in flight.
    pub async fn fetch_remote_conferences(&self) -> FetchOutcome {
        if self.inner.fetch_flight.is_pending() {
            debug!("Joining in-flight conference fetch");
        }
        let inner = Arc::clone(&self.inner);
        self.inner
            .fetch_flight
            .run(move || inner.run_fetch())
            .await
    }

    /// Resolve acceptance rates for the current list.
    ///
    /// A no-op once rates were resolved this session, unless `force` is set,
    /// which also reloads the index from disk.
    pub async fn load_local_accept_rates(&self, force: bool) {
        if !force && self.inner.state().accept_rates_loaded {
            return;
        }
        let inner = Arc::clone(&self.inner);
        self.inner
            .rates_flight
            .run(move || inner.run_rate_load(force))
            .await
    }

    // =========================================================================
    // Cache
    // =========================================================================

    /// Replace the live list with the cached one. Returns false if there is no usable cache.
    pub fn load_from_cache(&self) -> bool {
        self.inner.load_from_cache()
    }

    pub fn save_to_cache(&self, data: &[Conference]) -> bool {
        self.inner.cache.save_to_cache(data)
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    pub fn load_favorites(&self) {
        if let Some(favorites) = self.inner.cache.load_favorites() {
            debug!(count = favorites.len(), "Loaded favorites");
            self.inner.state().favorites = favorites;
        }
    }

    /// Toggle and persist a favorite.
    pub fn toggle_favorite(&self, id: &str) -> Notice {
        let (added, favorites) = {
            let mut state = self.inner.state();
            let added = state.toggle_favorite(id);
            (added, state.favorites.clone())
        };
        self.inner.cache.save_favorites(&favorites);
        if added {
            Notice::FavoriteAdded
        } else {
            Notice::FavoriteRemoved
        }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.inner.state().is_favorite(id)
    }

    pub fn favorite_conferences(&self) -> Vec<Conference> {
        self.inner.state().favorite_conferences()
    }

    // =========================================================================
    // Filters and views
    // =========================================================================

    pub fn set_search_query(&self, query: &str) {
        self.inner.state().search_query = query.to_string();
    }

    pub fn set_filter(&self, levels: Vec<String>, categories: Vec<String>) {
        let mut state = self.inner.state();
        state.selected_levels = levels;
        state.selected_categories = categories;
    }

    pub fn toggle_level(&self, level: &str) {
        self.inner.state().toggle_level(level);
    }

    pub fn toggle_category(&self, category: &str) {
        self.inner.state().toggle_category(category);
    }

    pub fn categorized(&self) -> CategorizedConferences {
        self.categorized_at(display_now())
    }

    pub fn categorized_at(&self, now: NaiveDateTime) -> CategorizedConferences {
        self.inner.state().categorized(now)
    }

    pub fn upcoming_conferences(&self) -> Vec<Conference> {
        self.categorized().upcoming
    }

    pub fn passed_conferences(&self) -> Vec<Conference> {
        self.categorized().passed
    }

    pub fn tbd_conferences(&self) -> Vec<Conference> {
        self.categorized().tbd
    }

    pub fn filtered_conferences(&self) -> Vec<Conference> {
        self.categorized().into_filtered()
    }

    pub fn get_conference_by_id(&self, id: &str) -> Option<Conference> {
        self.inner.state().get_conference_by_id(id).cloned()
    }

    pub fn conferences(&self) -> Vec<Conference> {
        self.inner.state().conferences.clone()
    }

    /// Snapshot of the whole state.
    pub fn snapshot(&self) -> StoreState {
        self.inner.state().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state().is_loading
    }

    pub fn is_network_error(&self) -> bool {
        self.inner.state().is_network_error
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.inner.state().last_updated
    }

    /// Age of the list currently held, if it has a timestamp.
    pub fn freshness(&self) -> Option<CachedData<()>> {
        self.last_updated().map(|at| CachedData {
            data: (),
            cached_at: at,
        })
    }
}

/// Holds `is_loading` up for as long as a fetch is running, including when it unwinds.
struct LoadingFlag<'a>(&'a StoreInner);

impl<'a> LoadingFlag<'a> {
    fn raise(inner: &'a StoreInner) -> Self {
        inner.state().is_loading = true;
        Self(inner)
    }
}

impl Drop for LoadingFlag<'_> {
    fn drop(&mut self) {
        self.0.state().is_loading = false;
    }
}

impl StoreInner {
    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn index(&self) -> Arc<AcceptRateIndex> {
        let index = self.index.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&index)
    }

    async fn run_fetch(self: Arc<Self>) -> FetchOutcome {
        let _loading = LoadingFlag::raise(&self);

        // Only decides which notice is shown; never aborts the fetch.
        let online = self.feed.probe_online(&self.probe_url, self.probe_timeout).await;

        let outcome = match self.feed.fetch_items().await {
            Ok(items) => {
                let conferences = build_conferences(&items, display_now());
                if conferences.is_empty() {
                    warn!("Feed yielded no conferences, keeping current list");
                    FetchOutcome::NoConferences
                } else {
                    self.apply_fresh(conferences, online).await
                }
            }
            Err(e) => {
                error!(error = %e, parse_failure = e.is_parse_failure(), "Failed to fetch remote conferences");
                self.fall_back_to_cache()
            }
        };

        outcome
    }

    async fn apply_fresh(&self, conferences: Vec<Conference>, online: bool) -> FetchOutcome {
        let count = conferences.len();
        self.state().conferences = conferences.clone();

        let rates = self.resolve_rates(&conferences).await;
        let conferences = self.apply_rates(conferences, &rates);

        if !self.cache.save_to_cache(&conferences) {
            warn!("Cache not written, keeping previous cache");
        }

        {
            let mut state = self.state();
            state.last_updated = Some(Utc::now());
            state.is_network_error = false;
        }

        info!(count, online, "Conference list updated");
        let notice = if online {
            Notice::LiveUpdated
        } else {
            Notice::HttpCacheUsed
        };
        FetchOutcome::Updated { count, notice }
    }

    fn fall_back_to_cache(&self) -> FetchOutcome {
        self.state().is_network_error = true;

        if !self.load_from_cache() {
            return FetchOutcome::Failed {
                notice: Notice::UpdateFailed,
            };
        }

        let state = self.state();
        let cached_on = state
            .last_updated
            .and_then(|t| {
                t.naive_utc()
                    .checked_add_signed(chrono::Duration::hours(DISPLAY_UTC_OFFSET_HOURS))
            })
            .map(|t| t.date())
            .unwrap_or_default();
        FetchOutcome::FromCache {
            count: state.conferences.len(),
            notice: Notice::CacheFallback { cached_on },
        }
    }

    fn load_from_cache(&self) -> bool {
        match self.cache.load_from_cache() {
            Some(cached) => {
                let mut state = self.state();
                state.conferences = cached.data;
                state.last_updated = Some(cached.cached_at);
                true
            }
            None => false,
        }
    }

    async fn run_rate_load(self: Arc<Self>, force: bool) {
        if force {
            let reloaded = AcceptRateIndex::load_bundled(self.index_path.as_deref());
            if !reloaded.is_empty() {
                *self.index.lock().unwrap_or_else(|e| e.into_inner()) = Arc::new(reloaded);
            }
        }

        let conferences = self.state().conferences.clone();
        let rates = self.resolve_rates(&conferences).await;
        self.apply_rates(conferences, &rates);
        self.state().accept_rates_loaded = true;
    }

    /// Look up every conference concurrently and collect the successes.
    /// Individual failures are logged and skipped.
    async fn resolve_rates(&self, conferences: &[Conference]) -> HashMap<String, String> {
        let index = self.index();
        let lookups = conferences.iter().map(|conf| {
            let index = Arc::clone(&index);
            async move { (conf.id.clone(), self.resolver.resolve(&index, conf).await) }
        });

        let mut rates = HashMap::new();
        let mut unresolved = 0usize;
        for (id, result) in join_all(lookups).await {
            match result {
                Ok(rate) => {
                    rates.insert(id, rate);
                }
                Err(RateLookupError::MissingKeys) => {}
                Err(e) => {
                    unresolved += 1;
                    debug!(conference = %id, error = %e, "Acceptance rate unresolved");
                }
            }
        }

        debug!(resolved = rates.len(), unresolved, "Acceptance-rate lookups settled");
        rates
    }

    /// Write resolved rates into `conferences` and into the live list.
    fn apply_rates(&self, mut conferences: Vec<Conference>, rates: &HashMap<String, String>) -> Vec<Conference> {
        if rates.is_empty() {
            return conferences;
        }
        for conf in conferences.iter_mut() {
            if let Some(rate) = rates.get(&conf.id) {
                conf.acceptance_rate = Some(rate.clone());
            }
        }
        let mut state = self.state();
        for conf in state.conferences.iter_mut() {
            if let Some(rate) = rates.get(&conf.id) {
                conf.acceptance_rate = Some(rate.clone());
            }
        }
        conferences
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Datelike;

    use super::*;
    use crate::api::{ApiError, TransportResponse, DEFAULT_FEED_URL};
    use crate::cache::MemoryStorage;
    use crate::models::{AcceptRatePayload, RateValue, NOT_AVAILABLE};

    struct FakeTransport {
        feed: Option<TransportResponse>,
        files: HashMap<String, TransportResponse>,
        online: bool,
        delay: Duration,
        feed_requests: AtomicUsize,
        file_requests: AtomicUsize,
        crash_next_feed: AtomicBool,
    }

    impl FakeTransport {
        fn serving(feed: Option<TransportResponse>) -> Self {
            Self {
                feed,
                files: HashMap::new(),
                online: true,
                delay: Duration::ZERO,
                feed_requests: AtomicUsize::new(0),
                file_requests: AtomicUsize::new(0),
                crash_next_feed: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn get(&self, location: &str, _timeout: Duration) -> Result<TransportResponse, ApiError> {
            if location == DEFAULT_FEED_URL {
                self.feed_requests.fetch_add(1, Ordering::SeqCst);
                if self.crash_next_feed.swap(false, Ordering::SeqCst) {
                    panic!("transport crashed");
                }
                if !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }
                return self.feed.clone().ok_or(ApiError::Timeout(8));
            }
            self.file_requests.fetch_add(1, Ordering::SeqCst);
            Ok(self.files.get(location).cloned().unwrap_or(TransportResponse {
                status: 404,
                body: String::new(),
            }))
        }

        async fn probe(&self, _url: &str, _timeout: Duration) -> bool {
            self.online
        }
    }

    fn next_year() -> i32 {
        Utc::now().year() + 1
    }

    fn feed_yaml() -> String {
        let year = next_year();
        format!(
            r#"
- title: ICML
  description: International Conference on Machine Learning
  sub: AI
  rank:
    ccf: A
  dblp: icml
  confs:
    - year: {year}
      id: icml{year}
      timezone: AoE
      timeline:
        - deadline: '{year}-01-30 23:59:59'
- title: Some Workshop
  sub: MX
  confs:
    - year: {year}
      timeline:
        - deadline: TBD
"#
        )
    }

    fn store_with(transport: FakeTransport, storage: Arc<MemoryStorage>, index: AcceptRateIndex) -> (ConferenceStore, Arc<FakeTransport>) {
        let transport = Arc::new(transport);
        let store = ConferenceStore::new(&Config::default(), transport.clone(), storage, index);
        (store, transport)
    }

    fn cached_conference(id: &str) -> Conference {
        Conference {
            id: id.to_string(),
            title: format!("{}-cached", id),
            full_title: id.to_string(),
            ccf_level: "A".to_string(),
            category: "软件工程".to_string(),
            deadline: crate::models::TBD.to_string(),
            conference_date: crate::models::TBD.to_string(),
            location: crate::models::TBD.to_string(),
            website: None,
            acceptance_rate: Some(NOT_AVAILABLE.to_string()),
            abstract_deadline: None,
            dblp: Some("icse".to_string()),
            sub: Some("SE".to_string()),
            year: Some(2025),
        }
    }

    #[tokio::test]
    async fn test_concurrent_fetches_share_one_request() {
        let mut transport = FakeTransport::serving(Some(TransportResponse::ok(feed_yaml())));
        transport.delay = Duration::from_millis(50);
        let (store, transport) = store_with(transport, Arc::new(MemoryStorage::new()), AcceptRateIndex::new());

        let (a, b) = tokio::join!(store.fetch_remote_conferences(), store.fetch_remote_conferences());
        assert_eq!(a, b);
        assert_eq!(
            a,
            FetchOutcome::Updated {
                count: 2,
                notice: Notice::LiveUpdated
            }
        );
        assert_eq!(transport.feed_requests.load(Ordering::SeqCst), 1);

        // Guard is released once the fetch completes
        store.fetch_remote_conferences().await;
        assert_eq!(transport.feed_requests.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_crashed_fetch_does_not_wedge_the_store() {
        let transport = FakeTransport::serving(Some(TransportResponse::ok(feed_yaml())));
        transport.crash_next_feed.store(true, Ordering::SeqCst);
        let (store, transport) = store_with(transport, Arc::new(MemoryStorage::new()), AcceptRateIndex::new());

        let background = store.clone();
        let crashed = tokio::spawn(async move { background.fetch_remote_conferences().await }).await;
        assert!(crashed.is_err());
        assert!(!store.is_loading());

        assert_eq!(
            store.fetch_remote_conferences().await,
            FetchOutcome::Updated {
                count: 2,
                notice: Notice::LiveUpdated
            }
        );
        assert_eq!(transport.feed_requests.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_successful_fetch_resolves_rates_and_caches() {
        let storage = Arc::new(MemoryStorage::new());
        let mut index = AcceptRateIndex::new();
        index.insert("AI/icml", AcceptRatePayload::Scalar(RateValue::Number(0.275)));
        let (store, _) = store_with(
            FakeTransport::serving(Some(TransportResponse::ok(feed_yaml()))),
            storage.clone(),
            index,
        );

        store.fetch_remote_conferences().await;

        assert!(!store.is_network_error());
        assert!(!store.is_loading());
        assert!(store.last_updated().is_some());

        let icml = store.get_conference_by_id(&format!("icml{}", next_year())).unwrap();
        assert_eq!(icml.acceptance_rate.as_deref(), Some("27.5%"));
        let workshop = store.get_conference_by_id(&format!("someworkshop{}", next_year())).unwrap();
        assert_eq!(workshop.acceptance_rate.as_deref(), Some(NOT_AVAILABLE));

        let cached = CacheManager::new(storage).load_from_cache().unwrap();
        assert_eq!(cached.data.len(), 2);
        assert!(cached.data.iter().any(|c| c.acceptance_rate.as_deref() == Some("27.5%")));
    }

    #[tokio::test]
    async fn test_failed_fetch_falls_back_to_cache() {
        let storage = Arc::new(MemoryStorage::new());
        assert!(CacheManager::new(storage.clone()).save_to_cache(&[cached_conference("icse2025")]));

        let (store, _) = store_with(
            FakeTransport::serving(Some(TransportResponse {
                status: 500,
                body: "Internal Server Error".to_string(),
            })),
            storage,
            AcceptRateIndex::new(),
        );

        let outcome = store.fetch_remote_conferences().await;
        assert!(matches!(
            outcome,
            FetchOutcome::FromCache {
                count: 1,
                notice: Notice::CacheFallback { .. }
            }
        ));
        assert!(store.is_network_error());
        assert_eq!(store.conferences()[0].id, "icse2025");
    }

    #[tokio::test]
    async fn test_failed_fetch_without_cache() {
        let (store, _) = store_with(
            FakeTransport::serving(None),
            Arc::new(MemoryStorage::new()),
            AcceptRateIndex::new(),
        );
        let outcome = store.fetch_remote_conferences().await;
        assert_eq!(
            outcome,
            FetchOutcome::Failed {
                notice: Notice::UpdateFailed
            }
        );
        assert!(store.is_network_error());
        assert!(store.conferences().is_empty());
    }

    #[tokio::test]
    async fn test_html_error_page_is_a_network_failure() {
        let (store, _) = store_with(
            FakeTransport::serving(Some(TransportResponse::ok("<html><body>502</body></html>"))),
            Arc::new(MemoryStorage::new()),
            AcceptRateIndex::new(),
        );
        assert!(matches!(
            store.fetch_remote_conferences().await,
            FetchOutcome::Failed { .. }
        ));
    }

    #[tokio::test]
    async fn test_offline_probe_reports_http_cache() {
        let mut transport = FakeTransport::serving(Some(TransportResponse::ok(feed_yaml())));
        transport.online = false;
        let (store, _) = store_with(transport, Arc::new(MemoryStorage::new()), AcceptRateIndex::new());
        let outcome = store.fetch_remote_conferences().await;
        assert_eq!(outcome.notice(), Some(&Notice::HttpCacheUsed));
    }

    #[tokio::test]
    async fn test_empty_feed_keeps_list_and_cache() {
        let storage = Arc::new(MemoryStorage::new());
        assert!(CacheManager::new(storage.clone()).save_to_cache(&[cached_conference("icse2025")]));
        let (store, _) = store_with(
            FakeTransport::serving(Some(TransportResponse::ok("- title: Retired\n  confs: []\n"))),
            storage.clone(),
            AcceptRateIndex::new(),
        );
        assert!(store.load_from_cache());

        assert_eq!(store.fetch_remote_conferences().await, FetchOutcome::NoConferences);
        assert_eq!(store.conferences().len(), 1);
        assert_eq!(CacheManager::new(storage).load_from_cache().unwrap().data.len(), 1);
    }

    #[tokio::test]
    async fn test_load_local_accept_rates_uses_files_once_per_session() {
        let storage = Arc::new(MemoryStorage::new());
        assert!(CacheManager::new(storage.clone()).save_to_cache(&[cached_conference("icse2025")]));

        let mut transport = FakeTransport::serving(None);
        transport.files.insert(
            "static/accept_rates/SE/icse.json".to_string(),
            TransportResponse::ok(r#"{"accept_rates": [{"year": 2024, "rate": "0,221"}]}"#),
        );
        let (store, transport) = store_with(transport, storage, AcceptRateIndex::new());
        assert!(store.load_from_cache());

        tokio::join!(
            store.load_local_accept_rates(false),
            store.load_local_accept_rates(false)
        );
        assert_eq!(
            store.get_conference_by_id("icse2025").unwrap().acceptance_rate.as_deref(),
            Some("22.1%")
        );
        assert_eq!(transport.file_requests.load(Ordering::SeqCst), 1);

        store.load_local_accept_rates(false).await;
        assert_eq!(transport.file_requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_favorites_persist_across_stores() {
        let storage = Arc::new(MemoryStorage::new());
        let (store, _) = store_with(FakeTransport::serving(None), storage.clone(), AcceptRateIndex::new());

        assert_eq!(store.toggle_favorite("icse2025"), Notice::FavoriteAdded);
        assert!(store.is_favorite("icse2025"));
        // Not in the list yet, so the view is empty
        assert!(store.favorite_conferences().is_empty());

        let (reopened, _) = store_with(FakeTransport::serving(None), storage, AcceptRateIndex::new());
        reopened.load_favorites();
        assert!(reopened.is_favorite("icse2025"));
        assert!(!reopened.load_from_cache());

        assert_eq!(reopened.toggle_favorite("icse2025"), Notice::FavoriteRemoved);
        assert!(!reopened.is_favorite("icse2025"));
    }

    #[test]
    fn test_notice_display() {
        let notice = Notice::CacheFallback {
            cached_on: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        };
        assert_eq!(notice.to_string(), "Using local cache from 2025-03-01");
        assert_eq!(Notice::UpdateFailed.to_string(), "Update failed, please check your network");
    }
}
