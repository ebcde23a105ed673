//! confddl-core: conference deadline tracking with offline support.
//!
//! This crate holds everything below the user interface:
//!
//! - `api`: HTTP transport and the conference feed client
//! - `models`: conference records, raw feed shapes, acceptance-rate payloads
//! - `deadline`: picks the relevant deadline per edition and converts it to display time
//! - `ingest`: turns the YAML feed into `Conference` records
//! - `merge`: keeps one record per conference id
//! - `accept_rate`: the bundled acceptance-rate index, its builder and the resolver
//! - `cache`: key-value storage backends and the staged cache writer
//! - `store`: the orchestrator that ties the above together
//! - `config`: user configuration

pub mod accept_rate;
pub mod api;
pub mod cache;
pub mod config;
pub mod deadline;
pub mod ingest;
pub mod merge;
pub mod models;
pub mod store;
pub mod utils;

pub use accept_rate::{AcceptRateIndex, AcceptRateResolver};
pub use api::{ApiError, FeedClient, HttpTransport, Transport};
pub use cache::{CacheManager, FileStorage, MemoryStorage, Storage};
pub use config::Config;
pub use models::Conference;
pub use store::{ConferenceStore, FetchOutcome, Notice};
