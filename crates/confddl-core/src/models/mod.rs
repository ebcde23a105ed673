//! Data models for conference deadline tracking.
//!
//! - `Conference`: one edition as displayed, also the cached record
//! - Raw feed shapes: `RawFeedItem`, `RawConf`, `RawTimelineItem`, `RawRank`
//! - Acceptance-rate shapes: `AcceptRatePayload`, `AcceptRateEntry`, `RateValue`

pub mod accept_rate;
pub mod conference;
pub mod feed;

pub use accept_rate::{AcceptRateEntry, AcceptRatePayload, RateValue};
pub use conference::{
    category_label, level_rank, Conference, NOT_AVAILABLE, TBD, UNKNOWN_CATEGORY, UNRANKED,
};
pub use feed::{RawConf, RawFeedItem, RawRank, RawTimelineItem};
