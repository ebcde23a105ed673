//! Network access for the conference feed and acceptance-rate files.
//!
//! `Transport` is the seam: `HttpTransport` talks to the network (and reads
//! local paths), tests substitute in-memory fakes. `FeedClient` layers the
//! mirror loop and the feed sanity check on top.

pub mod client;
pub mod error;
pub mod transport;

pub use client::{looks_like_feed, FeedClient, DEFAULT_FEED_URL};
pub use error::ApiError;
pub use transport::{is_remote, HttpTransport, Transport, TransportResponse};
