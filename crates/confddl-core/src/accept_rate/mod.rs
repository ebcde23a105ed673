//! Acceptance-rate data: the bundled index, its offline builder, and the
//! resolver that attaches a display string to each conference.

pub mod builder;
pub mod index;
pub mod resolver;

pub use builder::{build_index, BuildReport};
pub use index::AcceptRateIndex;
pub use resolver::{AcceptRateResolver, RateLookupError};
