pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod retry;
pub mod selectors;
pub mod traits;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use config::SiteConfig;
pub use error::AppError;
pub use models::{ACCEPTED, AgeBand, Field, ListingReference, ProviderRecord, SENTINEL, Weekday};
pub use pipeline::{Harvester, RunSummary};
pub use retry::{RetryConfig, RetryingFetcher};
pub use selectors::SelectorTable;
pub use traits::{Fetcher, ListingParser, NullSink, RecordParser, RecordSink};
