use std::future::Future;

use crate::error::AppError;
use crate::models::{ListingReference, ProviderRecord};

/// Fetches raw HTML content from a URL.
///
/// Only transport failures are errors; a page served with a non-success
/// status still yields its body.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Finds listing references on a search-result page.
pub trait ListingParser: Send + Sync + Clone {
    /// References in document order, duplicates included.
    fn parse_listings(&self, html: &str) -> Vec<ListingReference>;
}

/// Turns a detail page into a provider record.
///
/// Missing markup never fails: the affected fields keep the sentinel.
pub trait RecordParser: Send + Sync + Clone {
    fn parse_record(&self, html: &str, url: &str) -> ProviderRecord;
}

/// Append-only destination for provider records.
pub trait RecordSink {
    /// Write one record and flush it before returning.
    fn append(&mut self, record: &ProviderRecord) -> Result<(), AppError>;
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn append(&mut self, record: &ProviderRecord) -> Result<(), AppError> {
        (**self).append(record)
    }
}

/// A sink that discards every record.
#[derive(Debug, Clone, Default)]
pub struct NullSink;

impl RecordSink for NullSink {
    fn append(&mut self, _record: &ProviderRecord) -> Result<(), AppError> {
        Ok(())
    }
}
