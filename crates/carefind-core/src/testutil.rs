//! Test utilities: mock implementations of all core traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::models::{Field, ListingReference, ProviderRecord};
use crate::traits::{Fetcher, ListingParser, RecordParser, RecordSink};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher serving canned responses.
///
/// Routed responses (by exact URL) take precedence. Otherwise each call pops
/// the first queued response; with an empty queue it returns a default page,
/// unless the fetcher is strict, in which case unknown URLs fail.
#[derive(Clone, Default)]
pub struct MockFetcher {
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    routes: Arc<Mutex<HashMap<String, Result<String, String>>>>,
    strict: bool,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    /// A fetcher that only answers routed URLs; anything else is a network error.
    pub fn routed() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Serve `html` for every request to `url`.
    pub fn route(self, url: &str, html: &str) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(html.to_string()));
        self
    }

    /// Fail every request to `url` with a network error.
    pub fn fail(self, url: &str, message: &str) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Err(message.to_string()));
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.requests.lock().unwrap().push(url.to_string());

        if let Some(routed) = self.routes.lock().unwrap().get(url) {
            return routed.clone().map_err(AppError::NetworkError);
        }

        let mut responses = self.responses.lock().unwrap();
        if !responses.is_empty() {
            return responses.remove(0);
        }
        if self.strict {
            Err(AppError::NetworkError(format!("no route for {url}")))
        } else {
            Ok("<html><body>default</body></html>".to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// MockListingParser / MockRecordParser
// ---------------------------------------------------------------------------

/// Listing parser that treats every non-blank line of the page as an href.
#[derive(Clone, Default)]
pub struct MockListingParser;

impl ListingParser for MockListingParser {
    fn parse_listings(&self, html: &str) -> Vec<ListingReference> {
        html.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ListingReference::new)
            .collect()
    }
}

/// Record parser that stores the trimmed page body as the provider name.
#[derive(Clone, Default)]
pub struct MockRecordParser;

impl RecordParser for MockRecordParser {
    fn parse_record(&self, html: &str, url: &str) -> ProviderRecord {
        let mut record = ProviderRecord::for_url(url);
        record.set(Field::ChildCareName, html.trim());
        record
    }
}

// ---------------------------------------------------------------------------
// MockSink
// ---------------------------------------------------------------------------

/// Mock sink that records every appended record.
#[derive(Clone, Default)]
pub struct MockSink {
    pub records: Arc<Mutex<Vec<ProviderRecord>>>,
    error: Arc<Mutex<Option<AppError>>>,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose next append fails with `error`.
    pub fn with_error(error: AppError) -> Self {
        Self {
            error: Arc::new(Mutex::new(Some(error))),
            ..Self::default()
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.get(Field::Url).to_string())
            .collect()
    }
}

impl RecordSink for MockSink {
    fn append(&mut self, record: &ProviderRecord) -> Result<(), AppError> {
        if let Some(e) = self.error.lock().unwrap().take() {
            return Err(e);
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}
