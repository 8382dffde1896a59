use std::fmt;

use crate::config::SiteConfig;
use crate::error::AppError;
use crate::models::{Field, ListingReference, ProviderRecord};
use crate::retry::RetryingFetcher;
use crate::traits::{Fetcher, ListingParser, RecordParser, RecordSink};

/// Counters for one harvesting run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub postal_codes: usize,
    /// Postal codes whose search yielded no listings (including failed fetches).
    pub empty_postal_codes: usize,
    pub listings_found: usize,
    pub records_written: usize,
    /// Listings dropped because their detail page could not be fetched.
    pub listings_skipped: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} postal codes ({} empty), {} listings found, {} records written, {} skipped",
            self.postal_codes,
            self.empty_postal_codes,
            self.listings_found,
            self.records_written,
            self.listings_skipped
        )
    }
}

/// Orchestrates the harvest: search page → listing references → detail pages → sink.
///
/// Generic over the fetcher, both parsers and the sink so every stage can be
/// swapped for a mock. Runs strictly sequentially: one fetch in flight, a
/// fixed pause after each listing.
pub struct Harvester<F, L, R, S>
where
    F: Fetcher,
    L: ListingParser,
    R: RecordParser,
    S: RecordSink,
{
    fetcher: RetryingFetcher<F>,
    listings: L,
    records: R,
    sink: S,
    site: SiteConfig,
}

impl<F, L, R, S> Harvester<F, L, R, S>
where
    F: Fetcher,
    L: ListingParser,
    R: RecordParser,
    S: RecordSink,
{
    /// Create a harvester. Fetches go through the retry policy in `site.retry`.
    pub fn new(fetcher: F, listings: L, records: R, sink: S, site: SiteConfig) -> Self {
        Self {
            fetcher: RetryingFetcher::new(fetcher, site.retry.clone()),
            listings,
            records,
            sink,
            site,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Listing references for one postal code, in document order.
    ///
    /// A failed search fetch is logged and yields no references.
    pub async fn discover(&self, postal_code: &str) -> Vec<ListingReference> {
        let url = match self.site.search_url(postal_code) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(%postal_code, error = %e, "Could not build search URL");
                return Vec::new();
            }
        };

        tracing::info!(%postal_code, %url, "Searching listings");
        let html = match self.fetcher.fetch(&url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(%postal_code, error = %e, "Search fetch failed");
                return Vec::new();
            }
        };

        let references = self.listings.parse_listings(&html);
        tracing::info!(%postal_code, count = references.len(), "Listing cards found");
        references
    }

    /// Fetch and parse one detail page.
    ///
    /// Returns `None` (after logging) when the page cannot be fetched; no
    /// partial record is produced in that case.
    pub async fn extract(&self, reference: &ListingReference) -> Option<ProviderRecord> {
        let url = match self.site.resolve(reference) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(%reference, error = %e, "Skipping listing");
                return None;
            }
        };

        tracing::info!(%url, "Processing listing");
        match self.fetcher.fetch(&url).await {
            Ok(html) => Some(self.records.parse_record(&html, &url)),
            Err(e) => {
                tracing::warn!(%url, error = %e, "Detail fetch failed, skipping listing");
                None
            }
        }
    }

    /// Extract one listing and append it to the sink.
    ///
    /// Returns whether a record was written. Only sink failures are errors.
    pub async fn harvest_listing(&mut self, reference: &ListingReference) -> Result<bool, AppError> {
        let Some(record) = self.extract(reference).await else {
            return Ok(false);
        };

        self.sink.append(&record)?;
        tracing::info!(
            url = %record.get(Field::Url),
            filled = record.filled_count(),
            "Record written"
        );
        tracing::debug!(record = ?record.iter().collect::<Vec<_>>(), "Record fields");
        Ok(true)
    }

    /// Harvest every postal code in order.
    ///
    /// Transport failures never abort the run; a sink failure does, since
    /// every later record would be lost too.
    pub async fn run<P: AsRef<str>>(&mut self, postal_codes: &[P]) -> Result<RunSummary, AppError> {
        let mut summary = RunSummary::default();

        for postal_code in postal_codes {
            let postal_code = postal_code.as_ref();
            summary.postal_codes += 1;

            let references = self.discover(postal_code).await;
            if references.is_empty() {
                tracing::info!(%postal_code, "No listings to process");
                summary.empty_postal_codes += 1;
                continue;
            }
            summary.listings_found += references.len();

            for reference in &references {
                if self.harvest_listing(reference).await? {
                    summary.records_written += 1;
                } else {
                    summary.listings_skipped += 1;
                }
                self.pace().await;
            }
        }

        tracing::info!(%summary, "Run complete");
        Ok(summary)
    }

    async fn pace(&self) {
        if !self.site.pace.is_zero() {
            tokio::time::sleep(self.site.pace).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::models::SENTINEL;
    use crate::retry::RetryConfig;
    use crate::testutil::*;

    const SEARCH_73012: &str = "https://childcarefind.okdhs.org/providers?zip-code=73012";
    const SEARCH_73013: &str = "https://childcarefind.okdhs.org/providers?zip-code=73013";

    fn site() -> SiteConfig {
        SiteConfig::default().with_pace(Duration::ZERO)
    }

    fn harvester(
        fetcher: MockFetcher,
        sink: MockSink,
    ) -> Harvester<MockFetcher, MockListingParser, MockRecordParser, MockSink> {
        Harvester::new(fetcher, MockListingParser, MockRecordParser, sink, site())
    }

    #[tokio::test]
    async fn discover_returns_references_in_document_order() {
        let fetcher = MockFetcher::routed().route(SEARCH_73012, "/providers/2\n/providers/1\n/providers/2");
        let h = harvester(fetcher, MockSink::new());

        let refs = h.discover("73012").await;
        let refs: Vec<_> = refs.iter().map(|r| r.as_str()).collect();
        assert_eq!(refs, vec!["/providers/2", "/providers/1", "/providers/2"]);
    }

    #[tokio::test]
    async fn discover_fetch_failure_yields_empty() {
        let fetcher = MockFetcher::routed().fail(SEARCH_73012, "dns failure");
        let h = harvester(fetcher, MockSink::new());

        assert!(h.discover("73012").await.is_empty());
    }

    #[tokio::test]
    async fn extract_sets_absolute_url() {
        let fetcher = MockFetcher::routed()
            .route("https://childcarefind.okdhs.org/providers/123", "Little Sprouts");
        let h = harvester(fetcher, MockSink::new());

        let record = h.extract(&ListingReference::new("/providers/123")).await.unwrap();
        assert_eq!(
            record.get(Field::Url),
            "https://childcarefind.okdhs.org/providers/123"
        );
        assert_eq!(record.get(Field::ChildCareName), "Little Sprouts");
        assert_eq!(record.get(Field::Email), SENTINEL);
    }

    #[tokio::test]
    async fn extract_fetch_failure_yields_none() {
        let fetcher = MockFetcher::routed();
        let h = harvester(fetcher, MockSink::new());

        assert!(h.extract(&ListingReference::new("/providers/404")).await.is_none());
    }

    #[tokio::test]
    async fn run_skips_failed_postal_code_and_listing() {
        let fetcher = MockFetcher::routed()
            .fail(SEARCH_73012, "timeout")
            .route(SEARCH_73013, "/providers/1\n/providers/2")
            .route("https://childcarefind.okdhs.org/providers/1", "One")
            .fail("https://childcarefind.okdhs.org/providers/2", "reset");
        let sink = MockSink::new();
        let mut h = harvester(fetcher.clone(), sink.clone());

        let summary = h.run(&["73012", "73013"]).await.unwrap();

        assert_eq!(
            summary,
            RunSummary {
                postal_codes: 2,
                empty_postal_codes: 1,
                listings_found: 2,
                records_written: 1,
                listings_skipped: 1,
            }
        );
        assert_eq!(sink.urls(), vec!["https://childcarefind.okdhs.org/providers/1"]);
        assert_eq!(fetcher.requests().len(), 4);
    }

    #[tokio::test]
    async fn run_processes_duplicate_references_independently() {
        let fetcher = MockFetcher::routed()
            .route(SEARCH_73012, "/providers/7")
            .route(SEARCH_73013, "/providers/7")
            .route("https://childcarefind.okdhs.org/providers/7", "Seven");
        let sink = MockSink::new();
        let mut h = harvester(fetcher, sink.clone());

        let summary = h.run(&["73012", "73013"]).await.unwrap();
        assert_eq!(summary.records_written, 2);
        assert_eq!(sink.records.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn sink_error_aborts_run() {
        let fetcher = MockFetcher::routed()
            .route(SEARCH_73012, "/providers/1\n/providers/2")
            .route("https://childcarefind.okdhs.org/providers/1", "One")
            .route("https://childcarefind.okdhs.org/providers/2", "Two");
        let sink = MockSink::with_error(AppError::SinkError("disk full".into()));
        let mut h = harvester(fetcher.clone(), sink);

        let err = h.run(&["73012"]).await.unwrap_err();
        assert!(matches!(err, AppError::SinkError(_)));
        assert_eq!(fetcher.requests().len(), 2);
    }

    #[tokio::test]
    async fn retry_policy_applies_to_fetches() {
        let fetcher = MockFetcher::with_responses(vec![
            Err(AppError::Timeout(30)),
            Ok("/providers/1".into()),
            Ok("One".into()),
        ]);
        let site = site().with_retry(RetryConfig::new(1).with_base_delay(Duration::ZERO));
        let sink = MockSink::new();
        let mut h = Harvester::new(
            fetcher.clone(),
            MockListingParser,
            MockRecordParser,
            sink.clone(),
            site,
        );

        let summary = h.run(&["73012"]).await.unwrap();
        assert_eq!(summary.records_written, 1);
        assert_eq!(fetcher.requests().len(), 3);
    }

    #[test]
    fn summary_display() {
        let summary = RunSummary {
            postal_codes: 3,
            empty_postal_codes: 1,
            listings_found: 4,
            records_written: 3,
            listings_skipped: 1,
        };
        assert_eq!(
            summary.to_string(),
            "3 postal codes (1 empty), 4 listings found, 3 records written, 1 skipped"
        );
    }
}
