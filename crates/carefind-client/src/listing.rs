use std::sync::Arc;

use carefind_core::error::AppError;
use carefind_core::models::ListingReference;
use carefind_core::selectors::SelectorTable;
use carefind_core::traits::ListingParser;
use scraper::Html;

use crate::selectors::CompiledSelectors;

/// Reads listing-card links off a search-result page.
#[derive(Clone)]
pub struct HtmlListingParser {
    selectors: Arc<CompiledSelectors>,
}

impl HtmlListingParser {
    pub fn new(selectors: Arc<CompiledSelectors>) -> Self {
        Self { selectors }
    }

    pub fn from_table(table: &SelectorTable) -> Result<Self, AppError> {
        Ok(Self::new(Arc::new(CompiledSelectors::compile(table)?)))
    }
}

impl ListingParser for HtmlListingParser {
    /// Hrefs of matching cards in document order. Cards without an href are
    /// skipped; duplicates are kept.
    fn parse_listings(&self, html: &str) -> Vec<ListingReference> {
        let document = Html::parse_document(html);
        document
            .select(&self.selectors.listing_card)
            .filter_map(|card| card.value().attr("href"))
            .map(ListingReference::new)
            .collect()
    }
}
