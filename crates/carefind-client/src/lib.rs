pub mod fetcher;
pub mod listing;
pub mod record;
pub mod selectors;

pub use fetcher::ReqwestFetcher;
pub use listing::HtmlListingParser;
pub use record::HtmlRecordParser;
pub use selectors::CompiledSelectors;

use std::sync::Arc;

use carefind_core::error::AppError;
use carefind_core::selectors::SelectorTable;

/// Build both parsers from one table, sharing the compiled selectors.
pub fn parsers(table: &SelectorTable) -> Result<(HtmlListingParser, HtmlRecordParser), AppError> {
    let compiled = Arc::new(CompiledSelectors::compile(table)?);
    Ok((
        HtmlListingParser::new(Arc::clone(&compiled)),
        HtmlRecordParser::new(compiled),
    ))
}
