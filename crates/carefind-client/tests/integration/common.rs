use std::path::Path;
use std::time::Duration;

use carefind_core::SiteConfig;

pub const SEARCH_PAGE: &str = include_str!("../fixtures/search.html");
pub const DETAIL_PAGE: &str = include_str!("../fixtures/detail.html");
pub const SPARSE_PAGE: &str = include_str!("../fixtures/detail_sparse.html");

pub const SEARCH_73012: &str = "https://childcarefind.okdhs.org/providers?zip-code=73012";
pub const SEARCH_73013: &str = "https://childcarefind.okdhs.org/providers?zip-code=73013";
pub const SEARCH_73020: &str = "https://childcarefind.okdhs.org/providers?zip-code=73020";
pub const PROVIDER_123: &str = "https://childcarefind.okdhs.org/providers/123";
pub const PROVIDER_456: &str = "https://childcarefind.okdhs.org/providers/456";

/// Default site with pacing disabled.
pub fn site() -> SiteConfig {
    SiteConfig::default().with_pace(Duration::ZERO)
}

/// Header and data rows of a written table.
pub fn read_table(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (header, rows)
}
