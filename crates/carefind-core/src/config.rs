use std::time::Duration;

use url::Url;

use crate::error::AppError;
use crate::models::ListingReference;
use crate::retry::RetryConfig;

pub const DEFAULT_BASE_URL: &str = "https://childcarefind.okdhs.org/";
pub const DEFAULT_SEARCH_PATH: &str = "providers";
pub const DEFAULT_QUERY_PARAM: &str = "zip-code";
pub const DEFAULT_PACE: Duration = Duration::from_secs(1);

/// Where the listing site lives and how politely to crawl it.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub base_url: Url,
    /// Path of the search endpoint, relative to `base_url`.
    pub search_path: String,
    /// Query parameter carrying the postal code.
    pub query_param: String,
    /// Pause after each processed listing.
    pub pace: Duration,
    pub retry: RetryConfig,
}

impl SiteConfig {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::ConfigError(format!("Invalid base URL '{base_url}': {e}")))?;
        match base_url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(AppError::ConfigError(format!(
                    "Base URL scheme '{scheme}' is not allowed (only http/https)"
                )));
            }
        }

        Ok(Self {
            base_url,
            search_path: DEFAULT_SEARCH_PATH.to_string(),
            query_param: DEFAULT_QUERY_PARAM.to_string(),
            pace: DEFAULT_PACE,
            retry: RetryConfig::default(),
        })
    }

    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_search(mut self, path: impl Into<String>, query_param: impl Into<String>) -> Self {
        self.search_path = path.into();
        self.query_param = query_param.into();
        self
    }

    /// Search-page URL for one postal code. The code is not validated.
    pub fn search_url(&self, postal_code: &str) -> Result<String, AppError> {
        let mut url = self
            .base_url
            .join(&self.search_path)
            .map_err(|e| AppError::ConfigError(format!("Invalid search path: {e}")))?;
        url.query_pairs_mut()
            .append_pair(&self.query_param, postal_code);
        Ok(url.into())
    }

    /// Absolute detail-page URL for a listing reference.
    pub fn resolve(&self, reference: &ListingReference) -> Result<String, AppError> {
        self.base_url
            .join(reference.as_str())
            .map(String::from)
            .map_err(|e| AppError::HttpError(format!("Invalid listing URL '{reference}': {e}")))
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            search_path: DEFAULT_SEARCH_PATH.to_string(),
            query_param: DEFAULT_QUERY_PARAM.to_string(),
            pace: DEFAULT_PACE,
            retry: RetryConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_carries_postal_code() {
        let config = SiteConfig::default();
        assert_eq!(
            config.search_url("73012").unwrap(),
            "https://childcarefind.okdhs.org/providers?zip-code=73012"
        );
    }

    #[test]
    fn search_url_encodes_unvalidated_input() {
        let config = SiteConfig::default();
        assert_eq!(
            config.search_url("730 12&x").unwrap(),
            "https://childcarefind.okdhs.org/providers?zip-code=730+12%26x"
        );
    }

    #[test]
    fn resolve_joins_relative_reference() {
        let config = SiteConfig::default();
        let url = config.resolve(&ListingReference::new("/providers/123")).unwrap();
        assert_eq!(url, "https://childcarefind.okdhs.org/providers/123");
    }

    #[test]
    fn resolve_keeps_absolute_reference() {
        let config = SiteConfig::new("http://localhost:8080/").unwrap();
        let url = config
            .resolve(&ListingReference::new("https://other.example/providers/9"))
            .unwrap();
        assert_eq!(url, "https://other.example/providers/9");
    }

    #[test]
    fn custom_search_endpoint() {
        let config = SiteConfig::new("http://localhost:8080/app/")
            .unwrap()
            .with_search("search", "zip");
        assert_eq!(
            config.search_url("1").unwrap(),
            "http://localhost:8080/app/search?zip=1"
        );
    }

    #[test]
    fn rejects_bad_base_url() {
        assert!(matches!(
            SiteConfig::new("not a url"),
            Err(AppError::ConfigError(_))
        ));
        assert!(matches!(
            SiteConfig::new("ftp://example.com/"),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.pace, Duration::from_secs(1));
        assert_eq!(config.retry.max_retries, 0);
    }
}
