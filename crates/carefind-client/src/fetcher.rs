use std::time::Duration;

use carefind_core::error::AppError;
use carefind_core::traits::Fetcher;
use reqwest::Client;

const USER_AGENT: &str = concat!("carefind/", env!("CARGO_PKG_VERSION"));

/// HTTP fetcher using reqwest.
///
/// Downloads raw HTML with a fixed User-Agent and timeout. Only transport
/// failures are errors: a non-success status is logged and its body is
/// returned like any other page.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    timeout_secs: u64,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, AppError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        let timeout_secs = timeout.as_secs();
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify(e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "Non-success status, parsing body anyway");
        }

        response
            .text()
            .await
            .map_err(|e| classify(e, self.timeout_secs))
    }
}

fn classify(e: reqwest::Error, timeout_secs: u64) -> AppError {
    if e.is_timeout() {
        AppError::Timeout(timeout_secs)
    } else if e.is_connect() {
        AppError::NetworkError(format!("Connection failed: {e}"))
    } else if e.is_body() || e.is_decode() {
        AppError::HttpError(format!("Failed to read response body: {e}"))
    } else {
        AppError::HttpError(e.to_string())
    }
}
