//! Bounded retry with exponential backoff for page fetches.
//!
//! Wraps any [`Fetcher`] so that transient transport failures (timeouts,
//! connection resets) are retried a bounded number of times before the
//! failure is handed back to the caller. The default policy makes a single
//! attempt, so wrapping a fetcher changes nothing until retries are enabled.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use carefind_core::retry::{RetryConfig, RetryingFetcher};
//!
//! # use carefind_core::traits::Fetcher;
//! # #[derive(Clone)] struct MyFetcher;
//! # impl Fetcher for MyFetcher {
//! #     async fn fetch(&self, _: &str) -> Result<String, carefind_core::error::AppError> { todo!() }
//! # }
//! let config = RetryConfig::new(3).with_base_delay(Duration::from_millis(500));
//! let fetcher = RetryingFetcher::new(MyFetcher, config);
//! ```

use std::time::Duration;

use crate::error::AppError;
use crate::traits::Fetcher;

/// Retry policy: attempt count and backoff schedule.
///
/// Delay before retry `n` (1-indexed) is `base_delay * 2^(n-1)`, capped at
/// `max_delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries after the first attempt. `0` means a single attempt.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Delay before the given retry (1-indexed).
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        let delay = self.base_delay.saturating_mul(1u32 << exponent);
        std::cmp::min(delay, self.max_delay)
    }
}

/// A [`Fetcher`] wrapper that retries retryable failures.
///
/// Non-retryable errors (see [`AppError::is_retryable`]) are returned
/// immediately.
#[derive(Clone)]
pub struct RetryingFetcher<F> {
    inner: F,
    config: RetryConfig,
}

impl<F: Fetcher> RetryingFetcher<F> {
    pub fn new(inner: F, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

impl<F: Fetcher> Fetcher for RetryingFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        let mut retry = 0;
        loop {
            match self.inner.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && retry < self.config.max_retries => {
                    retry += 1;
                    let delay = self.config.delay_for_retry(retry);
                    tracing::warn!(
                        %url,
                        error = %e,
                        retry,
                        delay_ms = %delay.as_millis(),
                        "Fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
