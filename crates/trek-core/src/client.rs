//! Rate-limited HTTP client for Wikipedia pages
//!
//! Pages are fetched one at a time and spaced out by a [`RateLimiter`]. Failed
//! requests are not retried; the error goes back to the caller.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::debug;

use crate::error::{Result, TrekError};

/// Default User-Agent, per Wikimedia's policy of identifying automated clients
const DEFAULT_USER_AGENT: &str = concat!(
    "trekpedia/",
    env!("CARGO_PKG_VERSION"),
    " (series and episode catalog extractor)"
);

/// Rate limiter to control request frequency
///
/// Ensures that requests are spaced at least `min_interval` apart.
pub struct RateLimiter {
    /// Minimum interval between requests
    min_interval: Duration,
    /// Timestamp of the last request
    last_request: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the specified requests per second
    ///
    /// # Errors
    /// `TrekError::InvalidConfig` when the rate does not give a representable
    /// interval (zero, negative, NaN or vanishingly small)
    ///
    /// # Example
    /// ```
    /// use trek_core::client::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(2.0).unwrap(); // 2 requests per second
    /// assert!(RateLimiter::new(0.0).is_err());
    /// ```
    pub fn new(requests_per_second: f64) -> Result<Self> {
        let min_interval = Duration::try_from_secs_f64(1.0 / requests_per_second).map_err(|_| {
            TrekError::InvalidConfig(format!(
                "requests_per_second must be positive, got {}",
                requests_per_second
            ))
        })?;
        let now = Instant::now();
        Ok(Self {
            min_interval,
            last_request: Arc::new(Mutex::new(now.checked_sub(min_interval).unwrap_or(now))),
        })
    }

    /// Wait until the minimum interval since the previous request has passed
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();

        if elapsed < self.min_interval {
            let wait_time = self.min_interval - elapsed;
            sleep(wait_time).await;
        }

        *last = Instant::now();
    }

    /// Get the minimum interval between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Maximum requests per second (default: 2.0)
    pub requests_per_second: f64,
    /// Request timeout in seconds (default: 10)
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 2.0,
            timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// HTTP client for the source wiki
pub struct WikiClient {
    /// Underlying HTTP client
    client: reqwest::Client,
    /// Rate limiter for request throttling
    rate_limiter: RateLimiter,
}

impl WikiClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let rate_limiter = RateLimiter::new(config.requests_per_second)?;

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            rate_limiter,
        })
    }

    /// Fetch the HTML of an absolute URL
    ///
    /// # Errors
    /// - `TrekError::NotFound` - Server returned 404
    /// - `TrekError::HttpError` - Network failure, timeout or any other
    ///   non-success status
    pub async fn fetch(&self, url: &str) -> Result<String> {
        self.rate_limiter.acquire().await;
        debug!(url, "fetching");

        let response = self.client.get(url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(TrekError::NotFound(url.to_string()));
        }

        let response = response.error_for_status()?;
        Ok(response.text().await?)
    }

    /// Get a reference to the rate limiter (for testing)
    #[cfg(test)]
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }
}
