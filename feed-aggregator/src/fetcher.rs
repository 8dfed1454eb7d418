use crate::traits::FeedTransport;
use crate::types::{AggregatorError, FetchConfig, Result};
use async_trait::async_trait;
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// HTTP feed transport backed by a single shared `reqwest` client.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_millis(config.timeout_ms))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        let mut response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(AggregatorError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if let Some(content_length) = response.content_length() {
            let size_mb = content_length as usize / (1024 * 1024);
            if size_mb > self.config.max_feed_size_mb {
                return Err(AggregatorError::FeedTooLarge { size_mb });
            }
        }

        // Content-Length may be missing or wrong, so the limit is enforced
        // on the bytes actually read.
        let limit = self.max_feed_bytes();
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            body.extend_from_slice(&chunk);
            if body.len() > limit {
                return Err(AggregatorError::FeedTooLarge {
                    size_mb: body.len() / (1024 * 1024),
                });
            }
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn max_feed_bytes(&self) -> usize {
        self.config.max_feed_size_mb.saturating_mul(1024 * 1024)
    }

    fn backoff(&self) -> ExponentialBackoff<backoff::SystemClock> {
        let delay = Duration::from_millis(self.config.retry_delay_ms);
        ExponentialBackoff {
            current_interval: delay,
            initial_interval: delay,
            max_interval: delay * 8,
            multiplier: 2.0,
            max_elapsed_time: Some(Duration::from_millis(self.config.timeout_ms)),
            ..Default::default()
        }
    }
}

/// Only failures that might go away on their own are retried.
fn is_transient(error: &AggregatorError) -> bool {
    match error {
        AggregatorError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
        AggregatorError::Status { status, .. } => {
            *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
        }
        _ => false,
    }
}

#[async_trait]
impl FeedTransport for Fetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();
        let mut backoff = self.backoff();
        let mut attempt = 0;

        debug!("Fetching feed: {}", url);

        loop {
            match self.fetch_once(url).await {
                Ok(content) => {
                    info!(
                        "Fetched feed: {} ({} bytes, {}ms)",
                        url,
                        content.len(),
                        start_time.elapsed().as_millis()
                    );
                    return Ok(content);
                }
                Err(e) if attempt < self.config.max_retries && is_transient(&e) => {
                    attempt += 1;
                    match backoff.next_backoff() {
                        Some(delay) => {
                            warn!("Attempt {} failed for {}: {}, retrying in {:?}", attempt, url, e, delay);
                            tokio::time::sleep(delay).await;
                        }
                        None => return Err(e),
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}
