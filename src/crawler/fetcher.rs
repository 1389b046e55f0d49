//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with an identifying user agent
//! - Per-hostname politeness pacing
//! - Classifying each response into a `CrawlResult`
//!
//! Every failure is returned as data. The fetcher makes one attempt per call
//! and never follows redirects.

use crate::config::{Config, UserAgentConfig};
use crate::crawler::result::CrawlResult;
use crate::state::HostPacer;
use crate::url::{extract_host, normalize_url};
use crate::FetchError;
use reqwest::{header::LOCATION, redirect::Policy, Client};
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// Redirects are disabled so that 3xx responses reach the classifier.
///
/// # Example
///
/// ```no_run
/// use frontier_crawler::config::UserAgentConfig;
/// use frontier_crawler::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches single URLs while keeping a minimum gap between requests to the same host
#[derive(Debug)]
pub struct RateLimitedFetcher {
    client: Client,
    pacer: HostPacer,
}

impl RateLimitedFetcher {
    pub fn new(client: Client, per_host_delay: Duration) -> Self {
        Self {
            client,
            pacer: HostPacer::new(per_host_delay),
        }
    }

    /// Builds a fetcher from the user-agent and crawler sections of `config`
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.user_agent, config.crawler.fetch_timeout())?;
        Ok(Self::new(client, config.crawler.per_host_delay()))
    }

    pub fn pacer(&self) -> &HostPacer {
        &self.pacer
    }

    /// Fetches `url` once
    ///
    /// # Classification
    ///
    /// | Outcome | Result |
    /// |---------|--------|
    /// | URL does not parse | `Error`, no request made |
    /// | Transport failure or timeout | `Error` |
    /// | 3xx | `Redirect` with the `Location` header; body not read |
    /// | Any other status | `Fetched` with the body and status code |
    /// | Body read failure | `Error` with the status code kept |
    pub async fn fetch(&self, url: &str) -> CrawlResult {
        let mut result = CrawlResult::pending(url);

        let parsed = match normalize_url(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                result.mark_error(FetchError::InvalidUrl(e.to_string()));
                return result;
            }
        };

        // normalize_url guarantees a host
        let host = extract_host(&parsed).unwrap_or_default();
        self.pacer.wait_turn(&host).await;

        tracing::debug!("Fetching {}", parsed);

        let response = match self.client.get(parsed).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Request to {} failed: {}", url, e);
                result.mark_error(FetchError::from_transport(&e));
                return result;
            }
        };

        let status = response.status();

        if status.is_redirection() {
            let target = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            tracing::debug!("{} redirected ({}) to {:?}", url, status, target);
            result.mark_redirect(status.as_u16(), target);
            return result;
        }

        match response.text().await {
            Ok(body) => result.mark_fetched(status.as_u16(), body),
            Err(e) => {
                result.status_code = Some(status.as_u16());
                let error = if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Body(e.to_string())
                };
                result.mark_error(error);
            }
        }

        result
    }
}
