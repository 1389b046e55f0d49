use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Frontier-Crawler
///
/// Every section has defaults, so an empty file (or no file at all) yields a
/// usable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Crawler behavior configuration
///
/// These are fixed for the lifetime of a crawl.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Depth ceiling; a URL discovered at `depth >= max_depth` is never queued
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Number of worker tasks in the pool
    pub workers: u32,

    /// Minimum time between requests to the same hostname (milliseconds)
    #[serde(rename = "per-host-delay")]
    pub per_host_delay: u64,

    /// Total per-request timeout (seconds)
    #[serde(rename = "fetch-timeout")]
    pub fetch_timeout: u64,

    /// Capacity of the pending-URL queue
    #[serde(rename = "frontier-capacity")]
    pub frontier_capacity: usize,

    /// Capacity of the results channel
    #[serde(rename = "results-capacity")]
    pub results_capacity: usize,

    /// How long an idle worker sleeps before polling the frontier again (milliseconds)
    #[serde(rename = "idle-poll")]
    pub idle_poll: u64,

    /// Maximum number of fetch attempts; 0 means unlimited
    #[serde(rename = "max-pages")]
    pub max_pages: u64,

    /// Only follow links that stay on the seed URL's host
    #[serde(rename = "stay-on-host")]
    pub stay_on_host: bool,
}

impl CrawlerConfig {
    pub fn per_host_delay(&self) -> Duration {
        Duration::from_millis(self.per_host_delay)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }

    pub fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll)
    }

    /// Returns the page budget, if one is configured
    pub fn page_budget(&self) -> Option<u64> {
        (self.max_pages > 0).then_some(self.max_pages)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            workers: 3,
            per_host_delay: 1000,
            fetch_timeout: 30,
            frontier_capacity: 1000,
            results_capacity: 100,
            idle_poll: 100,
            max_pages: 0,
            stay_on_host: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "FrontierCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/bot".to_string(),
        }
    }
}
