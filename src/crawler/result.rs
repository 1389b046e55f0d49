//! The per-attempt crawl result

use crate::state::FetchStatus;
use crate::FetchError;
use chrono::{DateTime, Utc};

/// Outcome of one fetch attempt
///
/// Created `Pending` by the fetcher and moved into exactly one terminal
/// status. `links` is only ever populated on a `Fetched` result (by the
/// engine, after extraction), and `redirect_target` only on a `Redirect`.
#[derive(Debug, Clone)]
pub struct CrawlResult {
    /// The URL that was requested
    pub url: String,

    /// Link hops from the seed URL
    pub depth: u32,

    pub status: FetchStatus,

    /// HTTP status code, when a response was received
    pub status_code: Option<u16>,

    /// Response body (empty unless `Fetched`)
    pub content: String,

    /// Links discovered on the page (only when `Fetched`)
    pub links: Vec<String>,

    pub error: Option<FetchError>,

    /// Value of the `Location` header (only when `Redirect`)
    pub redirect_target: Option<String>,

    /// When the attempt finished
    pub fetched_at: DateTime<Utc>,
}

impl CrawlResult {
    /// Creates a pending result for `url`
    pub fn pending(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: 0,
            status: FetchStatus::Pending,
            status_code: None,
            content: String::new(),
            links: Vec::new(),
            error: None,
            redirect_target: None,
            fetched_at: Utc::now(),
        }
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Transitions to `Fetched` with the response body
    pub fn mark_fetched(&mut self, status_code: u16, content: String) {
        debug_assert_eq!(self.status, FetchStatus::Pending);
        self.status = FetchStatus::Fetched;
        self.status_code = Some(status_code);
        self.content = content;
        self.fetched_at = Utc::now();
    }

    /// Transitions to `Redirect`; the body is never read
    pub fn mark_redirect(&mut self, status_code: u16, target: Option<String>) {
        debug_assert_eq!(self.status, FetchStatus::Pending);
        self.status = FetchStatus::Redirect;
        self.status_code = Some(status_code);
        self.redirect_target = target;
        self.fetched_at = Utc::now();
    }

    /// Transitions to `Error`
    ///
    /// The status code is kept if a response arrived before the failure.
    pub fn mark_error(&mut self, error: FetchError) {
        debug_assert_eq!(self.status, FetchStatus::Pending);
        self.status = FetchStatus::Error;
        self.error = Some(error);
        self.fetched_at = Utc::now();
    }

    /// Attaches discovered links to a fetched result
    ///
    /// Returns false (and leaves the result untouched) for any other status.
    pub fn attach_links(&mut self, links: Vec<String>) -> bool {
        if self.status != FetchStatus::Fetched {
            return false;
        }
        self.links = links;
        true
    }
}
