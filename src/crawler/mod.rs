//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The deduplicating, depth-bounded URL frontier
//! - HTTP fetching with per-host pacing
//! - HTML link extraction
//! - Worker pool orchestration

mod engine;
mod fetcher;
mod frontier;
mod parser;
mod result;

pub use engine::{Engine, ShutdownHandle};
pub use fetcher::{build_http_client, RateLimitedFetcher};
pub use frontier::{Admission, Frontier, FrontierEntry, FrontierStats};
pub use parser::{extract_links, extract_text, HtmlLinkExtractor, LinkExtractor};
pub use result::CrawlResult;

pub use crate::output::CrawlSummary;
