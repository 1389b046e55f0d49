//! Result sink trait and the crawl summary type
//!
//! A sink receives every result the engine delivers, one at a time, on the
//! task that drains the results channel.

use crate::crawler::{CrawlResult, FrontierStats};
use crate::output::stats::CrawlStats;
use std::time::Duration;

/// Consumes delivered crawl results
///
/// Called once per delivered result. Implementations must return promptly:
/// while `accept` runs, the results channel is not being drained, and
/// workers drop results that do not fit.
pub trait ResultSink {
    fn accept(&mut self, result: CrawlResult);
}

impl<S: ResultSink + ?Sized> ResultSink for &mut S {
    fn accept(&mut self, result: CrawlResult) {
        (**self).accept(result);
    }
}

impl<S: ResultSink + ?Sized> ResultSink for Box<S> {
    fn accept(&mut self, result: CrawlResult) {
        (**self).accept(result);
    }
}

/// Keeps every result in memory
impl ResultSink for Vec<CrawlResult> {
    fn accept(&mut self, result: CrawlResult) {
        self.push(result);
    }
}

/// Discards every result; the engine's statistics still count them
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

impl ResultSink for DiscardSink {
    fn accept(&mut self, _result: CrawlResult) {}
}

/// Summary of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// Counts over the results that reached the sink
    pub stats: CrawlStats,

    /// Results dropped because the results channel was full
    pub results_dropped: u64,

    /// Frontier counters at the end of the crawl
    pub frontier: FrontierStats,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

impl CrawlSummary {
    /// Results produced by workers, delivered or not
    pub fn total_attempts(&self) -> u64 {
        self.stats.total_results + self.results_dropped
    }
}
