//! Statistics over delivered crawl results
//!
//! The engine records every result it hands to the sink here, so the
//! final summary is available whatever sink is in use.

use crate::crawler::CrawlResult;
use crate::output::traits::CrawlSummary;
use crate::state::FetchStatus;
use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Write};

/// Running counts over delivered results
#[derive(Debug, Clone, Default)]
pub struct CrawlStats {
    /// Total number of results delivered
    pub total_results: u64,

    /// Count of results by terminal status
    pub by_status: HashMap<FetchStatus, u64>,

    /// Count of responses by HTTP status code
    pub by_status_code: BTreeMap<u16, u64>,

    /// Bytes of content fetched
    pub bytes_fetched: u64,

    /// Links discovered across all fetched pages
    pub links_found: u64,

    /// Deepest depth among delivered results
    pub max_depth_reached: u32,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one delivered result
    pub fn record(&mut self, result: &CrawlResult) {
        self.total_results += 1;
        *self.by_status.entry(result.status).or_insert(0) += 1;
        if let Some(code) = result.status_code {
            *self.by_status_code.entry(code).or_insert(0) += 1;
        }
        self.bytes_fetched += result.content.len() as u64;
        self.links_found += result.links.len() as u64;
        self.max_depth_reached = self.max_depth_reached.max(result.depth);
    }

    /// Returns the number of results with the given status
    pub fn count(&self, status: FetchStatus) -> u64 {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    /// Returns the share of fetched results as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_results == 0 {
            return 0.0;
        }
        (self.count(FetchStatus::Fetched) as f64 / self.total_results as f64) * 100.0
    }
}

/// Formats a crawl summary for the terminal
pub fn format_statistics(summary: &CrawlSummary) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_statistics(&mut out, summary);
    out
}

fn write_statistics(out: &mut String, summary: &CrawlSummary) -> fmt::Result {
    let stats = &summary.stats;

    writeln!(out, "=== Crawl Statistics ===\n")?;

    writeln!(out, "Overview:")?;
    writeln!(out, "  Fetch attempts: {}", summary.total_attempts())?;
    writeln!(out, "  Results delivered: {}", stats.total_results)?;
    writeln!(out, "  Results dropped: {}", summary.results_dropped)?;
    writeln!(out, "  Bytes fetched: {}", stats.bytes_fetched)?;
    writeln!(out, "  Links found: {}", stats.links_found)?;
    writeln!(out, "  Deepest page: {}", stats.max_depth_reached)?;
    writeln!(out, "  Elapsed: {:.2?}\n", summary.elapsed)?;

    writeln!(out, "Results by Status:")?;
    for status in FetchStatus::terminal_states() {
        writeln!(out, "  {}: {}", status, stats.count(status))?;
    }
    writeln!(out)?;

    if !stats.by_status_code.is_empty() {
        writeln!(out, "HTTP Status Codes:")?;
        for (code, count) in &stats.by_status_code {
            writeln!(out, "  {}: {}", code, count)?;
        }
        writeln!(out)?;
    }

    let frontier = &summary.frontier;
    writeln!(out, "Frontier:")?;
    writeln!(out, "  URLs seen: {}", frontier.seen)?;
    writeln!(out, "  URLs completed: {}", frontier.completed)?;
    writeln!(out, "  URLs dropped (queue full): {}\n", frontier.dropped)?;

    writeln!(
        out,
        "Success Rate: {:.1}% ({} / {} results fetched)",
        stats.success_rate(),
        stats.count(FetchStatus::Fetched),
        stats.total_results
    )
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(summary: &CrawlSummary) {
    print!("{}", format_statistics(summary));
}
