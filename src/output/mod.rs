//! Output module for delivering crawl results and summaries
//!
//! This module handles:
//! - The `ResultSink` contract the engine delivers results through
//! - Printing results to a terminal or any writer
//! - Recording crawl statistics

mod console;
pub mod stats;
mod traits;

pub use console::ConsoleSink;
pub use stats::{format_statistics, print_statistics, CrawlStats};
pub use traits::{CrawlSummary, DiscardSink, ResultSink};
