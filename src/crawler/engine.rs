//! Crawl engine - worker pool orchestration
//!
//! The engine seeds the frontier, runs a fixed pool of worker tasks against
//! it, and drains their results into a sink. Each worker loops through:
//!
//! 1. Poll the frontier for the next URL
//! 2. Fetch it through the rate-limited fetcher
//! 3. On success, extract links and offer them back to the frontier at `depth + 1`
//! 4. Hand the result to the bounded results channel (dropped if full)
//!
//! A worker that finds the frontier empty keeps polling while any sibling
//! still has a page in flight, and exits once the frontier is quiescent or
//! closed.

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::RateLimitedFetcher;
use crate::crawler::frontier::{Admission, Frontier, FrontierEntry};
use crate::crawler::parser::{HtmlLinkExtractor, LinkExtractor};
use crate::crawler::result::CrawlResult;
use crate::output::{CrawlStats, CrawlSummary, ResultSink};
use crate::state::FetchStatus;
use crate::url::{normalize_url, same_site};
use crate::CrawlError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, error::TrySendError};
use url::Url;

/// Owns the frontier and fetcher for one crawl run
pub struct Engine {
    config: CrawlerConfig,
    frontier: Arc<Frontier>,
    fetcher: Arc<RateLimitedFetcher>,
    extractor: Arc<dyn LinkExtractor>,
}

/// Stops a running crawl by closing its frontier
///
/// Workers finish the page they are on and then exit.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    frontier: Arc<Frontier>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        tracing::info!("Shutdown requested, closing frontier");
        self.frontier.close();
    }
}

/// Shared by every worker of one crawl
struct WorkerContext {
    frontier: Arc<Frontier>,
    fetcher: Arc<RateLimitedFetcher>,
    extractor: Arc<dyn LinkExtractor>,
    /// Seed URL when links are restricted to the seed's host
    scope: Option<Url>,
    idle_poll: Duration,
    page_budget: Option<u64>,
    pages_started: AtomicU64,
    results_dropped: AtomicU64,
}

/// Marks a dequeued entry complete when dropped, even if the worker panics
struct InFlight<'a>(&'a Frontier);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.complete();
    }
}

impl Engine {
    /// Creates an engine that extracts links from HTML
    pub fn new(config: &Config) -> Result<Self, CrawlError> {
        Self::with_extractor(config, Arc::new(HtmlLinkExtractor))
    }

    /// Creates an engine with a custom link extractor
    pub fn with_extractor(
        config: &Config,
        extractor: Arc<dyn LinkExtractor>,
    ) -> Result<Self, CrawlError> {
        crate::config::validate(config)?;
        let fetcher = RateLimitedFetcher::from_config(config)?;
        Self::from_parts(config.crawler.clone(), fetcher, extractor)
    }

    /// Assembles an engine from already-built parts
    ///
    /// The crawler section is validated here, so a pool with no workers or
    /// a zero-capacity channel is rejected before any crawl starts.
    pub fn from_parts(
        config: CrawlerConfig,
        fetcher: RateLimitedFetcher,
        extractor: Arc<dyn LinkExtractor>,
    ) -> Result<Self, CrawlError> {
        crate::config::validate_crawler(&config)?;
        Ok(Self {
            frontier: Arc::new(Frontier::from_config(&config)),
            fetcher: Arc::new(fetcher),
            extractor,
            config,
        })
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            frontier: self.frontier.clone(),
        }
    }

    /// Crawls outward from `start_url` until the frontier is exhausted
    ///
    /// Blocks until every worker has exited and every delivered result has
    /// been handed to `sink`. Only setup problems are returned as errors: an
    /// unusable seed URL, or a frontier that was already closed. Per-page
    /// failures arrive at the sink as `Error` results.
    pub async fn crawl<S>(&self, start_url: &str, sink: &mut S) -> Result<CrawlSummary, CrawlError>
    where
        S: ResultSink + ?Sized,
    {
        let seed = normalize_url(start_url)?;

        if self.frontier.is_closed() {
            return Err(CrawlError::FrontierClosed);
        }

        let started = Instant::now();
        tracing::info!(
            "Starting crawl of {} ({} workers, max depth {})",
            seed,
            self.config.workers,
            self.config.max_depth
        );

        if self.frontier.add_url(seed.as_str(), 0) != Admission::Queued {
            tracing::warn!("Seed URL {} was not admitted to the frontier", seed);
        }

        let context = Arc::new(WorkerContext {
            frontier: self.frontier.clone(),
            fetcher: self.fetcher.clone(),
            extractor: self.extractor.clone(),
            scope: self.config.stay_on_host.then(|| seed.clone()),
            idle_poll: self.config.idle_poll(),
            page_budget: self.config.page_budget(),
            pages_started: AtomicU64::new(0),
            results_dropped: AtomicU64::new(0),
        });

        let (tx, mut rx) = mpsc::channel(self.config.results_capacity);

        let handles: Vec<_> = (0..self.config.workers)
            .map(|id| tokio::spawn(run_worker(id, context.clone(), tx.clone())))
            .collect();

        // The channel closes once every worker has dropped its sender
        drop(tx);

        let workers = async {
            for handle in handles {
                if let Err(e) = handle.await {
                    tracing::error!("Worker task failed: {}", e);
                }
            }
        };

        let consumer = async {
            let mut stats = CrawlStats::new();
            while let Some(result) = rx.recv().await {
                stats.record(&result);
                sink.accept(result);
            }
            stats
        };

        let ((), stats) = tokio::join!(workers, consumer);

        self.frontier.close();

        let summary = CrawlSummary {
            stats,
            results_dropped: context.results_dropped.load(Ordering::Relaxed),
            frontier: self.frontier.stats(),
            elapsed: started.elapsed(),
        };

        tracing::info!(
            "Crawl completed: {} results in {:?} ({} results dropped, {} URLs dropped)",
            summary.stats.total_results,
            summary.elapsed,
            summary.results_dropped,
            summary.frontier.dropped
        );

        Ok(summary)
    }
}

async fn run_worker(id: u32, ctx: Arc<WorkerContext>, results: mpsc::Sender<CrawlResult>) {
    tracing::debug!("Worker {} started", id);

    loop {
        let Some(entry) = ctx.frontier.get_url() else {
            if ctx.frontier.is_closed() || ctx.frontier.is_quiescent() {
                break;
            }
            tokio::time::sleep(ctx.idle_poll).await;
            continue;
        };
        let _in_flight = InFlight(&ctx.frontier);

        if !ctx.take_page() {
            tracing::info!("Page budget exhausted, closing frontier");
            ctx.frontier.close();
            break;
        }

        let result = ctx.process(entry).await;
        ctx.report(&results, result);
    }

    tracing::debug!("Worker {} exiting", id);
}

impl WorkerContext {
    /// Claims one page from the budget; false once it is spent
    fn take_page(&self) -> bool {
        let started = self.pages_started.fetch_add(1, Ordering::Relaxed);
        self.page_budget.map_or(true, |budget| started < budget)
    }

    async fn process(&self, entry: FrontierEntry) -> CrawlResult {
        let mut result = self.fetcher.fetch(&entry.url).await.with_depth(entry.depth);

        if result.status != FetchStatus::Fetched {
            tracing::debug!("{} finished as {}", entry.url, result.status);
            return result;
        }

        let Ok(page_url) = Url::parse(&entry.url) else {
            return result;
        };

        let links = self.extractor.extract(&result.content, &page_url);
        let mut queued = 0;
        for link in &links {
            if !self.in_scope(link) {
                continue;
            }
            if self.frontier.add_url(link, entry.depth + 1) == Admission::Queued {
                queued += 1;
            }
        }
        tracing::debug!(
            "{} (depth {}): {} links, {} queued",
            entry.url,
            entry.depth,
            links.len(),
            queued
        );

        result.attach_links(links);
        result
    }

    fn in_scope(&self, link: &str) -> bool {
        match &self.scope {
            None => true,
            Some(seed) => Url::parse(link).map_or(false, |url| same_site(seed, &url)),
        }
    }

    /// Delivers a result without waiting; a full channel drops it
    fn report(&self, results: &mpsc::Sender<CrawlResult>, result: CrawlResult) {
        match results.try_send(result) {
            Ok(()) => {}
            Err(TrySendError::Full(result)) => {
                self.results_dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Results channel full, dropping result for {}", result.url);
            }
            Err(TrySendError::Closed(result)) => {
                tracing::debug!("Results channel closed, discarding {}", result.url);
            }
        }
    }
}
