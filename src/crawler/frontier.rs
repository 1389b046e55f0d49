//! URL frontier: deduplication, depth tracking, and a bounded pending queue
//!
//! The frontier is the crawl's only cycle breaker. A normalized URL is
//! admitted at most once for the lifetime of the frontier, at the depth it
//! was first seen with. Admission never blocks: when the pending queue is
//! full the URL is dropped (it stays marked as seen), trading completeness
//! for liveness under load.
//!
//! The frontier also tracks how many dequeued entries are still being
//! worked on, which lets the worker pool detect quiescence (nothing pending
//! and nothing in flight) instead of guessing from a timeout.

use crate::config::CrawlerConfig;
use crate::url::normalize_url;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Normalized URL (the dedup key)
    pub url: String,

    /// Link hops from the seed
    pub depth: u32,
}

/// What happened to a URL offered to [`Frontier::add_url`]
///
/// Purely informational: none of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Marked seen and placed on the pending queue
    Queued,
    /// Could not be parsed as an http(s) URL
    Invalid,
    /// Already seen
    Duplicate,
    /// `depth >= max_depth`
    TooDeep,
    /// Marked seen, but the queue was full
    Dropped,
    /// The frontier has been closed
    Closed,
}

/// Point-in-time counters for a frontier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrontierStats {
    /// Entries waiting on the queue
    pub pending: usize,
    /// Entries handed out and not yet completed
    pub in_flight: usize,
    /// Distinct normalized URLs ever admitted (including dropped ones)
    pub seen: usize,
    /// Entries completed by workers
    pub completed: usize,
    /// URLs dropped because the queue was full
    pub dropped: usize,
}

#[derive(Debug, Default)]
struct FrontierState {
    /// Visited set and depth map in one: presence marks a URL as seen
    depths: HashMap<String, u32>,
    queue: VecDeque<FrontierEntry>,
    in_flight: usize,
    completed: usize,
    dropped: usize,
    closed: bool,
}

/// The deduplicated, depth-bounded set of URLs pending a visit
#[derive(Debug)]
pub struct Frontier {
    max_depth: u32,
    capacity: usize,
    state: Mutex<FrontierState>,
}

impl Frontier {
    /// Creates a frontier with a fixed depth ceiling and queue capacity
    pub fn new(max_depth: u32, capacity: usize) -> Self {
        Self {
            max_depth,
            capacity,
            state: Mutex::new(FrontierState {
                queue: VecDeque::with_capacity(capacity.min(1024)),
                ..FrontierState::default()
            }),
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(config.max_depth, config.frontier_capacity)
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Offers a URL discovered at `depth`
    ///
    /// Never blocks and never fails. Malformed URLs, already-seen URLs, and
    /// URLs at or beyond the depth ceiling are ignored. A URL rejected for
    /// depth is not marked seen.
    pub fn add_url(&self, raw_url: &str, depth: u32) -> Admission {
        let normalized = match normalize_url(raw_url) {
            Ok(url) => String::from(url),
            Err(e) => {
                tracing::trace!("Ignoring unparseable URL {}: {}", raw_url, e);
                return Admission::Invalid;
            }
        };

        let mut state = self.lock();

        if state.closed {
            return Admission::Closed;
        }

        if state.depths.contains_key(&normalized) {
            return Admission::Duplicate;
        }

        if depth >= self.max_depth {
            return Admission::TooDeep;
        }

        state.depths.insert(normalized.clone(), depth);

        if state.queue.len() >= self.capacity {
            state.dropped += 1;
            tracing::debug!("Frontier full, dropping {}", normalized);
            return Admission::Dropped;
        }

        state.queue.push_back(FrontierEntry {
            url: normalized,
            depth,
        });
        Admission::Queued
    }

    /// Takes the next pending URL without waiting
    ///
    /// Returns `None` immediately when nothing is pending or the frontier is
    /// closed. A returned entry counts as in flight until
    /// [`complete`](Self::complete) is called for it.
    pub fn get_url(&self) -> Option<FrontierEntry> {
        let mut state = self.lock();
        if state.closed {
            return None;
        }
        let entry = state.queue.pop_front()?;
        state.in_flight += 1;
        Some(entry)
    }

    /// Marks one previously dequeued entry as finished
    pub fn complete(&self) {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        state.completed += 1;
    }

    /// Returns true when nothing is pending and nothing is in flight
    pub fn is_quiescent(&self) -> bool {
        let state = self.lock();
        state.queue.is_empty() && state.in_flight == 0
    }

    /// Closes the frontier
    ///
    /// Pending entries are discarded, later `add_url` calls are ignored, and
    /// `get_url` returns `None` from now on. Closing twice is harmless.
    pub fn close(&self) {
        let mut state = self.lock();
        if !state.closed {
            tracing::debug!("Closing frontier with {} pending URLs", state.queue.len());
        }
        state.closed = true;
        state.queue.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Number of URLs waiting on the queue
    pub fn pending_count(&self) -> usize {
        self.lock().queue.len()
    }

    /// Returns the recorded depth of a URL, if it has been seen
    pub fn depth_of(&self, raw_url: &str) -> Option<u32> {
        let normalized = normalize_url(raw_url).ok()?;
        self.lock().depths.get(normalized.as_str()).copied()
    }

    pub fn stats(&self) -> FrontierStats {
        let state = self.lock();
        FrontierStats {
            pending: state.queue.len(),
            in_flight: state.in_flight,
            seen: state.depths.len(),
            completed: state.completed,
            dropped: state.dropped,
        }
    }
}
