use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Tracks the pacing state of one hostname
#[derive(Debug, Clone, Default)]
pub struct HostState {
    /// Number of requests granted to this host
    pub request_count: u32,

    /// Start time of the most recently granted request
    ///
    /// This may lie in the future while a reserved request is still waiting.
    pub last_request_time: Option<Instant>,
}

impl HostState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the earliest instant at which the next request may start
    pub fn next_slot(&self, delay: Duration, now: Instant) -> Instant {
        match self.last_request_time {
            Some(last) if now < last + delay => last + delay,
            _ => now,
        }
    }

    /// Claims the next slot and records it as the last request time
    pub fn reserve(&mut self, delay: Duration, now: Instant) -> Instant {
        let slot = self.next_slot(delay, now);
        self.request_count += 1;
        self.last_request_time = Some(slot);
        slot
    }
}

/// Per-hostname politeness pacing
///
/// All hosts share one mutex, but it is held only while a slot is computed
/// and recorded. The wait for the slot happens after the lock is released,
/// so a slow host never delays requests to another host.
#[derive(Debug)]
pub struct HostPacer {
    delay: Duration,
    hosts: Mutex<HashMap<String, HostState>>,
}

impl HostPacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            hosts: Mutex::new(HashMap::new()),
        }
    }

    /// Reserves the next request slot for `host`
    ///
    /// Concurrent callers for the same host receive slots spaced at least
    /// `delay` apart, in the order they acquired the lock.
    pub fn reserve(&self, host: &str, now: Instant) -> Instant {
        let mut hosts = self.hosts.lock().unwrap_or_else(|e| e.into_inner());
        let slot = hosts
            .entry(host.to_string())
            .or_insert_with(HostState::new)
            .reserve(self.delay, now);
        tracing::trace!(
            "Pacing {}: slot in {:?}",
            host,
            slot.saturating_duration_since(now)
        );
        slot
    }

    /// Waits until a request to `host` is allowed to start
    pub async fn wait_turn(&self, host: &str) {
        let slot = self.reserve(host, Instant::now());
        tokio::time::sleep_until(slot).await;
    }

    /// Returns the number of requests granted to `host` so far
    pub fn request_count(&self, host: &str) -> u32 {
        let hosts = self.hosts.lock().unwrap_or_else(|e| e.into_inner());
        hosts.get(host).map_or(0, |state| state.request_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(200);

    #[test]
    fn test_new_host_state() {
        let state = HostState::new();
        assert_eq!(state.request_count, 0);
        assert!(state.last_request_time.is_none());
    }

    #[test]
    fn test_first_request_is_immediate() {
        let state = HostState::new();
        let now = Instant::now();
        assert_eq!(state.next_slot(DELAY, now), now);
    }

    #[test]
    fn test_request_too_soon_is_pushed_back() {
        let mut state = HostState::new();
        let now = Instant::now();
        state.reserve(DELAY, now);

        let soon = now + Duration::from_millis(50);
        assert_eq!(state.next_slot(DELAY, soon), now + DELAY);
    }

    #[test]
    fn test_request_after_delay_is_immediate() {
        let mut state = HostState::new();
        let now = Instant::now();
        state.reserve(DELAY, now);

        let later = now + Duration::from_millis(250);
        assert_eq!(state.next_slot(DELAY, later), later);
    }

    #[test]
    fn test_reserve_records_request() {
        let mut state = HostState::new();
        let now = Instant::now();

        let slot = state.reserve(DELAY, now);

        assert_eq!(state.request_count, 1);
        assert_eq!(state.last_request_time, Some(slot));
    }

    #[test]
    fn test_back_to_back_reservations_are_spaced() {
        let pacer = HostPacer::new(DELAY);
        let now = Instant::now();

        let first = pacer.reserve("example.com", now);
        let second = pacer.reserve("example.com", now);
        let third = pacer.reserve("example.com", now);

        assert_eq!(first, now);
        assert_eq!(second - first, DELAY);
        assert_eq!(third - second, DELAY);
        assert_eq!(pacer.request_count("example.com"), 3);
    }

    #[test]
    fn test_different_hosts_are_independent() {
        let pacer = HostPacer::new(DELAY);
        let now = Instant::now();

        pacer.reserve("a.example", now);
        let other = pacer.reserve("b.example", now);

        assert_eq!(other, now);
        assert_eq!(pacer.request_count("a.example"), 1);
        assert_eq!(pacer.request_count("b.example"), 1);
        assert_eq!(pacer.request_count("c.example"), 0);
    }

    #[test]
    fn test_zero_delay_never_waits() {
        let pacer = HostPacer::new(Duration::ZERO);
        let now = Instant::now();

        pacer.reserve("example.com", now);
        assert_eq!(pacer.reserve("example.com", now), now);
    }

    #[tokio::test]
    async fn test_wait_turn_sleeps_for_remaining_delay() {
        let pacer = HostPacer::new(DELAY);

        let start = Instant::now();
        pacer.wait_turn("example.com").await;
        pacer.wait_turn("example.com").await;

        assert!(start.elapsed() >= DELAY);
    }
}
