//! State module for tracking fetch outcomes and host pacing
//!
//! # Components
//!
//! - `FetchStatus`: the outcome of a single fetch attempt (pending, fetched, error, redirect)
//! - `HostState`: per-hostname request count and last request time
//! - `HostPacer`: the mutex-guarded map of host states owned by the fetcher

mod fetch_status;
mod host_state;

// Re-export main types
pub use fetch_status::FetchStatus;
pub use host_state::{HostPacer, HostState};
