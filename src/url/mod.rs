//! URL handling module for Frontier-Crawler
//!
//! Normalization (the frontier's dedup key), hostname extraction for
//! per-host pacing, and same-site checks for host scoping.

mod domain;
mod normalize;

pub use domain::{extract_host, same_site};
pub use normalize::{is_http_scheme, normalize_url};
