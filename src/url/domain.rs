use url::Url;

/// Extracts the lowercase hostname from a URL
///
/// The port is not part of the hostname, so `example.com:8080` and
/// `example.com` share one politeness budget.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use frontier_crawler::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM:8443/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Strips a leading `www.` label
fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Returns true when both URLs point at the same site
///
/// Hosts are compared case-insensitively and a leading `www.` on either side
/// is ignored, so `www.example.com` and `example.com` match.
pub fn same_site(a: &Url, b: &Url) -> bool {
    match (extract_host(a), extract_host(b)) {
        (Some(ha), Some(hb)) => strip_www(&ha) == strip_www(&hb),
        _ => false,
    }
}
