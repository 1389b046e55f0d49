use crate::UrlError;
use url::Url;

/// Normalizes a URL into the canonical form used as the frontier's dedup key
///
/// Normalization is exactly the `url` crate's parse/serialize round trip:
/// scheme and host are lowercased, an empty path becomes `/`, dot segments
/// are resolved, default ports are dropped, and percent-encoding is
/// canonicalized. Query parameter order and fragments are preserved as given.
///
/// Only `http` and `https` URLs with a host are accepted.
///
/// # Examples
///
/// ```
/// use frontier_crawler::url::normalize_url;
///
/// let url = normalize_url("HTTP://Example.COM:80/a/../b").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/b");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if !is_http_scheme(&url) {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Returns true for `http` and `https` URLs
pub fn is_http_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
