//! Link extraction contract and the default HTML implementation
//!
//! The engine only depends on [`LinkExtractor`]; how links are found is up
//! to the implementation. [`HtmlLinkExtractor`] walks `<a href>` elements
//! with `scraper`.

use scraper::{Html, Selector};
use url::Url;

/// Finds outgoing links in fetched page content
///
/// Implementations must return only absolute `http`/`https` URLs, resolving
/// relative references against `page_url` themselves.
pub trait LinkExtractor: Send + Sync {
    fn extract(&self, content: &str, page_url: &Url) -> Vec<String>;
}

impl<F> LinkExtractor for F
where
    F: Fn(&str, &Url) -> Vec<String> + Send + Sync,
{
    fn extract(&self, content: &str, page_url: &Url) -> Vec<String> {
        self(content, page_url)
    }
}

/// Extracts `<a href>` links from HTML
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document, resolved against the page URL
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - Fragment-only links (same-page anchors)
/// - Anything that is not `http`/`https` after resolution
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkExtractor;

impl LinkExtractor for HtmlLinkExtractor {
    fn extract(&self, content: &str, page_url: &Url) -> Vec<String> {
        extract_links(content, page_url)
    }
}

/// Extracts all valid links from an HTML document
///
/// # Example
///
/// ```
/// use frontier_crawler::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// assert_eq!(extract_links(html, &base_url), vec!["https://example.com/page"]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            // Skip if it has the download attribute
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        _ => None,
    }
}

/// Extracts readable text from HTML, collapsing runs of whitespace
///
/// Used for previews only; script and style contents are skipped.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut words: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        if let Some(text) = node.value().as_text() {
            let in_code = node
                .parent()
                .and_then(|parent| parent.value().as_element())
                .map_or(false, |el| matches!(el.name(), "script" | "style"));
            if !in_code {
                words.extend(text.split_whitespace());
            }
        }
    }

    words.join(" ")
}
