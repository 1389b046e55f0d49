//! Human-readable result printing

use crate::crawler::{extract_text, CrawlResult};
use crate::output::traits::ResultSink;
use crate::state::FetchStatus;
use std::io::{self, Stdout, Write};

/// Characters of page text shown per fetched page
const PREVIEW_CHARS: usize = 200;

/// Links listed per fetched page
const PREVIEW_LINKS: usize = 5;

/// Writes one block per result to any writer
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl ConsoleSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_result(&mut self, result: &CrawlResult) -> io::Result<()> {
        match result.status {
            FetchStatus::Fetched => self.write_fetched(result),
            FetchStatus::Redirect => writeln!(
                self.out,
                "REDIRECT {} -> {}",
                result.url,
                result.redirect_target.as_deref().unwrap_or("(no location)")
            ),
            FetchStatus::Error => match &result.error {
                Some(error) => writeln!(self.out, "ERROR crawling {}: {}", result.url, error),
                None => writeln!(self.out, "ERROR crawling {}", result.url),
            },
            FetchStatus::Pending => Ok(()),
        }
    }

    fn write_fetched(&mut self, result: &CrawlResult) -> io::Result<()> {
        writeln!(self.out, "\n=== CRAWLED: {} ===", result.url)?;
        if let Some(code) = result.status_code {
            writeln!(self.out, "Status Code: {}", code)?;
        }
        writeln!(self.out, "Depth: {}", result.depth)?;
        writeln!(self.out, "Content Length: {} bytes", result.content.len())?;
        writeln!(self.out, "Links Found: {}", result.links.len())?;

        let text = extract_text(&result.content);
        if !text.is_empty() {
            writeln!(self.out, "Preview: {}", preview(&text, PREVIEW_CHARS))?;
        }

        if !result.links.is_empty() {
            writeln!(self.out, "Sample Links:")?;
            for link in result.links.iter().take(PREVIEW_LINKS) {
                writeln!(self.out, "  - {}", link)?;
            }
            if result.links.len() > PREVIEW_LINKS {
                writeln!(
                    self.out,
                    "  ... and {} more",
                    result.links.len() - PREVIEW_LINKS
                )?;
            }
        }

        Ok(())
    }
}

impl<W: Write> ResultSink for ConsoleSink<W> {
    fn accept(&mut self, result: CrawlResult) {
        if let Err(e) = self.write_result(&result).and_then(|()| self.out.flush()) {
            tracing::warn!("Failed to write result for {}: {}", result.url, e);
        }
    }
}

/// Truncates on a character boundary, marking the cut with an ellipsis
fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FetchError;

    fn render(result: CrawlResult) -> String {
        let mut sink = ConsoleSink::new(Vec::new());
        sink.accept(result);
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn test_fetched_block() {
        let mut result = CrawlResult::pending("http://a.test/").with_depth(1);
        result.mark_fetched(
            200,
            "<html><body><p>Hello   there</p></body></html>".to_string(),
        );
        result.attach_links((0..7).map(|i| format!("http://a.test/{}", i)).collect());

        let text = render(result);
        assert!(text.contains("=== CRAWLED: http://a.test/ ==="));
        assert!(text.contains("Status Code: 200"));
        assert!(text.contains("Depth: 1"));
        assert!(text.contains("Links Found: 7"));
        assert!(text.contains("Preview: Hello there"));
        assert!(text.contains("  - http://a.test/4"));
        assert!(!text.contains("  - http://a.test/5"));
        assert!(text.contains("... and 2 more"));
    }

    #[test]
    fn test_redirect_and_error_lines() {
        let mut redirect = CrawlResult::pending("http://a.test/old");
        redirect.mark_redirect(301, Some("http://a.test/new".to_string()));
        assert_eq!(
            render(redirect),
            "REDIRECT http://a.test/old -> http://a.test/new\n"
        );

        let mut error = CrawlResult::pending("http://a.test/");
        error.mark_error(FetchError::Timeout);
        let text = render(error);
        assert!(text.starts_with("ERROR crawling http://a.test/: "));
    }

    #[test]
    fn test_preview_is_char_safe() {
        let text = "é".repeat(300);
        let cut = preview(&text, PREVIEW_CHARS);
        assert_eq!(cut.chars().count(), PREVIEW_CHARS + 3);
        assert_eq!(preview("short", PREVIEW_CHARS), "short");
    }
}
