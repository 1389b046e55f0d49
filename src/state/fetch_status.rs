/// Fetch status definitions for crawl results
///
/// Every fetch attempt starts out `Pending` and ends in exactly one terminal status.
use std::fmt;

/// Represents the outcome of a single fetch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchStatus {
    /// The result has been created but the request has not completed
    Pending,

    /// The page body was read successfully
    Fetched,

    /// The URL could not be parsed, or the request or body read failed
    Error,

    /// The server answered with a 3xx; the target is reported, not followed
    Redirect,
}

impl FetchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetched => "fetched",
            Self::Error => "error",
            Self::Redirect => "redirect",
        }
    }

    /// Returns all terminal statuses in reporting order
    pub fn terminal_states() -> [Self; 3] {
        [Self::Fetched, Self::Redirect, Self::Error]
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(FetchStatus::Redirect.to_string(), "redirect");
    }

    #[test]
    fn test_terminal_states_exclude_pending() {
        assert!(!FetchStatus::terminal_states().contains(&FetchStatus::Pending));
    }
}
