//! Where reference texts come from. The app only depends on the
//! [`TextSource`] trait, so the GitHub implementation can be swapped for a
//! stub in tests.

pub mod cache;
pub mod github;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("network request failed: {0}")]
    Network(String),
    #[error("rate limited by the source host, try again later")]
    RateLimited,
    #[error("no such file: {0}")]
    NotFound(String),
}

/// Supplies candidate text identifiers and raw content per identifier.
pub trait TextSource {
    /// Ordered list of identifiers the user can pick from.
    fn list_candidates(&mut self) -> Result<Vec<String>, SourceError>;

    /// Content for one identifier, normalized and ready to type against.
    fn fetch_content(&mut self, identifier: &str) -> Result<String, SourceError>;
}
