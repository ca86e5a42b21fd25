//! xkcd comic and relevance-search clients
//!
//! Provides a unified interface over the comic JSON API and the relevant-xkcd
//! search service, plus the caching layer the bot handlers use.

mod cache;
mod client;
mod http_utils;
/// Relevance-search response parsing
pub mod relevant;
mod service;

pub use cache::{ComicCache, LatestCache};
pub use client::XkcdClient;
pub use relevant::RelevantHit;
pub use service::XkcdService;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while talking to the xkcd services
///
/// The type is `Clone` because coalesced cache loads hand the same failure to
/// every caller waiting on it.
#[derive(Debug, Error, Clone)]
pub enum XkcdError {
    /// Error during network communication
    #[error("Network error: {0}")]
    Network(String),
    /// The remote service answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status {
        /// Response status code
        status: u16,
        /// Requested URL
        url: String,
    },
    /// Error during JSON deserialization
    #[error("JSON error: {0}")]
    Json(String),
    /// A configured or constructed URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// A relevance line did not have the `<num> <url>` shape
    #[error("Malformed relevance line: {0:?}")]
    MalformedLine(String),
    /// The relevance search returned no candidates
    #[error("No relevant comic found for {0:?}")]
    NoResults(String),
}

/// Comic metadata as returned by `info.0.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comic {
    /// Comic number
    pub num: u32,
    /// Image URL
    pub img: String,
    /// Hover text
    pub alt: String,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Title without markup
    #[serde(default)]
    pub safe_title: String,
    /// Publication year
    #[serde(default)]
    pub year: String,
    /// Publication month
    #[serde(default)]
    pub month: String,
    /// Publication day
    #[serde(default)]
    pub day: String,
}

/// Remote operations the bot needs from the xkcd services
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait XkcdApi: Send + Sync {
    /// Fetch metadata of the most recent comic
    async fn fetch_latest(&self) -> Result<Comic, XkcdError>;

    /// Fetch metadata of comic `num`
    async fn fetch_comic(&self, num: u32) -> Result<Comic, XkcdError>;

    /// Run a relevance search and return the candidate lines in order
    async fn search_relevant(&self, query: &str) -> Result<Vec<String>, XkcdError>;
}
