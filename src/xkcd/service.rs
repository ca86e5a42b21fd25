//! Cached access to the comic API shared by all handlers

use super::cache::{ComicCache, LatestCache};
use super::{Comic, XkcdApi, XkcdError};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Cached access to the xkcd services
///
/// Owns both caches for the lifetime of the bot; handlers share it via `Arc`.
#[derive(Clone)]
pub struct XkcdService {
    api: Arc<dyn XkcdApi>,
    latest: LatestCache,
    comics: ComicCache,
}

impl XkcdService {
    /// Wrap an API implementation with a latest-comic refresh window
    #[must_use]
    pub fn new(api: Arc<dyn XkcdApi>, latest_window: Duration) -> Self {
        Self {
            api,
            latest: LatestCache::new(latest_window),
            comics: ComicCache::new(),
        }
    }

    /// Most recent comic, refreshed at most once per window.
    ///
    /// # Errors
    ///
    /// Returns the API error of the fetch that opened the current window.
    pub async fn latest(&self) -> Result<Comic, XkcdError> {
        self.latest.get_or_fetch(|| self.api.fetch_latest()).await
    }

    /// Refresh window of the latest-comic cache
    #[must_use]
    pub fn latest_window(&self) -> Duration {
        self.latest.window()
    }

    /// Comic `num`, memoized for the process lifetime.
    ///
    /// # Errors
    ///
    /// Returns the API error; the number is fetched again on the next call.
    pub async fn comic(&self, num: u32) -> Result<Comic, XkcdError> {
        self.comics
            .get_or_fetch(num, || self.api.fetch_comic(num))
            .await
    }

    /// Relevance search candidates for `query`, never cached.
    ///
    /// # Errors
    ///
    /// Returns the API error unchanged.
    pub async fn relevant(&self, query: &str) -> Result<Vec<String>, XkcdError> {
        debug!(query, "Running relevance search");
        self.api.search_relevant(query).await
    }
}
