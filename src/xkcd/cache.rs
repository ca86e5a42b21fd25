//! In-memory caches around the comic API
//!
//! Both caches coalesce concurrent loads: callers asking for the same entry
//! while a fetch is in flight wait on that fetch instead of issuing their own.
//! The latest-comic slot holds whatever the fetch produced, failures included,
//! until its window elapses. The per-number cache never stores a failure.

use super::{Comic, XkcdError};
use moka::future::Cache;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

fn unshare(err: Arc<XkcdError>) -> XkcdError {
    Arc::unwrap_or_clone(err)
}

/// Single-slot cache for the latest comic
///
/// The outcome of a fetch, success or failure, is served for the whole refresh
/// window; once the window has elapsed the next caller triggers a new fetch.
#[derive(Clone)]
pub struct LatestCache {
    slot: Cache<(), Result<Comic, XkcdError>>,
    window: Duration,
}

impl LatestCache {
    /// Creates a cache with the given refresh window
    #[must_use]
    pub fn new(window: Duration) -> Self {
        let slot = Cache::builder().max_capacity(1).time_to_live(window).build();
        Self { slot, window }
    }

    /// Returns the cached outcome, or calls `fetch` if the window has elapsed.
    ///
    /// `fetch` is only invoked on a miss.
    ///
    /// # Errors
    ///
    /// Returns the error of the fetch that opened the current window, to every
    /// caller until the window elapses.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<Comic, XkcdError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Comic, XkcdError>>,
    {
        self.slot
            .get_with((), async {
                debug!("Latest comic cache miss, refreshing");
                let outcome = fetch().await;
                if let Err(e) = &outcome {
                    warn!("Latest comic fetch failed, holding error for this window: {e}");
                }
                outcome
            })
            .await
    }

    /// Returns the configured refresh window
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }
}

/// Per-number comic cache without expiry
#[derive(Clone)]
pub struct ComicCache {
    comics: Cache<u32, Comic>,
}

impl ComicCache {
    /// Creates an empty, unbounded cache
    #[must_use]
    pub fn new() -> Self {
        Self {
            comics: Cache::builder().build(),
        }
    }

    /// Returns comic `num` from the cache, or calls `fetch` on a miss.
    ///
    /// # Errors
    ///
    /// Returns the fetch error. The entry stays absent, so the next call for
    /// the same number fetches again.
    pub async fn get_or_fetch<F, Fut>(&self, num: u32, fetch: F) -> Result<Comic, XkcdError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Comic, XkcdError>>,
    {
        self.comics
            .try_get_with(num, async {
                debug!(num, "Comic cache miss");
                fetch().await
            })
            .await
            .map_err(unshare)
    }

    /// Returns true if comic `num` is cached
    #[must_use]
    pub fn contains(&self, num: u32) -> bool {
        self.comics.contains_key(&num)
    }
}

impl Default for ComicCache {
    fn default() -> Self {
        Self::new()
    }
}
