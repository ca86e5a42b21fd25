//! HTTP implementation of [`XkcdApi`]

use super::http_utils::{create_http_client, get_json, get_text};
use super::relevant::parse_relevant_response;
use super::{Comic, XkcdApi, XkcdError};
use crate::config::Settings;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{debug, instrument};

/// Client for the xkcd JSON API and the relevant-xkcd search service
#[derive(Debug, Clone)]
pub struct XkcdClient {
    http: HttpClient,
    xkcd_base: String,
    relevant_base: String,
}

impl XkcdClient {
    /// Create a client from settings
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self::with_base_urls(
            create_http_client(settings.http_timeout_secs),
            &settings.xkcd_base_url,
            &settings.relevant_xkcd_url,
        )
    }

    /// Create a client against explicit service base URLs
    #[must_use]
    pub fn with_base_urls(http: HttpClient, xkcd_base: &str, relevant_base: &str) -> Self {
        Self {
            http,
            xkcd_base: xkcd_base.trim_end_matches('/').to_string(),
            relevant_base: relevant_base.trim_end_matches('/').to_string(),
        }
    }

    fn latest_url(&self) -> String {
        format!("{}/info.0.json", self.xkcd_base)
    }

    fn comic_url(&self, num: u32) -> String {
        format!("{}/{num}/info.0.json", self.xkcd_base)
    }

    fn search_url(&self) -> String {
        format!("{}/process", self.relevant_base)
    }
}

#[async_trait]
impl XkcdApi for XkcdClient {
    #[instrument(skip(self))]
    async fn fetch_latest(&self) -> Result<Comic, XkcdError> {
        let comic: Comic = get_json(self.http.get(self.latest_url())).await?;
        debug!(num = comic.num, "Fetched latest comic");
        Ok(comic)
    }

    #[instrument(skip(self))]
    async fn fetch_comic(&self, num: u32) -> Result<Comic, XkcdError> {
        get_json(self.http.get(self.comic_url(num))).await
    }

    #[instrument(skip(self))]
    async fn search_relevant(&self, query: &str) -> Result<Vec<String>, XkcdError> {
        let request = self
            .http
            .get(self.search_url())
            .query(&[("action", "xkcd"), ("query", query)]);
        let body = get_text(request).await?;
        let lines = parse_relevant_response(&body);
        debug!(candidates = lines.len(), "Relevance search finished");
        Ok(lines)
    }
}
