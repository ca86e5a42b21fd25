//! Configuration and settings management
//!
//! Loads settings from config files and environment variables and defines the
//! bot's fixed constants.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Refresh window for the latest comic (10 minutes)
pub const LATEST_REFRESH_SECS: u64 = 600;
/// Maximum number of results in one inline-query answer
pub const MAX_INLINE_RESULTS: usize = 50;
/// Cache time of the hover-text callback answer (7 days)
pub const ALT_CALLBACK_CACHE_SECS: u32 = 604_800;
/// Inline-query cache time outside development mode
pub const DEFAULT_INLINE_CACHE_SECS: u32 = 3600;
/// `NODE_ENV` value that turns inline caching off
pub const DEVELOPMENT_ENV: &str = "development";

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Telegram Bot API token
    pub telegram_token: String,

    /// Inline-query result cache time override, in seconds
    pub xkcd_cache_time: Option<u32>,
    /// Deployment environment; `development` disables inline caching
    pub node_env: Option<String>,

    /// Base URL of the comic JSON API
    #[serde(default = "default_xkcd_base_url")]
    pub xkcd_base_url: String,
    /// Base URL of the relevance-search service
    #[serde(default = "default_relevant_xkcd_url")]
    pub relevant_xkcd_url: String,
    /// Base URL of the explanation wiki
    #[serde(default = "default_explain_xkcd_url")]
    pub explain_xkcd_url: String,

    /// Timeout for outbound HTTP requests, in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_xkcd_base_url() -> String {
    "https://xkcd.com".to_string()
}

fn default_relevant_xkcd_url() -> String {
    "https://relevantxkcd.appspot.com".to_string()
}

fn default_explain_xkcd_url() -> String {
    "https://www.explainxkcd.com".to_string()
}

const fn default_http_timeout_secs() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            telegram_token: String::new(),
            xkcd_cache_time: None,
            node_env: None,
            xkcd_base_url: default_xkcd_base_url(),
            relevant_xkcd_url: default_relevant_xkcd_url(),
            explain_xkcd_url: default_explain_xkcd_url(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

/// Build the layered configuration source.
///
/// # Errors
///
/// Returns a `ConfigError` if a present source cannot be read.
pub fn build_config() -> Result<Config, ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
        // Local overrides, not checked into git
        .add_source(File::with_name("config/local").required(false))
        // Eg.. `APP_HTTP_TIMEOUT_SECS=10 ./target/xkcd-bot`
        .add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        )
        // Un-prefixed variables: TELEGRAM_TOKEN, XKCD_CACHE_TIME, NODE_ENV, ...
        .add_source(Environment::default().ignore_empty(true).try_parsing(true))
        .build()
}

impl Settings {
    /// Create new settings by loading from environment and files
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use xkcd_bot::config::Settings;
    ///
    /// let settings = Settings::new().expect("Failed to load configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails.
    pub fn new() -> Result<Self, ConfigError> {
        build_config()?.try_deserialize()
    }

    /// Returns true when running in development mode
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.node_env.as_deref() == Some(DEVELOPMENT_ENV)
    }

    /// Cache time hint for inline-query answers, in seconds
    ///
    /// `XKCD_CACHE_TIME` wins; otherwise 0 in development and 3600 elsewhere.
    #[must_use]
    pub fn inline_cache_time(&self) -> u32 {
        self.xkcd_cache_time.unwrap_or(if self.is_development() {
            0
        } else {
            DEFAULT_INLINE_CACHE_SECS
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_cache_time() {
        let mut settings = Settings::default();
        assert_eq!(settings.inline_cache_time(), 3600);

        settings.node_env = Some("development".to_string());
        assert_eq!(settings.inline_cache_time(), 0);

        settings.node_env = Some("production".to_string());
        assert_eq!(settings.inline_cache_time(), 3600);

        // Explicit override wins in every mode
        settings.xkcd_cache_time = Some(120);
        assert_eq!(settings.inline_cache_time(), 120);
        settings.node_env = Some("development".to_string());
        assert_eq!(settings.inline_cache_time(), 120);
    }

    #[test]
    fn test_defaults_point_at_public_services() {
        let settings = Settings::default();
        assert_eq!(settings.xkcd_base_url, "https://xkcd.com");
        assert_eq!(settings.relevant_xkcd_url, "https://relevantxkcd.appspot.com");
        assert_eq!(settings.explain_xkcd_url, "https://www.explainxkcd.com");
        assert_eq!(settings.http_timeout_secs, 30);
    }

    #[test]
    fn test_config_env_loading() -> Result<(), Box<dyn std::error::Error>> {
        std::env::set_var("TELEGRAM_TOKEN", "dummy_token");
        std::env::set_var("XKCD_CACHE_TIME", "42");
        std::env::set_var("NODE_ENV", "development");

        let settings = Settings::new()?;
        assert_eq!(settings.telegram_token, "dummy_token");
        assert_eq!(settings.xkcd_cache_time, Some(42));
        assert!(settings.is_development());
        assert_eq!(settings.inline_cache_time(), 42);

        std::env::remove_var("TELEGRAM_TOKEN");
        std::env::remove_var("XKCD_CACHE_TIME");
        std::env::remove_var("NODE_ENV");
        Ok(())
    }
}
