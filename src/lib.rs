#![deny(missing_docs)]
//! Telegram bot serving xkcd comics.
//!
//! Commands, inline queries and hover-text callbacks backed by the xkcd JSON
//! API and the relevant-xkcd search service.

/// Telegram handlers and views.
pub mod bot;
/// Configuration management.
pub mod config;
/// Telegram runtime entrypoint.
pub mod runner;
/// xkcd API clients and caches.
pub mod xkcd;

#[cfg(test)]
pub mod testing;
