//! Testing helpers and mock utilities.
//!
//! Provides fixture comics and convenient constructors for mocked xkcd APIs.

use crate::xkcd::{Comic, MockXkcdApi, XkcdService};
use std::sync::Arc;
use std::time::Duration;
use teloxide::types::Message;

/// Fixture comic with predictable image URL and hover text.
#[must_use]
pub fn comic(num: u32) -> Comic {
    Comic {
        num,
        img: format!("https://imgs.xkcd.com/comics/comic_{num}.png"),
        alt: format!("alt {num}"),
        title: format!("Comic {num}"),
        safe_title: format!("Comic {num}"),
        year: "2024".to_string(),
        month: "1".to_string(),
        day: "1".to_string(),
    }
}

/// Relevance lines `"<n> /images/<n>.png"` for `1..=count`.
#[must_use]
pub fn relevant_lines(count: u32) -> Vec<String> {
    (1..=count).map(|n| format!("{n} /images/{n}.png")).collect()
}

/// Create a mock API whose latest comic is `latest`, fetched at most once.
#[must_use]
pub fn mock_latest(latest: u32) -> MockXkcdApi {
    let mut mock = MockXkcdApi::new();
    mock.expect_fetch_latest()
        .times(0..=1)
        .returning(move || Ok(comic(latest)));
    mock
}

/// Wrap a mock in a service with the production refresh window.
#[must_use]
pub fn service_with(mock: MockXkcdApi) -> Arc<XkcdService> {
    Arc::new(XkcdService::new(
        Arc::new(mock),
        Duration::from_secs(crate::config::LATEST_REFRESH_SECS),
    ))
}

/// Private-chat text message with the given raw `entities` array.
///
/// # Errors
///
/// Returns the decode error if the JSON is not a valid message.
pub fn message(text: &str, entities: serde_json::Value) -> serde_json::Result<Message> {
    serde_json::from_value(serde_json::json!({
        "message_id": 1,
        "date": 1_700_000_000,
        "chat": { "id": 1, "type": "private", "first_name": "Tester" },
        "from": { "id": 1, "is_bot": false, "first_name": "Tester" },
        "text": text,
        "entities": entities,
    }))
}

/// Message whose leading token (up to the first whitespace) is tagged as a
/// bot command, as Telegram does for `/command` messages.
///
/// # Errors
///
/// Returns the decode error if the JSON is not a valid message.
pub fn command_message(text: &str) -> serde_json::Result<Message> {
    let command = text.split(char::is_whitespace).next().unwrap_or_default();
    message(
        text,
        serde_json::json!([
            { "type": "bot_command", "offset": 0, "length": command.encode_utf16().count() }
        ]),
    )
}
