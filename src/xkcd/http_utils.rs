//! HTTP helpers shared by the xkcd clients
//!
//! Keeps status checking and error mapping in one place for the JSON and
//! plain-text endpoints.

use crate::xkcd::XkcdError;
use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Creates an HTTP client with the configured request timeout.
#[must_use]
pub fn create_http_client(timeout_secs: u64) -> HttpClient {
    HttpClient::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| HttpClient::new())
}

async fn send_checked(request: RequestBuilder) -> Result<Response, XkcdError> {
    let response = request
        .send()
        .await
        .map_err(|e| XkcdError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(XkcdError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }

    Ok(response)
}

/// Sends a GET request and decodes the JSON body.
///
/// # Errors
///
/// Returns `XkcdError::Network` on connectivity issues, `XkcdError::Status` on
/// non-success status codes, or `XkcdError::Json` if decoding fails.
pub async fn get_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, XkcdError> {
    send_checked(request)
        .await?
        .json()
        .await
        .map_err(|e| XkcdError::Json(e.to_string()))
}

/// Sends a GET request and returns the body as text.
///
/// # Errors
///
/// Returns `XkcdError::Network` on connectivity issues or while reading the
/// body, and `XkcdError::Status` on non-success status codes.
pub async fn get_text(request: RequestBuilder) -> Result<String, XkcdError> {
    send_checked(request)
        .await?
        .text()
        .await
        .map_err(|e| XkcdError::Network(e.to_string()))
}
