//! JSON-over-HTTP helper shared by every endpoint.
//!
//! Requests are sent exactly once. A failed poll is simply retried by
//! the next tick, so there is no backoff layer here.

use serde::de::DeserializeOwned;

use crate::FetchError;

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 500;

/// Sends a `GET` and decodes the response body as `T`.
///
/// The body is read as text first so that a decode failure can log what
/// actually arrived.
///
/// # Errors
///
/// Returns [`FetchError::Http`] on connection or body read failure,
/// [`FetchError::Status`] on a non-2xx status, and [`FetchError::Decode`]
/// when the body does not match `T`.
pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: reqwest::Url,
) -> Result<T, FetchError> {
    let response = client.get(url.clone()).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let text = response.text().await?;

    serde_json::from_str(&text).map_err(|source| {
        log::debug!(
            "JSON decode failed\n  \
             url: {url}\n  \
             status: {status}\n  \
             content-type: {content_type:?}\n  \
             received: {} bytes\n  \
             parse error: {source}\n  \
             body preview: {}",
            text.len(),
            body_preview(&text),
        );
        FetchError::Decode {
            url: url.to_string(),
            source,
        }
    })
}

/// Truncates `text` to at most [`BODY_PREVIEW_LEN`] characters.
fn body_preview(text: &str) -> String {
    match text.char_indices().nth(BODY_PREVIEW_LEN) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
