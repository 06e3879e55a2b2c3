//! Error categorization.
//!
//! Maps transport-level errors onto the `FetchError` taxonomy recorded on entries.

use crate::config::MAX_ERROR_MESSAGE_LENGTH;

use super::types::FetchError;

/// Categorizes a `reqwest::Error` into a `FetchError`.
///
/// reqwest has no notion of cross-origin denial, so nothing is ever classified as
/// `Blocked` here: every non-timeout failure is `Transport`. The message text is
/// never inspected to guess at the cause.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> FetchError {
    if error.is_timeout() {
        return FetchError::Timeout;
    }

    let detail = if let Some(status) = error.status() {
        format!("HTTP {}", status.as_u16())
    } else if error.is_connect() {
        format!("connect error: {error}")
    } else if error.is_redirect() {
        format!("redirect error: {error}")
    } else if error.is_body() || error.is_decode() {
        format!("body error: {error}")
    } else {
        error.to_string()
    };
    FetchError::Transport(truncate_message(&detail))
}

/// Truncates an error message to `MAX_ERROR_MESSAGE_LENGTH` characters.
pub fn truncate_message(message: &str) -> String {
    if message.chars().count() <= MAX_ERROR_MESSAGE_LENGTH {
        return message.to_string();
    }
    let truncated: String = message.chars().take(MAX_ERROR_MESSAGE_LENGTH).collect();
    format!("{truncated}...")
}
