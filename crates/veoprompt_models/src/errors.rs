//! Mapping provider error text to structured errors.

use veoprompt_error::{GeminiError, GeminiErrorKind};

/// Converts a provider error message into a [`GeminiError`], extracting the
/// HTTP status when the message carries one.
///
/// # Examples
///
/// ```
/// use veoprompt_error::{GeminiErrorKind, RetryableError};
/// use veoprompt_models::classify_error;
///
/// let err = classify_error("bad response from server; code 503; description: overloaded");
/// assert!(matches!(err.kind, GeminiErrorKind::HttpError { status_code: 503, .. }));
/// assert!(err.is_retryable());
/// ```
pub fn classify_error(message: &str) -> GeminiError {
    match extract_status_code(message) {
        Some(status_code) => GeminiError::new(GeminiErrorKind::HttpError {
            status_code,
            message: message.to_string(),
        }),
        None => GeminiError::new(GeminiErrorKind::ApiRequest(message.to_string())),
    }
}

/// Parses strings like "bad response from server; code 503; description: ..."
fn extract_status_code(message: &str) -> Option<u16> {
    let start = message.find("code ")? + "code ".len();
    let digits: String = message[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}
