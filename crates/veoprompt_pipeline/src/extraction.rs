//! Pulling JSON objects out of free-form model replies.
//!
//! Models are asked for bare JSON but routinely wrap it in a fenced block or
//! add a sentence before it. Extraction tries, in order:
//! 1. A fenced block (```json or a bare fence)
//! 2. The first balanced `{ ... }` span outside string literals

use serde::de::DeserializeOwned;
use veoprompt_error::InferenceError;

/// Locates the JSON object in a reply.
///
/// Returns `None` when the reply contains no object at all.
///
/// # Examples
///
/// ```
/// use veoprompt_pipeline::extract_object;
///
/// let reply = "Sure! Here is the scene:\n```json\n{\"description\": \"camp at dusk\"}\n```";
/// assert_eq!(extract_object(reply), Some("{\"description\": \"camp at dusk\"}"));
///
/// let reply = "verdict follows {\"verdict\": \"accept\"} hope that helps";
/// assert_eq!(extract_object(reply), Some("{\"verdict\": \"accept\"}"));
/// ```
pub fn extract_object(reply: &str) -> Option<&str> {
    if let Some(fenced) = fenced_block(reply)
        && let Some(object) = balanced_object(fenced)
    {
        return Some(object);
    }
    balanced_object(reply)
}

/// Parses a reply from `capability` into `T`.
///
/// # Errors
///
/// Returns [`InferenceError`] with `InvalidResponseShape` when no object is
/// present or the object does not match `T`.
pub fn parse_reply<T>(capability: &str, reply: &str) -> Result<T, InferenceError>
where
    T: DeserializeOwned,
{
    let object = extract_object(reply).ok_or_else(|| {
        tracing::warn!(capability, reply_length = reply.len(), "No JSON object in reply");
        InferenceError::invalid_shape(
            capability,
            format!("no JSON object in reply of {} bytes", reply.len()),
        )
    })?;

    serde_json::from_str(object).map_err(|e| {
        let preview: String = object.chars().take(120).collect();
        tracing::warn!(capability, error = %e, preview = %preview, "Reply did not match schema");
        InferenceError::invalid_shape(capability, format!("{} (reply began: {})", e, preview))
    })
}

fn fenced_block(reply: &str) -> Option<&str> {
    let open = reply.find("```")?;
    let after_fence = &reply[open + 3..];
    // Skip the info string, e.g. "json"
    let body_start = after_fence.find('\n').map(|n| n + 1).unwrap_or(0);
    let body = &after_fence[body_start..];
    // A missing closing fence means a truncated reply; take what arrived.
    let body = match body.find("```") {
        Some(close) => &body[..close],
        None => body,
    };
    Some(body.trim())
}

fn balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
