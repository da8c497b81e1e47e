//! Output types from model responses.

use serde::{Deserialize, Serialize};

/// Content returned by a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Output {
    /// Plain text output, possibly wrapping JSON in a code fence.
    Text(String),

    /// Structured JSON output from providers with a native JSON mode.
    Json(serde_json::Value),
}
