//! Input types for model requests.

use serde::{Deserialize, Serialize};

/// Content sent to a model. Scene prompting is text-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Input {
    /// Plain text input.
    Text(String),
}
