//! Request and response types for model generation.

use crate::{Message, Output};
use serde::{Deserialize, Serialize};

/// Generation request handed to a driver.
///
/// # Examples
///
/// ```
/// use veoprompt_core::{GenerateRequest, Message, Role};
///
/// let request = GenerateRequest {
///     messages: vec![Message::text(Role::User, "Describe the scene")],
///     max_tokens: Some(2048),
///     temperature: Some(0.4),
///     model: Some("gemini-2.5-flash".to_string()),
/// };
///
/// assert_eq!(request.messages.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GenerateRequest {
    /// The conversation messages to send
    pub messages: Vec<Message>,
    /// Maximum number of tokens to generate
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 to 2.0)
    pub temperature: Option<f32>,
    /// Model identifier to use
    pub model: Option<String>,
}

/// The unified response object.
///
/// # Examples
///
/// ```
/// use veoprompt_core::{GenerateResponse, Output};
///
/// let response = GenerateResponse {
///     outputs: vec![Output::Text("{\"verdict\":\"accept\"}".to_string())],
/// };
///
/// assert_eq!(response.text(), "{\"verdict\":\"accept\"}");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The generated outputs from the model
    pub outputs: Vec<Output>,
}

impl GenerateResponse {
    /// All outputs flattened into one string; JSON outputs are serialized.
    pub fn text(&self) -> String {
        self.outputs
            .iter()
            .map(|output| match output {
                Output::Text(text) => text.clone(),
                Output::Json(value) => value.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
