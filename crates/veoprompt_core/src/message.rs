//! Message types for model conversations.

use crate::{Input, Role};
use serde::{Deserialize, Serialize};

/// A message in a model conversation.
///
/// # Examples
///
/// ```
/// use veoprompt_core::{Message, Role, Input};
///
/// let message = Message::text(Role::User, "Bigfoot is tired of the beatboxing");
///
/// assert_eq!(message.role, Role::User);
/// assert_eq!(message.content, vec![Input::Text("Bigfoot is tired of the beatboxing".to_string())]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender
    pub role: Role,
    /// The content of the message
    pub content: Vec<Input>,
}

impl Message {
    /// Single-part text message.
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![Input::Text(text.into())],
        }
    }
}
