//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// Speaker of a message sent to a model.
///
/// # Examples
///
/// ```
/// use veoprompt_core::Role;
///
/// assert_ne!(Role::User, Role::Assistant);
/// assert_eq!(format!("{}", Role::System), "System");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Role {
    /// System instructions
    System,
    /// Text from the person describing the scene
    User,
    /// Earlier model output
    Assistant,
}
