//! Character consistency errors.

/// Specific error conditions raised while reconciling characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ConsistencyErrorKind {
    /// A scene described a registered character with a contradicting attribute
    #[display(
        "Character '{}' has {} '{}' but the scene describes '{}'",
        character,
        attribute,
        registered,
        proposed
    )]
    ConsistencyConflict {
        /// Character display name
        character: String,
        /// Attribute dimension, e.g. "stature" or "fur color"
        attribute: String,
        /// Value held by the registry
        registered: String,
        /// Value proposed by the scene
        proposed: String,
    },
    /// A name does not resolve and auto-creation is disabled
    #[display("Unknown character '{}'", _0)]
    UnknownCharacterReference(String),
    /// A new character arrived without any physical description
    #[display("Character '{}' has no physical description", _0)]
    MissingDescription(String),
}

/// Consistency error with source location tracking.
///
/// # Examples
///
/// ```
/// use veoprompt_error::{ConsistencyError, ConsistencyErrorKind};
///
/// let err = ConsistencyError::new(ConsistencyErrorKind::ConsistencyConflict {
///     character: "Bigfoot".to_string(),
///     attribute: "fur color".to_string(),
///     registered: "brown".to_string(),
///     proposed: "white".to_string(),
/// });
/// assert!(format!("{}", err).contains("'brown'"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Consistency Error: {} at line {} in {}", kind, line, file)]
pub struct ConsistencyError {
    /// The specific error condition
    pub kind: ConsistencyErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ConsistencyError {
    /// Create a new ConsistencyError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ConsistencyErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
