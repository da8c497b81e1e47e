//! Elaboration stage errors.

/// Specific error conditions for scene elaboration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ElaborationErrorKind {
    /// Clarification rounds ran out before the scene was complete
    #[display(
        "Scene still incomplete after {} clarification rounds (missing: {})",
        rounds,
        missing
    )]
    MaxClarificationRoundsExceeded {
        /// Rounds that were attempted
        rounds: u32,
        /// Comma-separated slots that were still missing
        missing: String,
    },
    /// The interactive surface could not supply an answer
    #[display("Clarification answer unavailable: {}", _0)]
    ClarificationUnavailable(String),
    /// The user answered a clarification with nothing
    #[display("Clarification answer was empty")]
    EmptyAnswer,
    /// Scene input text was blank
    #[display("Scene text is empty")]
    EmptyInput,
}

/// Elaboration error with source location tracking.
///
/// # Examples
///
/// ```
/// use veoprompt_error::{ElaborationError, ElaborationErrorKind};
///
/// let err = ElaborationError::new(ElaborationErrorKind::MaxClarificationRoundsExceeded {
///     rounds: 5,
///     missing: "key_actions".to_string(),
/// });
/// assert!(format!("{}", err).contains("5 clarification rounds"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Elaboration Error: {} at line {} in {}", kind, line, file)]
pub struct ElaborationError {
    /// The specific error condition
    pub kind: ElaborationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ElaborationError {
    /// Create a new ElaborationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ElaborationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
