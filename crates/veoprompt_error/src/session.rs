//! Session bookkeeping errors.

/// Specific error conditions for session operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SessionErrorKind {
    /// No scene with this sequence number has been recorded
    #[display("No scene #{} in this session", _0)]
    UnknownScene(u32),
    /// An edit named a character the registry has never seen
    #[display("Cannot edit unknown character '{}'", _0)]
    UnknownCharacter(String),
    /// An edit changed nothing
    #[display("Edit for '{}' contains no changes", _0)]
    EmptyEdit(String),
    /// The session file could not be written
    #[display("Cannot write session to {}: {}", path, reason)]
    SaveFailed {
        /// Destination path
        path: String,
        /// Underlying I/O error
        reason: String,
    },
}

/// Session error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Session Error: {} at line {} in {}", kind, line, file)]
pub struct SessionError {
    /// The specific error condition
    pub kind: SessionErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl SessionError {
    /// Create a new SessionError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SessionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
