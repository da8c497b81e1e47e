//! Realism filter errors.

/// Specific error conditions for the realism filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RealismErrorKind {
    /// Every attempt was rejected
    #[display(
        "Realism validation failed after {} attempt(s): {}",
        attempts,
        reasons.join("; ")
    )]
    RealismValidationFailed {
        /// Attempts made before giving up
        attempts: u32,
        /// Every distinct reason collected across attempts, in first-seen order
        reasons: Vec<String>,
    },
}

/// Realism error with source location tracking.
///
/// # Examples
///
/// ```
/// use veoprompt_error::{RealismError, RealismErrorKind};
///
/// let err = RealismError::new(RealismErrorKind::RealismValidationFailed {
///     attempts: 2,
///     reasons: vec!["cartoonish quality: googly eyes".to_string()],
/// });
/// assert!(format!("{}", err).contains("googly eyes"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Realism Error: {} at line {} in {}", kind, line, file)]
pub struct RealismError {
    /// The specific error condition
    pub kind: RealismErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl RealismError {
    /// Create a new RealismError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RealismErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Reasons carried by the failure.
    pub fn reasons(&self) -> &[String] {
        match &self.kind {
            RealismErrorKind::RealismValidationFailed { reasons, .. } => reasons,
        }
    }
}
