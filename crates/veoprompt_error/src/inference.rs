//! Errors at the model-inference boundary.

/// Failure modes shared by every inference capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum InferenceErrorKind {
    /// The backing service could not be reached or refused the call
    #[display("Inference service unavailable: {}", _0)]
    ServiceUnavailable(String),
    /// The service answered, but not in the expected schema
    #[display("Invalid response shape from {}: {}", capability, reason)]
    InvalidResponseShape {
        /// Capability that produced the response
        capability: String,
        /// What was wrong with it
        reason: String,
    },
}

/// Inference error with source location tracking.
///
/// # Examples
///
/// ```
/// use veoprompt_error::{InferenceError, InferenceErrorKind, RetryableError};
///
/// let err = InferenceError::new(InferenceErrorKind::InvalidResponseShape {
///     capability: "elaborator".to_string(),
///     reason: "missing field `description`".to_string(),
/// });
/// assert!(err.is_retryable());
/// assert!(format!("{}", err).contains("elaborator"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Inference Error: {} at line {} in {}", kind, line, file)]
pub struct InferenceError {
    /// The specific error condition
    pub kind: InferenceErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl InferenceError {
    /// Create a new InferenceError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: InferenceErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a schema violation reported by `capability`.
    #[track_caller]
    pub fn invalid_shape(capability: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(InferenceErrorKind::InvalidResponseShape {
            capability: capability.into(),
            reason: reason.into(),
        })
    }
}

impl crate::RetryableError for InferenceError {
    fn is_retryable(&self) -> bool {
        true
    }

    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        match self.kind {
            InferenceErrorKind::ServiceUnavailable(_) => (1000, 3, 8),
            InferenceErrorKind::InvalidResponseShape { .. } => (250, 2, 2),
        }
    }
}
