//! Top-level error wrapper types.

use crate::{
    BuilderError, ConfigError, ConsistencyError, ConsistencyErrorKind, ElaborationError,
    ElaborationErrorKind, GeminiError, InferenceError, JsonError, RealismError, RetryableError,
    SessionError, StageError, TemplateError,
};

/// Every failure the pipeline can surface.
///
/// # Examples
///
/// ```
/// use veoprompt_error::{VeoError, JsonError};
///
/// let err: VeoError = JsonError::new("expected value at line 1").into();
/// assert!(format!("{}", err).contains("JSON Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum VeoErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Gemini transport error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Inference capability error
    #[from(InferenceError)]
    Inference(InferenceError),
    /// Elaboration stage error
    #[from(ElaborationError)]
    Elaboration(ElaborationError),
    /// Consistency stage error
    #[from(ConsistencyError)]
    Consistency(ConsistencyError),
    /// Realism filter error
    #[from(RealismError)]
    Realism(RealismError),
    /// Stage timeout or exhausted retries
    #[from(StageError)]
    Stage(StageError),
    /// Template contract violation
    #[from(TemplateError)]
    Template(TemplateError),
    /// Session bookkeeping error
    #[from(SessionError)]
    Session(SessionError),
}

/// What the conversation should do after a failed scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Disposition {
    /// Show the error and ask the user for revised input
    #[display("re-prompt")]
    Reprompt,
    /// Drop the scene
    #[display("abort")]
    Abort,
}

/// VeoPrompt error with kind discrimination.
///
/// # Examples
///
/// ```
/// use veoprompt_error::{ConfigError, VeoResult};
///
/// fn load() -> VeoResult<()> {
///     Err(ConfigError::new("missing [pipeline] section"))?
/// }
///
/// assert!(load().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("VeoPrompt Error: {}", _0)]
pub struct VeoError(Box<VeoErrorKind>);

impl VeoError {
    /// Create a new error from a kind.
    pub fn new(kind: VeoErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &VeoErrorKind {
        &self.0
    }

    /// Decide whether the user can fix this by answering again.
    ///
    /// Clarification exhaustion and character conflicts go back to the user;
    /// everything else aborts the scene.
    pub fn disposition(&self) -> Disposition {
        match self.kind() {
            VeoErrorKind::Elaboration(e) => match e.kind {
                ElaborationErrorKind::MaxClarificationRoundsExceeded { .. }
                | ElaborationErrorKind::EmptyAnswer
                | ElaborationErrorKind::EmptyInput => Disposition::Reprompt,
                ElaborationErrorKind::ClarificationUnavailable(_) => Disposition::Abort,
            },
            VeoErrorKind::Consistency(e) => match e.kind {
                ConsistencyErrorKind::ConsistencyConflict { .. }
                | ConsistencyErrorKind::UnknownCharacterReference(_)
                | ConsistencyErrorKind::MissingDescription(_) => Disposition::Reprompt,
            },
            VeoErrorKind::Session(_) => Disposition::Reprompt,
            _ => Disposition::Abort,
        }
    }
}

impl RetryableError for VeoError {
    fn is_retryable(&self) -> bool {
        match self.kind() {
            VeoErrorKind::Gemini(e) => e.is_retryable(),
            VeoErrorKind::Inference(e) => e.is_retryable(),
            _ => false,
        }
    }

    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        match self.kind() {
            VeoErrorKind::Gemini(e) => e.retry_strategy_params(),
            VeoErrorKind::Inference(e) => e.retry_strategy_params(),
            _ => (500, 2, 4),
        }
    }
}

// Generic From implementation for any type that converts to VeoErrorKind
impl<T> From<T> for VeoError
where
    T: Into<VeoErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for VeoPrompt operations.
pub type VeoResult<T> = std::result::Result<T, VeoError>;
