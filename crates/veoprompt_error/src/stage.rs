//! Stage-level failures: timeouts and exhausted retries.

/// The fixed set of pipeline stages, used to label stage failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineStage {
    /// Elaborating raw text into a scene
    #[display("elaboration")]
    Elaboration,
    /// Waiting for the user to answer a clarification
    #[display("clarification")]
    Clarification,
    /// Generating production staging prose
    #[display("staging")]
    Staging,
    /// Judging realism
    #[display("realism filter")]
    Filter,
}

/// Specific error conditions at the stage level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StageErrorKind {
    /// The stage did not finish within its time allowance
    #[display("{} stage timed out after {}s", stage, seconds)]
    Timeout {
        /// Stage that timed out
        stage: PipelineStage,
        /// Allowance in seconds
        seconds: u64,
    },
    /// Transient failures persisted past the retry limit
    #[display("{} stage failed after {} attempt(s): {}", stage, attempts, last)]
    RetriesExhausted {
        /// Stage that failed
        stage: PipelineStage,
        /// Attempts made
        attempts: usize,
        /// Message of the final failure
        last: String,
    },
}

/// Stage error with source location tracking.
///
/// # Examples
///
/// ```
/// use veoprompt_error::{PipelineStage, StageError, StageErrorKind};
///
/// let err = StageError::new(StageErrorKind::Timeout {
///     stage: PipelineStage::Staging,
///     seconds: 30,
/// });
/// assert!(format!("{}", err).contains("staging stage timed out"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Stage Error: {} at line {} in {}", kind, line, file)]
pub struct StageError {
    /// The specific error condition
    pub kind: StageErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StageError {
    /// Create a new StageError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
