//! Template rendering errors.
//!
//! A render failure means the assembled prompt broke the template contract.
//! Callers treat every kind here as fatal.

/// Specific error conditions for template rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TemplateErrorKind {
    /// The template source failed to compile
    #[display("Invalid template: {}", _0)]
    InvalidTemplate(String),
    /// The engine failed while rendering
    #[display("Template render failed: {}", _0)]
    RenderFailed(String),
    /// A mandatory section rendered empty or not at all
    #[display("Rendered prompt is missing required section '{}'", _0)]
    MissingField(String),
}

/// Template error with source location tracking.
///
/// # Examples
///
/// ```
/// use veoprompt_error::{TemplateError, TemplateErrorKind};
///
/// let err = TemplateError::new(TemplateErrorKind::MissingField("Camera Style".to_string()));
/// assert!(format!("{}", err).contains("Camera Style"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Template Error: {} at line {} in {}", kind, line, file)]
pub struct TemplateError {
    /// The specific error condition
    pub kind: TemplateErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl TemplateError {
    /// Create a new TemplateError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TemplateErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
