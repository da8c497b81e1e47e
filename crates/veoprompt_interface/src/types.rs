//! Request types shared across capabilities.

use serde::{Deserialize, Serialize};
use veoprompt_core::{Character, RevisionDirective, SceneInput};
use veoprompt_error::{BuilderError, BuilderErrorKind};

/// A clarification question and the user's answer to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ClarifiedAnswer {
    /// Question that was asked
    question: String,
    /// What the user said
    answer: String,
}

impl ClarifiedAnswer {
    /// New question/answer pair.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Everything an elaborator may use to draft a scene.
///
/// # Examples
///
/// ```
/// use veoprompt_interface::ElaborationRequest;
///
/// let request = ElaborationRequest::builder()
///     .raw_text("Bigfoot is tired of the beatboxing")
///     .language("turkish")
///     .duration_cap(8u32)
///     .build()
///     .unwrap();
///
/// assert!(request.revision().is_none());
/// assert!(request.answers().is_empty());
/// ```
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters, derive_builder::Builder,
)]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
pub struct ElaborationRequest {
    /// The user's scene text
    raw_text: String,
    /// Clarifications gathered so far, oldest first
    #[builder(default)]
    answers: Vec<ClarifiedAnswer>,
    /// Registered characters, for inference and continuity
    #[builder(default)]
    known_characters: Vec<Character>,
    /// Rendered text of the previous scene, if any
    #[builder(default)]
    previous_scene: Option<String>,
    /// Scene being revised or corrected
    #[builder(default)]
    prior: Option<SceneInput>,
    /// Fields to regenerate and why; `None` for a fresh draft
    #[builder(default)]
    revision: Option<RevisionDirective>,
    /// Default dialogue language
    language: String,
    /// Longest allowed clip, in seconds
    duration_cap: u32,
}

impl ElaborationRequest {
    /// Start building a request.
    pub fn builder() -> ElaborationRequestBuilder {
        ElaborationRequestBuilder::default()
    }
}

impl ElaborationRequestBuilder {
    /// Build the request.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError`] if the scene text, language or cap is missing.
    pub fn build(&self) -> Result<ElaborationRequest, BuilderError> {
        self.build_internal()
            .map_err(|e| BuilderError::new(BuilderErrorKind::MissingField(e.to_string())))
    }
}
