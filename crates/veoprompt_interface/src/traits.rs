//! Trait definitions for model backends and inference capabilities.

use crate::ElaborationRequest;
use async_trait::async_trait;
use veoprompt_core::{
    ClarificationRequest, GenerateRequest, GenerateResponse, ResolvedScene, SceneDraft,
    SceneStaging, Verdict,
};
use veoprompt_error::VeoResult;

/// Core trait that all model backends implement.
#[async_trait]
pub trait VeoDriver: Send + Sync {
    /// Generate model output for a request.
    async fn generate(&self, req: &GenerateRequest) -> VeoResult<GenerateResponse>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Default model identifier.
    fn model_name(&self) -> &str;
}

/// Text elaboration: raw scene text in, scene-shaped draft out.
///
/// Implementations fill what they can and leave the rest empty; the
/// pipeline decides what is still missing.
#[async_trait]
pub trait SceneElaborator: Send + Sync {
    /// Draft a scene, or revise the fields a directive names.
    async fn draft(&self, request: &ElaborationRequest) -> VeoResult<SceneDraft>;
}

/// Structured generation: validated scene in, staging prose out.
#[async_trait]
pub trait SceneComposer: Send + Sync {
    /// Write setting, mood, camera, sound, landscape and props for a scene.
    async fn compose(&self, scene: &ResolvedScene) -> VeoResult<SceneStaging>;
}

/// Binary classification of a rendered candidate.
#[async_trait]
pub trait RealismJudge: Send + Sync {
    /// Accept, or reject with reasons.
    async fn judge(&self, candidate: &str) -> VeoResult<Verdict>;
}

/// The person on the other end of the conversation.
#[async_trait]
pub trait ClarificationResponder: Send + Sync {
    /// Ask a clarification question and wait for the answer.
    async fn answer(&self, request: &ClarificationRequest) -> VeoResult<String>;
}
