//! Capability implementations on top of any [`VeoDriver`].

use crate::extraction::parse_reply;
use crate::prompts;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, instrument};
use veoprompt_config::{ModelConfig, ModelsConfig};
use veoprompt_core::{
    GenerateRequest, Message, RealismConcern, RejectReason, ResolvedScene, Role, SceneDraft,
    SceneStaging, Verdict,
};
use veoprompt_error::{InferenceError, VeoResult};
use veoprompt_interface::{
    ElaborationRequest, RealismJudge, SceneComposer, SceneElaborator, VeoDriver,
};

/// Elaborator, composer and judge backed by one text-generation driver.
///
/// Each capability uses its own model settings from [`ModelsConfig`] and
/// expects a JSON object back. Replies that do not match are reported as
/// `InvalidResponseShape`, which the pipeline retries.
pub struct DriverCapabilities<D> {
    driver: Arc<D>,
    models: ModelsConfig,
}

impl<D> Clone for DriverCapabilities<D> {
    fn clone(&self) -> Self {
        Self {
            driver: Arc::clone(&self.driver),
            models: self.models.clone(),
        }
    }
}

impl<D: VeoDriver> DriverCapabilities<D> {
    /// Wrap a driver.
    pub fn new(driver: D, models: ModelsConfig) -> Self {
        Self::shared(Arc::new(driver), models)
    }

    /// Wrap a driver that is also used elsewhere.
    pub fn shared(driver: Arc<D>, models: ModelsConfig) -> Self {
        Self { driver, models }
    }

    async fn ask<T: DeserializeOwned>(
        &self,
        capability: &str,
        settings: &ModelConfig,
        system: String,
        body: String,
    ) -> VeoResult<T> {
        let request = GenerateRequest {
            messages: vec![Message::text(Role::System, system), Message::text(Role::User, body)],
            max_tokens: Some(settings.max_tokens),
            temperature: Some(settings.temperature),
            model: Some(settings.model.clone()),
        };
        let response = self.driver.generate(&request).await?;
        let text = response.text();
        debug!(
            capability,
            provider = self.driver.provider_name(),
            model = %settings.model,
            reply_length = text.len(),
            "Capability reply received"
        );
        Ok(parse_reply(capability, &text)?)
    }
}

#[async_trait]
impl<D: VeoDriver> SceneElaborator for DriverCapabilities<D> {
    #[instrument(skip_all, fields(answers = request.answers().len(), revision = request.revision().is_some()))]
    async fn draft(&self, request: &ElaborationRequest) -> VeoResult<SceneDraft> {
        self.ask(
            "elaborator",
            &self.models.elaborator,
            prompts::elaborator_system(),
            prompts::elaboration_body(request),
        )
        .await
    }
}

#[async_trait]
impl<D: VeoDriver> SceneComposer for DriverCapabilities<D> {
    #[instrument(skip_all, fields(cast = scene.cast().len()))]
    async fn compose(&self, scene: &ResolvedScene) -> VeoResult<SceneStaging> {
        self.ask(
            "composer",
            &self.models.composer,
            prompts::composer_system(),
            prompts::staging_body(scene),
        )
        .await
    }
}

#[derive(Debug, Deserialize)]
struct JudgeReply {
    verdict: String,
    #[serde(default)]
    reasons: Vec<JudgeReason>,
}

#[derive(Debug, Deserialize)]
struct JudgeReason {
    concern: RealismConcern,
    detail: String,
}

impl JudgeReply {
    fn into_verdict(self) -> Result<Verdict, InferenceError> {
        match self.verdict.trim().to_lowercase().as_str() {
            "accept" => Ok(Verdict::Accept),
            "reject" if self.reasons.is_empty() => Err(InferenceError::invalid_shape(
                "judge",
                "rejection without reasons",
            )),
            "reject" => Ok(Verdict::Reject(
                self.reasons
                    .into_iter()
                    .map(|r| RejectReason::new(r.concern, r.detail))
                    .collect(),
            )),
            other => Err(InferenceError::invalid_shape(
                "judge",
                format!("unknown verdict '{}'", other),
            )),
        }
    }
}

#[async_trait]
impl<D: VeoDriver> RealismJudge for DriverCapabilities<D> {
    #[instrument(skip_all, fields(candidate_length = candidate.len()))]
    async fn judge(&self, candidate: &str) -> VeoResult<Verdict> {
        let reply: JudgeReply = self
            .ask(
                "judge",
                &self.models.judge,
                prompts::judge_system(),
                candidate.to_string(),
            )
            .await?;
        Ok(reply.into_verdict()?)
    }
}
