//! Turning raw scene text into a validated [`SceneInput`].

use crate::retry::run_stage;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use veoprompt_config::VeoPromptConfig;
use veoprompt_core::{
    CharacterRegistry, ClarificationRequest, RevisionDirective, SceneDraft, SceneField,
    SceneInput,
};
use veoprompt_error::{
    ElaborationError, ElaborationErrorKind, InferenceError, PipelineStage, StageError,
    StageErrorKind, VeoError, VeoResult,
};
use veoprompt_interface::{
    ClarificationResponder, ClarifiedAnswer, ElaborationRequest, ElaborationRequestBuilder,
    SceneElaborator,
};

/// Result of one elaboration pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Elaboration {
    /// Every required slot is filled
    Complete(SceneInput),
    /// The user has to answer before elaboration can finish
    NeedsClarification(ClarificationRequest),
}

/// Session state elaboration reads but never changes.
#[derive(Debug, Clone, Copy)]
pub struct SceneContext<'a> {
    /// Characters established so far
    pub registry: &'a CharacterRegistry,
    /// Rendered text of the scene before this one
    pub previous_scene: Option<&'a str>,
}

/// The elaboration stage: single passes, the clarification loop, and
/// field-scoped revision after a realism reject.
#[derive(Clone)]
pub struct ElaborationStage {
    elaborator: Arc<dyn SceneElaborator>,
    config: Arc<VeoPromptConfig>,
}

impl ElaborationStage {
    /// Stage over an elaborator capability.
    pub fn new(elaborator: Arc<dyn SceneElaborator>, config: Arc<VeoPromptConfig>) -> Self {
        Self { elaborator, config }
    }

    fn request(
        &self,
        raw_text: &str,
        context: SceneContext<'_>,
        answers: &[ClarifiedAnswer],
    ) -> ElaborationRequestBuilder {
        let mut builder = ElaborationRequest::builder();
        builder
            .raw_text(raw_text)
            .answers(answers.to_vec())
            .known_characters(context.registry.characters().cloned().collect::<Vec<_>>())
            .previous_scene(context.previous_scene.map(str::to_string))
            .language(self.config.scene.language.clone())
            .duration_cap(self.config.scene.duration_cap_seconds);
        builder
    }

    fn finalize(&self, draft: SceneDraft) -> Result<SceneInput, InferenceError> {
        draft
            .finalize(
                self.config.scene.duration_cap_seconds,
                &self.config.scene.language,
            )
            .map_err(|e| InferenceError::invalid_shape("elaborator", e.to_string()))
    }

    /// One elaboration pass.
    ///
    /// Returns a clarification request when the draft is missing a required
    /// slot, otherwise the validated scene. `round` numbers the clarification
    /// this pass would trigger.
    ///
    /// # Errors
    ///
    /// Fails with a stage error when the elaborator keeps failing or returns
    /// drafts that violate the scene schema.
    #[instrument(skip(self, context, answers), fields(answers = answers.len()))]
    pub async fn elaborate(
        &self,
        raw_text: &str,
        context: SceneContext<'_>,
        answers: &[ClarifiedAnswer],
        round: u32,
    ) -> VeoResult<Elaboration> {
        if raw_text.trim().is_empty() {
            return Err(ElaborationError::new(ElaborationErrorKind::EmptyInput).into());
        }
        let request = self.request(raw_text, context, answers).build()?;

        run_stage(
            PipelineStage::Elaboration,
            &self.config.retry,
            self.config.timeouts.stage(),
            || async {
                let draft = self.elaborator.draft(&request).await?;
                let missing = draft.missing_slots(context.registry);
                if !missing.is_empty() {
                    debug!(?missing, "Draft incomplete");
                    return Ok(Elaboration::NeedsClarification(ClarificationRequest::new(
                        missing, None, round,
                    )));
                }
                Ok::<_, VeoError>(Elaboration::Complete(self.finalize(draft)?))
            },
        )
        .await
    }

    /// Elaborates with clarification rounds until the scene is complete.
    ///
    /// Each answer is added to the conversation and elaboration runs again.
    ///
    /// # Errors
    ///
    /// - `MaxClarificationRoundsExceeded` when the scene is still incomplete
    ///   after the configured number of answers
    /// - `EmptyAnswer` when the user answers with nothing
    /// - a `clarification` stage timeout when no answer arrives in time
    #[instrument(skip(self, context, responder))]
    pub async fn elaborate_interactive(
        &self,
        raw_text: &str,
        context: SceneContext<'_>,
        responder: &dyn ClarificationResponder,
    ) -> VeoResult<SceneInput> {
        let max_rounds = self.config.pipeline.max_clarification_rounds;
        let mut answers: Vec<ClarifiedAnswer> = Vec::new();
        let mut round = 1;

        loop {
            let clarification = match self.elaborate(raw_text, context, &answers, round).await? {
                Elaboration::Complete(input) => {
                    info!(rounds = round - 1, "Scene elaborated");
                    return Ok(input);
                }
                Elaboration::NeedsClarification(request) => request,
            };

            if round > max_rounds {
                let missing = clarification
                    .missing()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(ElaborationError::new(
                    ElaborationErrorKind::MaxClarificationRoundsExceeded {
                        rounds: max_rounds,
                        missing,
                    },
                )
                .into());
            }

            let answer = self.ask(responder, &clarification).await?;
            answers.push(ClarifiedAnswer::new(clarification.question(), answer));
            round += 1;
        }
    }

    async fn ask(
        &self,
        responder: &dyn ClarificationResponder,
        request: &ClarificationRequest,
    ) -> VeoResult<String> {
        let allowance = self.config.timeouts.clarification();
        let answer = tokio::time::timeout(allowance, responder.answer(request))
            .await
            .map_err(|_| {
                StageError::new(StageErrorKind::Timeout {
                    stage: PipelineStage::Clarification,
                    seconds: allowance.as_secs(),
                })
            })??;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(ElaborationError::new(ElaborationErrorKind::EmptyAnswer).into());
        }
        Ok(answer.to_string())
    }

    /// Regenerates only the fields named by `directive`.
    ///
    /// Fields outside the directive are copied from `input` unchanged. A
    /// covered field the elaborator leaves empty keeps its previous value.
    ///
    /// # Errors
    ///
    /// Fails with a stage error when the elaborator keeps failing or the
    /// merged scene violates the scene schema.
    #[instrument(skip_all, fields(fields = ?directive.fields()))]
    pub async fn revise(
        &self,
        input: &SceneInput,
        directive: &RevisionDirective,
        context: SceneContext<'_>,
    ) -> VeoResult<SceneInput> {
        let request = self
            .request(input.description(), context, &[])
            .prior(Some(input.clone()))
            .revision(Some(directive.clone()))
            .build()?;

        run_stage(
            PipelineStage::Elaboration,
            &self.config.retry,
            self.config.timeouts.stage(),
            || async {
                let revised = self.elaborator.draft(&request).await?;
                Ok::<_, VeoError>(self.finalize(merge_revision(input, revised, directive))?)
            },
        )
        .await
    }
}

fn merge_revision(
    prior: &SceneInput,
    revised: SceneDraft,
    directive: &RevisionDirective,
) -> SceneDraft {
    let mut merged = prior.to_draft();
    if directive.covers(SceneField::Description)
        && let Some(description) = revised.description.filter(|d| !d.trim().is_empty())
    {
        merged.description = Some(description);
    }
    // Dialogue is optional, so a revision may drop it.
    if directive.covers(SceneField::Dialogue) {
        merged.dialogue = revised.dialogue.filter(|d| !d.trim().is_empty());
    }
    if directive.covers(SceneField::KeyActions) && !revised.key_actions.is_empty() {
        merged.key_actions = revised.key_actions;
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use veoprompt_core::{CharacterSketch, DraftAction, RealismConcern, RejectReason};

    fn prior() -> SceneInput {
        SceneDraft {
            description: Some("Bigfoot at the campfire".to_string()),
            characters: vec![CharacterSketch::named("Bigfoot")],
            dialogue: Some("Morning, folks.".to_string()),
            key_actions: vec![DraftAction::Text("waves at the camera".to_string())],
            ..SceneDraft::default()
        }
        .finalize(8, "turkish")
        .unwrap()
    }

    #[test]
    fn merge_keeps_fields_outside_the_directive() {
        let directive = RevisionDirective::from_reasons(vec![RejectReason::new(
            RealismConcern::ImplausibleAction,
            "floats above the fire",
        )]);
        let revised = SceneDraft {
            description: Some("A cartoon Bigfoot".to_string()),
            dialogue: Some("Behold!".to_string()),
            key_actions: vec![DraftAction::Text("pokes the fire with a stick".to_string())],
            ..SceneDraft::default()
        };

        let merged = merge_revision(&prior(), revised, &directive);
        assert_eq!(merged.description.as_deref(), Some("Bigfoot at the campfire"));
        assert_eq!(merged.dialogue.as_deref(), Some("Morning, folks."));
        assert_eq!(
            merged.key_actions,
            vec![DraftAction::Text("pokes the fire with a stick".to_string())]
        );
        assert_eq!(merged.characters, vec![CharacterSketch::named("Bigfoot")]);
    }

    #[test]
    fn revision_can_drop_dialogue_but_not_description() {
        let directive = RevisionDirective::from_reasons(vec![
            RejectReason::new(RealismConcern::TheatricalDelivery, "monologue"),
            RejectReason::new(RealismConcern::CartoonishQuality, "cartoon description"),
        ]);
        let revised = SceneDraft {
            description: Some("   ".to_string()),
            dialogue: None,
            ..SceneDraft::default()
        };

        let merged = merge_revision(&prior(), revised, &directive);
        assert_eq!(merged.dialogue, None);
        assert_eq!(merged.description.as_deref(), Some("Bigfoot at the campfire"));
        assert_eq!(
            merged.key_actions,
            vec![DraftAction::Text("waves at the camera".to_string())]
        );
    }
}
