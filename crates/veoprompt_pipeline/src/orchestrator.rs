//! The per-scene pipeline.

use crate::assembly::assemble;
use crate::consistency::reconcile;
use crate::elaboration::{ElaborationStage, SceneContext};
use crate::filter::{AttemptLedger, NextStep, RealismFilter};
use crate::inference::DriverCapabilities;
use crate::session::Session;
use crate::staging::stage_scene;
use std::sync::Arc;
use tracing::{Span, info, instrument, warn};
use veoprompt_config::VeoPromptConfig;
use veoprompt_core::{CharacterRegistry, RealismOutcome, SceneInput, SceneRecord, Verdict};
use veoprompt_error::{SessionError, SessionErrorKind, VeoResult};
use veoprompt_interface::{
    ClarificationResponder, RealismJudge, SceneComposer, SceneElaborator, VeoDriver,
};
use veoprompt_template::PromptRenderer;

/// Runs scenes through elaboration, consistency, staging, the realism
/// filter, assembly and rendering, then appends them to a [`Session`].
///
/// The session is only written once a scene is accepted. Any failure on the
/// way, a timeout included, leaves the registry and history as they were.
///
/// Cheap to clone; capabilities are shared.
#[derive(Clone)]
pub struct Orchestrator {
    elaboration: ElaborationStage,
    composer: Arc<dyn SceneComposer>,
    filter: RealismFilter,
    renderer: PromptRenderer,
    config: Arc<VeoPromptConfig>,
}

impl Orchestrator {
    /// Orchestrator over explicit capabilities.
    ///
    /// Uses the template at `config.template.path` when set, otherwise the
    /// bundled one.
    ///
    /// # Errors
    ///
    /// Fails if the configured template cannot be loaded or a realism marker
    /// does not compile.
    pub fn new(
        elaborator: Arc<dyn SceneElaborator>,
        composer: Arc<dyn SceneComposer>,
        judge: Arc<dyn RealismJudge>,
        config: Arc<VeoPromptConfig>,
    ) -> VeoResult<Self> {
        let renderer = match &config.template.path {
            Some(path) => PromptRenderer::from_file(path)?,
            None => PromptRenderer::new(),
        };
        Ok(Self {
            elaboration: ElaborationStage::new(elaborator, Arc::clone(&config)),
            composer,
            filter: RealismFilter::new(judge)?,
            renderer,
            config,
        })
    }

    /// Orchestrator whose three capabilities all run on `driver`.
    ///
    /// # Errors
    ///
    /// See [`Orchestrator::new`].
    pub fn from_driver<D>(driver: D, config: Arc<VeoPromptConfig>) -> VeoResult<Self>
    where
        D: VeoDriver + 'static,
    {
        let capabilities = Arc::new(DriverCapabilities::new(driver, config.models.clone()));
        Self::new(
            capabilities.clone(),
            capabilities.clone(),
            capabilities,
            config,
        )
    }

    /// Replace the template renderer.
    pub fn with_renderer(mut self, renderer: PromptRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Effective configuration.
    pub fn config(&self) -> &VeoPromptConfig {
        &self.config
    }

    /// Processes one new scene and appends it to the session.
    ///
    /// # Errors
    ///
    /// Any stage failure. Use [`veoprompt_error::VeoError::disposition`] to
    /// decide whether to ask the user again.
    #[instrument(skip(self, session, responder), fields(session = %session.id(), sequence))]
    pub async fn process(
        &self,
        session: &mut Session,
        raw_text: &str,
        responder: &dyn ClarificationResponder,
    ) -> VeoResult<SceneRecord> {
        let sequence = session.next_sequence();
        Span::current().record("sequence", sequence);

        let context = SceneContext {
            registry: session.registry(),
            previous_scene: session.previous_rendered(),
        };
        let input = self
            .elaboration
            .elaborate_interactive(raw_text, context, responder)
            .await?;
        let (registry, record) = self.finish(input, context, sequence, 1).await?;

        session.commit(registry, record.clone());
        Ok(record)
    }

    /// Reworks an accepted scene from a correction and appends it as the
    /// next version of that scene. Earlier versions stay in the history.
    ///
    /// # Errors
    ///
    /// `UnknownScene` if `sequence` was never accepted, otherwise any stage
    /// failure.
    #[instrument(skip(self, session, correction, responder), fields(session = %session.id()))]
    pub async fn correct(
        &self,
        session: &mut Session,
        sequence: u32,
        correction: &str,
        responder: &dyn ClarificationResponder,
    ) -> VeoResult<SceneRecord> {
        let prior = session
            .latest(sequence)
            .ok_or_else(|| SessionError::new(SessionErrorKind::UnknownScene(sequence)))?;
        let version = prior.version() + 1;
        let raw_text = format!(
            "Correct the previous scene as follows, keeping everything else: {}",
            correction.trim()
        );

        let context = SceneContext {
            registry: session.registry(),
            previous_scene: Some(prior.rendered().as_str()),
        };
        let input = self
            .elaboration
            .elaborate_interactive(&raw_text, context, responder)
            .await?;
        let (registry, record) = self.finish(input, context, sequence, version).await?;

        session.commit(registry, record.clone());
        Ok(record)
    }

    async fn finish(
        &self,
        mut input: SceneInput,
        context: SceneContext<'_>,
        sequence: u32,
        version: u32,
    ) -> VeoResult<(CharacterRegistry, SceneRecord)> {
        let mut ledger = AttemptLedger::new(self.config.pipeline.max_filter_attempts);

        loop {
            let (resolved, registry) = reconcile(
                input.clone(),
                context.registry,
                self.config.pipeline.strict_characters,
            )?;
            let staged = stage_scene(self.composer.as_ref(), resolved, &self.config).await?;
            let prompt = assemble(&staged, &registry)?;
            let rendered = self.renderer.render(&prompt)?;

            let reasons = match self.filter.filter(&staged, &rendered, &self.config).await? {
                Verdict::Accept => {
                    info!(attempt = ledger.attempts() + 1, "Scene accepted");
                    let record =
                        SceneRecord::new(sequence, version, prompt, rendered, RealismOutcome::Accepted);
                    return Ok((registry, record));
                }
                Verdict::Reject(reasons) => reasons,
            };

            match ledger.record_reject(reasons) {
                NextStep::Revise(directive) => {
                    info!(attempt = ledger.attempts(), fields = ?directive.fields(), "Revising rejected scene");
                    input = self.elaboration.revise(&input, &directive, context).await?;
                }
                NextStep::Stop if self.config.pipeline.accept_degraded => {
                    warn!(reasons = ?ledger.reasons(), "Keeping scene despite realism concerns");
                    let record = SceneRecord::new(
                        sequence,
                        version,
                        prompt,
                        rendered,
                        RealismOutcome::Degraded(ledger.reasons()),
                    );
                    return Ok((registry, record));
                }
                NextStep::Stop => return Err(ledger.into_error().into()),
            }
        }
    }
}
