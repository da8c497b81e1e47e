//! Production prose for a resolved scene.

use crate::retry::run_stage;
use tracing::instrument;
use veoprompt_config::VeoPromptConfig;
use veoprompt_core::ResolvedScene;
use veoprompt_error::{InferenceError, PipelineStage, VeoError, VeoResult};
use veoprompt_interface::SceneComposer;

/// Asks the composer for staging and attaches it to the scene.
///
/// Staging with a blank setting, mood, camera or landscape counts as an
/// invalid response and is retried like any other.
#[instrument(skip_all, fields(cast = scene.cast().len()))]
pub async fn stage_scene(
    composer: &dyn SceneComposer,
    scene: ResolvedScene,
    config: &VeoPromptConfig,
) -> VeoResult<ResolvedScene> {
    let staging = run_stage(
        PipelineStage::Staging,
        &config.retry,
        config.timeouts.stage(),
        || async {
            let staging = composer.compose(&scene).await?;
            let blank = staging.blank_fields();
            if !blank.is_empty() {
                return Err(InferenceError::invalid_shape(
                    "composer",
                    format!("blank {}", blank.join(", ")),
                )
                .into());
            }
            Ok::<_, VeoError>(staging)
        },
    )
    .await?;
    Ok(scene.with_staging(staging))
}
