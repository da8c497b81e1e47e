mod test_utils;

use test_utils::*;
use veoprompt_core::{CharacterRegistry, DraftAction, SceneDraft};
use veoprompt_error::{ConsistencyErrorKind, VeoErrorKind};
use veoprompt_pipeline::{assemble, reconcile};
use veoprompt_template::PromptRenderer;

#[test]
fn assembly_is_deterministic() -> anyhow::Result<()> {
    let input = breakfast_draft().finalize(8, "turkish")?;
    let (scene, registry) = reconcile(input, &CharacterRegistry::default(), false)?;
    let scene = scene.with_staging(staging());

    let first = assemble(&scene, &registry)?;
    let second = assemble(&scene, &registry)?;
    assert_eq!(first, second);

    let renderer = PromptRenderer::new();
    assert_eq!(renderer.render(&first)?, renderer.render(&second)?);
    Ok(())
}

#[test]
fn missing_registry_entry_is_an_error() -> anyhow::Result<()> {
    let input = breakfast_draft().finalize(8, "turkish")?;
    let (scene, _) = reconcile(input, &CharacterRegistry::default(), false)?;

    let err = assemble(&scene, &CharacterRegistry::default()).unwrap_err();
    assert!(matches!(
        err.kind(),
        VeoErrorKind::Consistency(e)
            if e.kind == ConsistencyErrorKind::UnknownCharacterReference("Bigfoot".to_string())
    ));
    Ok(())
}

#[test]
fn dialogue_is_attributed_to_the_first_character() -> anyhow::Result<()> {
    let input = SceneDraft {
        dialogue: Some("Günaydın, kamp arkadaşları!".to_string()),
        ..breakfast_draft()
    }
    .finalize(8, "turkish")?;
    let (scene, registry) = reconcile(input, &CharacterRegistry::default(), false)?;

    let prompt = assemble(&scene.with_staging(staging()), &registry)?;
    assert!(
        prompt
            .core_action_and_dialogue()
            .ends_with(r#"Bigfoot says (in turkish): "Günaydın, kamp arkadaşları!""#)
    );
    Ok(())
}

#[test]
fn explicit_windows_are_kept_when_they_partition_the_clip() -> anyhow::Result<()> {
    let input = SceneDraft {
        key_actions: vec![
            DraftAction::Detailed {
                text: "cracks eggs".to_string(),
                start_seconds: Some(0.0),
                end_seconds: Some(1.5),
            },
            DraftAction::Detailed {
                text: "eats".to_string(),
                start_seconds: Some(1.5),
                end_seconds: Some(8.0),
            },
        ],
        ..breakfast_draft()
    }
    .finalize(8, "turkish")?;
    let (scene, registry) = reconcile(input, &CharacterRegistry::default(), false)?;

    let prompt = assemble(&scene, &registry)?;
    let labels: Vec<String> = prompt
        .timing_breakdown()
        .as_ref()
        .expect("timed scene")
        .iter()
        .map(|s| s.label())
        .collect();
    assert_eq!(labels, vec!["0-1.5s", "1.5-8s"]);
    Ok(())
}

#[test]
fn untimed_scene_has_no_breakdown() -> anyhow::Result<()> {
    let input = SceneDraft {
        duration_seconds: None,
        ..breakfast_draft()
    }
    .finalize(8, "turkish")?;
    let (scene, registry) = reconcile(input, &CharacterRegistry::default(), false)?;

    let prompt = assemble(&scene, &registry)?;
    assert!(prompt.timing_breakdown().is_none());
    // Without staging the defaults fill every mandatory section.
    assert!(!prompt.camera_style().is_empty());
    assert_eq!(
        prompt.scene_setting_description(),
        "Bigfoot vlogging about cooking breakfast at a campsite"
    );
    Ok(())
}
