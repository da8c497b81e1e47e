//! Deterministic assembly of a [`FinalPrompt`] from a staged scene.

use std::collections::BTreeMap;
use tracing::{debug, instrument};
use veoprompt_core::{
    CharacterRegistry, FinalPrompt, KeyAction, ResolvedScene, TimingSegment, is_partition,
};
use veoprompt_error::{ConsistencyError, ConsistencyErrorKind, VeoResult};

const DEFAULT_CAMERA: &str =
    "POV, selfie stick, handheld and a little unsteady, like a real vlog";
const DEFAULT_MOOD: &str = "Natural, relaxed and unscripted";

/// Builds the final prompt. Pure: the same scene and registry always give
/// the same prompt.
///
/// Appearance notes are the registry's canonical description for each
/// character in the scene, never the scene-local sketch. The core action
/// joins the key actions in order and adds the dialogue only when the scene
/// has one. When the scene has a duration the timing breakdown partitions
/// it exactly: explicit action windows are used if they already form a
/// partition, otherwise the duration is split evenly.
///
/// # Errors
///
/// Returns `UnknownCharacterReference` if a scene character is missing from
/// the registry.
///
/// # Examples
///
/// ```
/// use veoprompt_core::{CharacterSketch, DraftAction, ResolvedScene, SceneDraft};
/// use veoprompt_pipeline::{assemble, reconcile};
///
/// let input = SceneDraft {
///     description: Some("Bigfoot fishing at dawn".to_string()),
///     characters: vec![CharacterSketch {
///         name: "Bigfoot".to_string(),
///         physical_description: Some("tall, brown fur".to_string()),
///         personality_traits: vec![],
///     }],
///     key_actions: vec![
///         DraftAction::Text("casts a line".to_string()),
///         DraftAction::Text("reels in a trout".to_string()),
///     ],
///     duration_seconds: Some(8.0),
///     ..SceneDraft::default()
/// }
/// .finalize(8, "turkish")
/// .unwrap();
///
/// let (scene, registry) = reconcile(input, &Default::default(), false).unwrap();
/// let prompt = assemble(&scene, &registry).unwrap();
/// assert_eq!(prompt.character_appearance_notes()["Bigfoot"], "tall, brown fur");
/// let labels: Vec<String> = prompt
///     .timing_breakdown()
///     .as_ref()
///     .unwrap()
///     .iter()
///     .map(|s| s.label())
///     .collect();
/// assert_eq!(labels, vec!["0-4s", "4-8s"]);
/// ```
#[instrument(skip_all, fields(characters = scene.input().characters_in_scene().len()))]
pub fn assemble(scene: &ResolvedScene, registry: &CharacterRegistry) -> VeoResult<FinalPrompt> {
    let input = scene.input();
    let staging = scene.staging();

    let mut appearance = BTreeMap::new();
    for name in input.characters_in_scene() {
        let character = registry.get(name).ok_or_else(|| {
            ConsistencyError::new(ConsistencyErrorKind::UnknownCharacterReference(
                name.clone(),
            ))
        })?;
        appearance.insert(
            character.name().clone(),
            character.physical_description().clone(),
        );
    }

    let main_character = non_blank(staging.main_character_description()).unwrap_or_else(|| {
        if scene.cast().is_empty() {
            "No one appears on camera; the landscape is the subject.".to_string()
        } else {
            scene
                .cast()
                .iter()
                .map(|c| format!("{}: {}", c.name(), c.physical_description()))
                .collect::<Vec<_>>()
                .join(". ")
        }
    });

    let timing = input
        .duration_seconds()
        .and_then(|seconds| timing_breakdown(input.key_actions(), seconds * 10));

    let prompt = FinalPrompt::builder()
        .main_character_description(main_character)
        .scene_setting_description(
            non_blank(staging.scene_setting_description())
                .unwrap_or_else(|| input.description().clone()),
        )
        .atmosphere_and_mood(
            non_blank(staging.atmosphere_and_mood()).unwrap_or_else(|| DEFAULT_MOOD.to_string()),
        )
        .core_action_and_dialogue(core_action(scene))
        .camera_style(
            non_blank(staging.camera_style()).unwrap_or_else(|| DEFAULT_CAMERA.to_string()),
        )
        .sounds(staging.sounds().clone())
        .character_appearance_notes(appearance)
        .landscape_notes(
            non_blank(staging.landscape_notes()).unwrap_or_else(|| input.description().clone()),
        )
        .props(staging.props().clone())
        .timing_breakdown(timing)
        .duration_seconds(*input.duration_seconds())
        .language(input.language().clone())
        .build()?;

    debug!(
        segments = prompt.timing_breakdown().as_ref().map(Vec::len),
        "Prompt assembled"
    );
    Ok(prompt)
}

fn non_blank(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn core_action(scene: &ResolvedScene) -> String {
    let input = scene.input();
    let mut sentences: Vec<String> = input
        .key_actions()
        .iter()
        .map(|a| sentence(a.text()))
        .collect();
    if let Some(dialogue) = input.dialogue() {
        let speaker = input
            .characters_in_scene()
            .first()
            .map(String::as_str)
            .unwrap_or("Someone off camera");
        sentences.push(format!(
            "{} says (in {}): \"{}\"",
            speaker,
            input.language(),
            dialogue.trim().trim_matches('"')
        ));
    }
    sentences.join(" ")
}

fn sentence(text: &str) -> String {
    let text = text.trim();
    let mut chars = text.chars();
    let mut out = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    if !out.ends_with(['.', '!', '?']) {
        out.push('.');
    }
    out
}

/// Timing segments covering `[0, total_tenths]` with no gap or overlap.
///
/// Returns `None` when there are more actions than tenths to share.
fn timing_breakdown(actions: &[KeyAction], total_tenths: u32) -> Option<Vec<TimingSegment>> {
    let explicit: Option<Vec<TimingSegment>> = actions
        .iter()
        .map(|a| {
            a.window()
                .map(|w| TimingSegment::new(*w.start_tenths(), *w.end_tenths(), a.text().clone()))
        })
        .collect();
    if let Some(segments) = explicit
        && is_partition(&segments, total_tenths)
    {
        return Some(segments);
    }

    let count = actions.len() as u32;
    if count == 0 || count > total_tenths {
        return None;
    }
    let boundary = |i: u32| (i * total_tenths + count / 2) / count;
    Some(
        actions
            .iter()
            .enumerate()
            .map(|(i, a)| {
                let i = i as u32;
                TimingSegment::new(boundary(i), boundary(i + 1), a.text().clone())
            })
            .collect(),
    )
}
