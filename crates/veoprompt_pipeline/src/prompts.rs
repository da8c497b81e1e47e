//! System prompts and request bodies for the model-backed capabilities.

use std::fmt::Write;
use veoprompt_core::{Character, ResolvedScene};
use veoprompt_interface::ElaborationRequest;

/// Shared style brief every capability starts from.
const STYLE_BRIEF: &str = "\
You help produce prompts for an AI video model. Every clip must read as a \
real, unpolished YouTube outdoor vlog in the spirit of the channel 'Outdoor Boys': \
filmed POV on a selfie stick, handheld and a little unsteady, natural light, no \
cinematic polish. Characters may be fantastical (Bigfoot, a Yeti, a balloonfish) \
but they move, react and speak like ordinary people filmed by a friend. \
Clips are short; everything that happens must fit the stated duration.";

pub(crate) fn elaborator_system() -> String {
    format!(
        "{STYLE_BRIEF}

Your job: turn the user's scene idea into a structured scene. Keep their intent; \
add only the concrete detail a camera operator would need. Do not invent dialogue \
unless the user asked for someone to say something. Reuse the exact appearance of \
any known character; never contradict it. If something essential is unknown \
(what happens, who is in it, what a brand-new character looks like) leave that \
field empty instead of guessing.

Reply with ONLY a JSON object of this shape:
{{
  \"description\": string or null,
  \"characters\": [{{\"name\": string, \"physical_description\": string or null, \"personality_traits\": [string]}}],
  \"dialogue\": string or null,
  \"key_actions\": [string or {{\"text\": string, \"start_seconds\": number, \"end_seconds\": number}}],
  \"duration_seconds\": number or null,
  \"language\": string or null,
  \"characterless\": boolean
}}
Set \"characterless\" to true only for a deliberate scene with no one in it."
    )
}

pub(crate) fn composer_system() -> String {
    format!(
        "{STYLE_BRIEF}

Your job: write the production notes for one resolved scene. Describe the setting, \
mood, camera handling, audible sounds in order of prominence, the landscape \
(terrain, vegetation, weather, light) and the props in frame. Describe characters \
only with the appearance given; do not add to it. Camera style always includes \
POV on a selfie stick and stays handheld and personal.

Reply with ONLY a JSON object of this shape:
{{
  \"main_character_description\": string,
  \"scene_setting_description\": string,
  \"atmosphere_and_mood\": string,
  \"camera_style\": string,
  \"sounds\": [string],
  \"landscape_notes\": string,
  \"props\": [string]
}}"
    )
}

pub(crate) fn judge_system() -> String {
    format!(
        "{STYLE_BRIEF}

Your job: decide whether the video prompt below would produce footage that looks \
like a genuine vlog. Reject anything with exaggerated or cartoon facial reactions, \
a drawn or toy-like look, physically impossible actions, stage-like delivery, or \
elements that look CGI, staged or artificial. Fantastical creatures by themselves \
are fine.

Reply with ONLY a JSON object of this shape:
{{
  \"verdict\": \"accept\" or \"reject\",
  \"reasons\": [{{\"concern\": one of \"exaggerated_expression\", \"cartoonish_quality\", \
\"implausible_action\", \"theatrical_delivery\", \"artificial_element\", \
\"detail\": the offending phrase}}]
}}
\"reasons\" must be empty when accepting and non-empty when rejecting."
    )
}

fn describe_character(out: &mut String, character: &Character) {
    let _ = write!(
        out,
        "- {} ({}): {}",
        character.name(),
        character.character_type(),
        character.physical_description()
    );
    if !character.personality_traits().is_empty() {
        let _ = write!(out, "; personality: {}", character.personality_traits().join(", "));
    }
    if !character.consistency_notes().is_empty() {
        let _ = write!(out, "; also: {}", character.consistency_notes().join("; "));
    }
    out.push('\n');
}

pub(crate) fn elaboration_body(request: &ElaborationRequest) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "Scene idea:\n{}\n", request.raw_text().trim());

    if !request.known_characters().is_empty() {
        body.push_str("Known characters (appearance is fixed):\n");
        for character in request.known_characters() {
            describe_character(&mut body, character);
        }
        body.push('\n');
    }

    if let Some(previous) = request.previous_scene() {
        let _ = writeln!(body, "Previous scene, for continuity:\n{}\n", previous.trim());
    }

    if !request.answers().is_empty() {
        body.push_str("Answers the user has given so far:\n");
        for answer in request.answers() {
            let _ = writeln!(body, "Q: {}\nA: {}", answer.question(), answer.answer());
        }
        body.push('\n');
    }

    if let (Some(prior), Some(revision)) = (request.prior(), request.revision()) {
        let fields: Vec<String> = revision.fields().iter().map(ToString::to_string).collect();
        let _ = writeln!(
            body,
            "This scene was rejected as unrealistic. Rewrite ONLY these fields: {}. \
             Copy every other field unchanged.",
            fields.join(", ")
        );
        body.push_str("Rejection reasons:\n");
        for reason in revision.reasons() {
            let _ = writeln!(body, "- {}", reason);
        }
        let current = serde_json::to_string_pretty(&prior.to_draft()).unwrap_or_default();
        let _ = writeln!(body, "Current scene:\n{}\n", current);
    }

    let _ = write!(
        body,
        "Default dialogue language: {}. Maximum duration: {} seconds.",
        request.language(),
        request.duration_cap()
    );
    body
}

pub(crate) fn staging_body(scene: &ResolvedScene) -> String {
    let mut body = String::new();
    let input = scene.input();
    let _ = writeln!(body, "Scene: {}", input.description());
    if scene.cast().is_empty() {
        body.push_str("No characters; the landscape is the subject.\n");
    } else {
        body.push_str("Cast:\n");
        for character in scene.cast() {
            describe_character(&mut body, character);
        }
    }
    body.push_str("Actions in order:\n");
    for action in input.key_actions() {
        let _ = writeln!(body, "- {}", action.text());
    }
    if let Some(dialogue) = input.dialogue() {
        let _ = writeln!(body, "Dialogue ({}): {}", input.language(), dialogue);
    }
    if let Some(duration) = input.duration_seconds() {
        let _ = writeln!(body, "Duration: {} seconds", duration);
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use veoprompt_core::{RealismConcern, RejectReason, RevisionDirective, SceneDraft};

    #[test]
    fn revision_body_names_only_the_directed_fields() {
        let prior = SceneDraft {
            description: Some("Bigfoot cooks breakfast".to_string()),
            characters: vec![veoprompt_core::CharacterSketch::named("Bigfoot")],
            key_actions: vec![veoprompt_core::DraftAction::Text("flips a pancake".to_string())],
            ..SceneDraft::default()
        }
        .finalize(8, "turkish")
        .unwrap();

        let request = ElaborationRequest::builder()
            .raw_text("Bigfoot cooks breakfast")
            .prior(Some(prior))
            .revision(Some(RevisionDirective::from_reasons(vec![RejectReason::new(
                RealismConcern::ImplausibleAction,
                "pancake flies into orbit",
            )])))
            .language("turkish")
            .duration_cap(8u32)
            .build()
            .unwrap();

        let body = elaboration_body(&request);
        assert!(body.contains("Rewrite ONLY these fields: key_actions."));
        assert!(body.contains("pancake flies into orbit"));
    }
}
