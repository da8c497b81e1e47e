use veoprompt_core::{
    Character, CharacterRegistry, CharacterSketch, DraftAction, SceneDraft, SceneSlot,
};

fn sketch(name: &str, description: Option<&str>) -> CharacterSketch {
    CharacterSketch {
        name: name.to_string(),
        physical_description: description.map(str::to_string),
        personality_traits: Vec::new(),
    }
}

fn complete_draft() -> SceneDraft {
    SceneDraft {
        description: Some("Bigfoot slumps against a pine while someone beatboxes off-camera".into()),
        characters: vec![sketch("Bigfoot", Some("towering, shaggy brown fur"))],
        dialogue: None,
        key_actions: vec![
            DraftAction::Text("lets his shoulders drop and exhales slowly".into()),
            DraftAction::Text("rubs his temples with both hands".into()),
        ],
        duration_seconds: Some(8.0),
        language: None,
        characterless: false,
    }
}

#[test]
fn empty_draft_is_missing_every_core_slot() {
    let missing = SceneDraft::default().missing_slots(&CharacterRegistry::default());
    assert_eq!(
        missing,
        vec![SceneSlot::Description, SceneSlot::Characters, SceneSlot::KeyActions]
    );
}

#[test]
fn characterless_scene_needs_no_characters() {
    let draft = SceneDraft {
        characters: Vec::new(),
        characterless: true,
        ..complete_draft()
    };
    assert!(draft.missing_slots(&CharacterRegistry::default()).is_empty());
    let input = draft.finalize(8, "turkish").unwrap();
    assert!(input.characters_in_scene().is_empty());
}

#[test]
fn new_character_without_appearance_needs_clarification() {
    let draft = SceneDraft {
        characters: vec![sketch("Bigfoot", None)],
        ..complete_draft()
    };
    assert_eq!(
        draft.missing_slots(&CharacterRegistry::default()),
        vec![SceneSlot::Appearance("Bigfoot".to_string())]
    );

    let mut registry = CharacterRegistry::default();
    registry.register(
        Character::builder()
            .name("Bigfoot")
            .physical_description("tall, brown fur")
            .build()
            .unwrap(),
    );
    assert!(draft.missing_slots(&registry).is_empty());
}

#[test]
fn finalize_applies_default_language() {
    let input = complete_draft().finalize(8, "turkish").unwrap();
    assert_eq!(input.language(), "turkish");
    assert_eq!(*input.duration_seconds(), Some(8));
    assert_eq!(input.characters_in_scene(), &vec!["Bigfoot".to_string()]);
}

#[test]
fn finalize_rejects_duration_above_cap() {
    let draft = SceneDraft {
        duration_seconds: Some(12.0),
        ..complete_draft()
    };
    let err = draft.finalize(8, "turkish").unwrap_err();
    assert!(err.to_string().contains("duration_seconds"));
}

#[test]
fn finalize_rejects_half_specified_windows() {
    let draft = SceneDraft {
        key_actions: vec![DraftAction::Detailed {
            text: "sits down".into(),
            start_seconds: Some(1.0),
            end_seconds: None,
        }],
        ..complete_draft()
    };
    assert!(draft.finalize(8, "turkish").is_err());
}

#[test]
fn finalize_rejects_windows_past_the_clip() {
    let draft = SceneDraft {
        key_actions: vec![DraftAction::Detailed {
            text: "walks off".into(),
            start_seconds: Some(6.0),
            end_seconds: Some(9.5),
        }],
        ..complete_draft()
    };
    assert!(draft.finalize(8, "turkish").is_err());
}

#[test]
fn finalize_merges_repeated_names() {
    let draft = SceneDraft {
        characters: vec![
            sketch("Bigfoot", Some("tall")),
            sketch("  bigfoot ", Some("brown fur")),
            sketch("Yeti", Some("white fur")),
        ],
        ..complete_draft()
    };
    let input = draft.finalize(8, "turkish").unwrap();
    assert_eq!(
        input.characters_in_scene(),
        &vec!["Bigfoot".to_string(), "Yeti".to_string()]
    );
}

#[test]
fn draft_round_trips_through_scene_input() {
    let input = complete_draft().finalize(8, "turkish").unwrap();
    let again = input.to_draft().finalize(8, "english").unwrap();
    assert_eq!(input, again);
}

#[test]
fn draft_parses_mixed_action_shapes() {
    let json = r#"{
        "description": "Yeti fishes through a hole in the ice",
        "characters": [{"name": "Yeti", "physical_description": "white fur"}],
        "key_actions": [
            "lowers the line",
            {"text": "jerks the rod up", "start_seconds": 4, "end_seconds": 6.5}
        ],
        "duration_seconds": 8
    }"#;
    let draft: SceneDraft = serde_json::from_str(json).unwrap();
    let input = draft.finalize(8, "turkish").unwrap();
    let windows: Vec<_> = input.key_actions().iter().map(|a| *a.window()).collect();
    assert!(windows[0].is_none());
    assert_eq!(windows[1].map(|w| *w.end_tenths()), Some(65));
}
