//! Resolving scene characters against the session registry.

use crate::descriptor::Appearance;
use tracing::{debug, info, instrument};
use veoprompt_core::{
    Character, CharacterRegistry, CharacterSketch, CharacterType, ResolvedScene, SceneInput,
};
use veoprompt_error::{ConsistencyError, ConsistencyErrorKind, VeoResult};

/// Resolves every character in `input` against `registry`.
///
/// Works on a copy of the registry and returns it alongside the resolved
/// scene; the caller decides whether to keep it. For each character:
///
/// - unknown name with a description: registered, archetype inferred from
///   the description (unless `strict`, which rejects unknown names)
/// - known name whose scene description contradicts the registered one:
///   `ConsistencyConflict`, registry untouched
/// - known name with new, compatible detail: detail appended to its
///   consistency notes
///
/// # Errors
///
/// Returns `ConsistencyConflict`, `UnknownCharacterReference` (strict mode)
/// or `MissingDescription` for a new character with no appearance.
#[instrument(skip_all, fields(characters = input.characters_in_scene().len(), strict = strict))]
pub fn reconcile(
    input: SceneInput,
    registry: &CharacterRegistry,
    strict: bool,
) -> VeoResult<(ResolvedScene, CharacterRegistry)> {
    let mut updated = registry.clone();
    let mut cast = Vec::with_capacity(input.characters_in_scene().len());

    for name in input.characters_in_scene() {
        let sketch = input
            .sketch(name)
            .cloned()
            .unwrap_or_else(|| CharacterSketch::named(name.clone()));

        let character = match updated.get(name).cloned() {
            Some(known) => {
                let refined = refine(known, &sketch)?;
                updated.refine(refined.clone());
                refined
            }
            None if strict => {
                return Err(ConsistencyError::new(
                    ConsistencyErrorKind::UnknownCharacterReference(name.clone()),
                )
                .into());
            }
            None => {
                let created = create(name, &sketch)?;
                info!(character = %name, kind = %created.character_type(), "New character registered");
                updated.register(created.clone());
                created
            }
        };
        cast.push(character);
    }

    Ok((ResolvedScene::new(input, cast), updated))
}

fn create(name: &str, sketch: &CharacterSketch) -> Result<Character, ConsistencyError> {
    let description = sketch.description().ok_or_else(|| {
        ConsistencyError::new(ConsistencyErrorKind::MissingDescription(name.to_string()))
    })?;
    Character::builder()
        .name(name)
        .character_type(CharacterType::infer(description))
        .physical_description(description)
        .personality_traits(sketch.personality_traits.clone())
        .build()
        .map_err(|_| {
            ConsistencyError::new(ConsistencyErrorKind::MissingDescription(name.to_string()))
        })
}

fn refine(known: Character, sketch: &CharacterSketch) -> Result<Character, ConsistencyError> {
    let mut refined = known;

    if let Some(description) = sketch.description() {
        let registered = Appearance::parse(refined.physical_description());
        let proposed = Appearance::parse(description);
        if let Some(contradiction) = registered.contradiction(&proposed) {
            return Err(ConsistencyError::new(
                ConsistencyErrorKind::ConsistencyConflict {
                    character: refined.name().clone(),
                    attribute: contradiction.attribute.to_string(),
                    registered: contradiction.registered,
                    proposed: contradiction.proposed,
                },
            ));
        }

        let mut known_text: Vec<&str> = vec![refined.physical_description().as_str()];
        known_text.extend(refined.consistency_notes().iter().map(String::as_str));
        let details: Vec<String> = proposed
            .new_phrases(&known_text)
            .into_iter()
            .map(str::to_string)
            .collect();
        for detail in details {
            debug!(character = %refined.name(), %detail, "Consistency note added");
            refined = refined.note(detail);
        }
    }

    let traits: Vec<String> = sketch
        .personality_traits
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .filter(|t| {
            !refined
                .personality_traits()
                .iter()
                .any(|known| known.eq_ignore_ascii_case(t))
        })
        .map(|t| format!("personality: {}", t))
        .collect();
    for detail in traits {
        refined = refined.note(detail);
    }

    Ok(refined)
}
