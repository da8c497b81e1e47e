//! Characters and their archetypes.

use serde::{Deserialize, Serialize};
use veoprompt_error::{BuilderError, BuilderErrorKind};

/// Known character archetypes plus the open `Custom` variant.
///
/// # Examples
///
/// ```
/// use veoprompt_core::CharacterType;
///
/// assert_eq!(CharacterType::infer("a hulking sasquatch with matted fur"), CharacterType::Bigfoot);
/// assert_eq!(CharacterType::infer("a tall figure in a rain jacket"), CharacterType::Custom);
/// assert_eq!(CharacterType::Balloonfish.to_string(), "balloonfish");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum CharacterType {
    /// Large hairy forest cryptid
    #[display("bigfoot")]
    Bigfoot,
    /// Snow-dwelling cryptid
    #[display("yeti")]
    Yeti,
    /// Inflating fish
    #[display("balloonfish")]
    Balloonfish,
    /// Anything else
    #[default]
    #[display("custom")]
    Custom,
}

impl CharacterType {
    /// Words in a description that identify this archetype.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            CharacterType::Bigfoot => &["bigfoot", "sasquatch"],
            CharacterType::Yeti => &["yeti", "abominable"],
            CharacterType::Balloonfish => &["balloonfish", "pufferfish", "blowfish", "puffer"],
            CharacterType::Custom => &[],
        }
    }

    /// Infers the archetype from descriptive text by whole-word keyword match.
    ///
    /// The first archetype with a matching keyword wins; no match is `Custom`.
    pub fn infer(text: &str) -> Self {
        use strum::IntoEnumIterator;

        let words: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();

        CharacterType::iter()
            .find(|kind| {
                kind.keywords()
                    .iter()
                    .any(|keyword| words.iter().any(|w| w == keyword))
            })
            .unwrap_or_default()
    }
}

/// A character as the registry knows it.
///
/// `name` is the identity key; lookups compare it case-insensitively.
///
/// # Examples
///
/// ```
/// use veoprompt_core::{Character, CharacterType};
///
/// let bigfoot = Character::builder()
///     .name("Bigfoot")
///     .physical_description("tall, brown fur, broad shoulders")
///     .personality_traits(vec!["grumpy".to_string()])
///     .build()
///     .unwrap();
///
/// assert_eq!(bigfoot.name(), "Bigfoot");
/// assert_eq!(*bigfoot.character_type(), CharacterType::Custom);
/// assert!(bigfoot.consistency_notes().is_empty());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
pub struct Character {
    /// Display name, first-seen spelling
    name: String,
    /// Archetype
    #[builder(default)]
    character_type: CharacterType,
    /// Canonical appearance text used for every scene
    physical_description: String,
    /// Ordered personality tags
    #[builder(default)]
    personality_traits: Vec<String>,
    /// Non-conflicting details picked up from later scenes
    #[builder(default)]
    consistency_notes: Vec<String>,
}

impl Character {
    /// Start building a character.
    pub fn builder() -> CharacterBuilder {
        CharacterBuilder::default()
    }

    /// Records a detail learned in a later scene unless it is already known.
    pub fn note(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let known = self
            .consistency_notes
            .iter()
            .any(|n| n.eq_ignore_ascii_case(&detail));
        if !known {
            self.consistency_notes.push(detail);
        }
        self
    }
}

impl CharacterBuilder {
    /// Build the character, rejecting blank names and descriptions.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError`] if a required field is missing or blank.
    pub fn build(&self) -> Result<Character, BuilderError> {
        let character = self
            .build_internal()
            .map_err(|e| BuilderError::new(BuilderErrorKind::MissingField(e.to_string())))?;
        if character.name.trim().is_empty() {
            return Err(BuilderError::new(BuilderErrorKind::InvalidField {
                field: "name".to_string(),
                reason: "must not be blank".to_string(),
            }));
        }
        if character.physical_description.trim().is_empty() {
            return Err(BuilderError::new(BuilderErrorKind::InvalidField {
                field: "physical_description".to_string(),
                reason: "must not be blank".to_string(),
            }));
        }
        Ok(character)
    }
}

/// Scene-local description of a character, as produced by elaboration.
///
/// Sketches never enter the registry directly; reconciliation decides what,
/// if anything, they contribute.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharacterSketch {
    /// Name as written in the scene
    pub name: String,
    /// Appearance as described in this scene
    #[serde(default)]
    pub physical_description: Option<String>,
    /// Personality tags mentioned in this scene
    #[serde(default)]
    pub personality_traits: Vec<String>,
}

impl CharacterSketch {
    /// Sketch with just a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Appearance text if present and not blank.
    pub fn description(&self) -> Option<&str> {
        self.physical_description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}
