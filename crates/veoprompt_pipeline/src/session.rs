//! Conversation state: the character registry and the accepted scenes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;
use veoprompt_core::{Character, CharacterRegistry, CharacterType, SceneRecord};
use veoprompt_error::{BuilderError, BuilderErrorKind, SessionError, SessionErrorKind};

/// An explicit change to a registered character.
///
/// Unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_builder::Builder)]
#[builder(
    setter(into, strip_option),
    default,
    build_fn(private, name = "build_internal")
)]
pub struct CharacterEdit {
    /// New canonical appearance
    physical_description: Option<String>,
    /// Replacement personality traits
    personality_traits: Option<Vec<String>>,
    /// New archetype
    character_type: Option<CharacterType>,
}

impl CharacterEdit {
    /// Start building an edit.
    pub fn builder() -> CharacterEditBuilder {
        CharacterEditBuilder::default()
    }

    /// Edit that only replaces the appearance.
    pub fn appearance(description: impl Into<String>) -> Self {
        Self {
            physical_description: Some(description.into()),
            ..Self::default()
        }
    }
}

impl CharacterEditBuilder {
    /// Build the edit.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError`] if the builder is in an invalid state.
    pub fn build(&self) -> Result<CharacterEdit, BuilderError> {
        self.build_internal()
            .map_err(|e| BuilderError::new(BuilderErrorKind::MissingField(e.to_string())))
    }
}

/// One conversation.
///
/// Owns the [`CharacterRegistry`] and every accepted [`SceneRecord`]. Scene
/// processing reads from the session and only writes to it through
/// `commit`, once a scene is accepted.
#[derive(Debug, Clone, Serialize, Deserialize, derive_getters::Getters)]
pub struct Session {
    /// Session identifier
    id: Uuid,
    /// Characters established so far
    registry: CharacterRegistry,
    /// Accepted scenes, corrections included, in the order they were made
    history: Vec<SceneRecord>,
    /// When the conversation began
    started_at: DateTime<Utc>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Empty session with a fresh id.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            registry: CharacterRegistry::default(),
            history: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Newest version of scene `sequence`.
    pub fn latest(&self, sequence: u32) -> Option<&SceneRecord> {
        self.history
            .iter()
            .filter(|r| *r.sequence() == sequence)
            .max_by_key(|r| *r.version())
    }

    /// Newest version of every scene, in scene order.
    pub fn scenes(&self) -> Vec<&SceneRecord> {
        (1..self.next_sequence())
            .filter_map(|sequence| self.latest(sequence))
            .collect()
    }

    /// Rendered text of the most recent scene, if any.
    pub fn previous_rendered(&self) -> Option<&str> {
        self.next_sequence()
            .checked_sub(1)
            .and_then(|sequence| self.latest(sequence))
            .map(|r| r.rendered().as_str())
    }

    /// Sequence number the next new scene will get.
    pub fn next_sequence(&self) -> u32 {
        self.history
            .iter()
            .map(|r| *r.sequence())
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Applies an explicit character edit. The previous version is kept in
    /// the character's history.
    ///
    /// # Errors
    ///
    /// `UnknownCharacter` if the name is not registered, `EmptyEdit` if the
    /// edit changes nothing.
    #[instrument(skip(self, edit), fields(session = %self.id))]
    pub fn edit_character(
        &mut self,
        name: &str,
        edit: CharacterEdit,
    ) -> Result<&Character, SessionError> {
        let current = self.registry.get(name).cloned().ok_or_else(|| {
            SessionError::new(SessionErrorKind::UnknownCharacter(name.to_string()))
        })?;

        let mut edited = current.clone();
        if let Some(description) = edit
            .physical_description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
        {
            edited = edited.with_physical_description(description);
        }
        if let Some(traits) = edit.personality_traits {
            edited = edited.with_personality_traits(traits);
        }
        if let Some(kind) = edit.character_type {
            edited = edited.with_character_type(kind);
        }
        if edited == current {
            return Err(SessionError::new(SessionErrorKind::EmptyEdit(
                current.name().clone(),
            )));
        }

        self.registry.register(edited);
        info!(character = %current.name(), "Character edited");
        self.registry
            .get(name)
            .ok_or_else(|| SessionError::new(SessionErrorKind::UnknownCharacter(name.to_string())))
    }

    /// Appends an accepted scene and adopts the registry it was resolved
    /// against.
    pub(crate) fn commit(&mut self, registry: CharacterRegistry, record: SceneRecord) {
        info!(
            session = %self.id,
            sequence = record.sequence(),
            version = record.version(),
            characters = registry.len(),
            "Scene committed"
        );
        self.registry = registry;
        self.history.push(record);
    }
}
