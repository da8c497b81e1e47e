//! Per-session character registry.

use crate::Character;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A registered character and every version it replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct RegistryEntry {
    /// Version used for new scenes
    current: Character,
    /// Earlier versions, oldest first
    superseded: Vec<Character>,
}

/// Canonical character descriptions for one session.
///
/// Names are matched case-insensitively with surrounding and repeated
/// whitespace ignored. Characters are never removed; replacing one keeps the
/// old version in its entry's history.
///
/// The registry is a plain value. Stages work on a clone and the session
/// swaps the clone in once a scene is accepted.
///
/// # Examples
///
/// ```
/// use veoprompt_core::{Character, CharacterRegistry};
///
/// let mut registry = CharacterRegistry::default();
/// registry.register(
///     Character::builder()
///         .name("Bigfoot")
///         .physical_description("tall, brown fur")
///         .build()
///         .unwrap(),
/// );
///
/// assert!(registry.contains("  bigfoot "));
/// assert_eq!(registry.get("BIGFOOT").unwrap().name(), "Bigfoot");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl CharacterRegistry {
    /// Normalized lookup key for a character name.
    pub fn key_for(name: &str) -> String {
        name.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// Current version of a character.
    pub fn get(&self, name: &str) -> Option<&Character> {
        self.entries.get(&Self::key_for(name)).map(|e| &e.current)
    }

    /// Full entry including superseded versions.
    pub fn entry(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(&Self::key_for(name))
    }

    /// Whether a character with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&Self::key_for(name))
    }

    /// Registers a new character, or supersedes the existing one with the
    /// same name. Returns the replaced version, if any.
    ///
    /// The display name of an existing entry is kept.
    pub fn register(&mut self, character: Character) -> Option<Character> {
        let key = Self::key_for(character.name());
        match self.entries.get_mut(&key) {
            Some(entry) => {
                let display = entry.current.name().clone();
                let previous =
                    std::mem::replace(&mut entry.current, character.with_name(display));
                entry.superseded.push(previous.clone());
                tracing::debug!(character = %key, version = entry.superseded.len() + 1, "Superseded character");
                Some(previous)
            }
            None => {
                tracing::debug!(character = %key, "Registered character");
                self.entries.insert(
                    key,
                    RegistryEntry {
                        current: character,
                        superseded: Vec::new(),
                    },
                );
                None
            }
        }
    }

    /// Replaces the current version in place without recording history.
    ///
    /// Used for consistency notes, which refine rather than redefine a
    /// character. Returns false if the character is not registered.
    pub fn refine(&mut self, character: Character) -> bool {
        match self.entries.get_mut(&Self::key_for(character.name())) {
            Some(entry) => {
                let display = entry.current.name().clone();
                entry.current = character.with_name(display);
                true
            }
            None => false,
        }
    }

    /// Current versions in name order.
    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.entries.values().map(|e| &e.current)
    }

    /// Number of registered characters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no character has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
