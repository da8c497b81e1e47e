//! Scene drafts, validated scene input and resolved scenes.

use crate::{Character, CharacterRegistry, CharacterSketch};
use serde::{Deserialize, Serialize};
use veoprompt_error::{BuilderError, BuilderErrorKind};

/// A time span inside a scene, in tenths of a second.
///
/// # Examples
///
/// ```
/// use veoprompt_core::TimeWindow;
///
/// let window = TimeWindow::from_seconds(0.0, 2.5).unwrap();
/// assert_eq!(*window.start_tenths(), 0);
/// assert_eq!(*window.end_tenths(), 25);
/// assert!(TimeWindow::from_seconds(3.0, 1.0).is_none());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    derive_getters::Getters,
)]
pub struct TimeWindow {
    start_tenths: u32,
    end_tenths: u32,
}

impl TimeWindow {
    /// Window from tenth-second bounds; `None` unless `start < end`.
    pub fn new(start_tenths: u32, end_tenths: u32) -> Option<Self> {
        (start_tenths < end_tenths).then_some(Self {
            start_tenths,
            end_tenths,
        })
    }

    /// Window from second bounds rounded to the nearest tenth.
    pub fn from_seconds(start: f32, end: f32) -> Option<Self> {
        if !start.is_finite() || !end.is_finite() || start < 0.0 {
            return None;
        }
        let start = (start * 10.0).round() as u32;
        let end = (end * 10.0).round() as u32;
        Self::new(start, end)
    }
}

/// One thing that happens in a scene.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters)]
pub struct KeyAction {
    /// Concrete description of the action
    text: String,
    /// Explicit timing, if the user or model gave one
    window: Option<TimeWindow>,
}

impl KeyAction {
    /// Untimed action.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            window: None,
        }
    }

    /// Action pinned to a time window.
    pub fn timed(text: impl Into<String>, window: TimeWindow) -> Self {
        Self {
            text: text.into(),
            window: Some(window),
        }
    }
}

/// A key action as the elaborator writes it: a bare string or an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DraftAction {
    /// Bare action text
    Text(String),
    /// Action with optional timing
    Detailed {
        /// Action text
        text: String,
        /// Start, in seconds from scene start
        #[serde(default)]
        start_seconds: Option<f32>,
        /// End, in seconds from scene start
        #[serde(default)]
        end_seconds: Option<f32>,
    },
}

impl DraftAction {
    fn text(&self) -> &str {
        match self {
            DraftAction::Text(text) | DraftAction::Detailed { text, .. } => text.trim(),
        }
    }
}

/// Elaborator output before validation. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDraft {
    /// What the scene shows
    #[serde(default)]
    pub description: Option<String>,
    /// Characters appearing, in order of appearance
    #[serde(default)]
    pub characters: Vec<CharacterSketch>,
    /// Spoken line, only if the user asked for one
    #[serde(default)]
    pub dialogue: Option<String>,
    /// Concrete actions in order
    #[serde(default)]
    pub key_actions: Vec<DraftAction>,
    /// Requested clip length
    #[serde(default)]
    pub duration_seconds: Option<f32>,
    /// Language tag for spoken dialogue
    #[serde(default)]
    pub language: Option<String>,
    /// True when the scene intentionally has no characters
    #[serde(default)]
    pub characterless: bool,
}

/// A field the user still has to supply.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    derive_more::Display,
)]
pub enum SceneSlot {
    /// What happens in the scene overall
    #[display("scene description")]
    Description,
    /// Who is in the scene
    #[display("characters")]
    Characters,
    /// What the characters do
    #[display("key actions")]
    KeyActions,
    /// What a character seen for the first time looks like
    #[display("appearance of {}", _0)]
    Appearance(String),
}

impl SceneSlot {
    /// Question to put to the user for this slot.
    pub fn question(&self) -> String {
        match self {
            SceneSlot::Description => "What happens in this scene, and where?".to_string(),
            SceneSlot::Characters => {
                "Who appears in this scene? (Say \"no one\" for an empty landscape shot.)"
                    .to_string()
            }
            SceneSlot::KeyActions => {
                "What do the characters physically do during the clip?".to_string()
            }
            SceneSlot::Appearance(name) => format!(
                "{} is new to this story. What do they look like (size, build, colours)?",
                name
            ),
        }
    }
}

impl SceneDraft {
    /// Slots that must be filled before the draft can become a [`SceneInput`].
    ///
    /// New characters need an appearance because the registry stores one
    /// canonical description per character.
    pub fn missing_slots(&self, registry: &CharacterRegistry) -> Vec<SceneSlot> {
        let mut missing = Vec::new();
        if self
            .description
            .as_deref()
            .is_none_or(|d| d.trim().is_empty())
        {
            missing.push(SceneSlot::Description);
        }
        let named: Vec<&CharacterSketch> = self
            .characters
            .iter()
            .filter(|c| !c.name.trim().is_empty())
            .collect();
        if named.is_empty() && !self.characterless {
            missing.push(SceneSlot::Characters);
        }
        if self.key_actions.iter().all(|a| a.text().is_empty()) {
            missing.push(SceneSlot::KeyActions);
        }
        for sketch in named {
            if !registry.contains(&sketch.name) && sketch.description().is_none() {
                missing.push(SceneSlot::Appearance(sketch.name.trim().to_string()));
            }
        }
        missing
    }

    /// Validates the draft into a [`SceneInput`].
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError`] naming the first field that violates the
    /// scene schema: blank description, blank action text, malformed timing,
    /// or a duration outside `1..=duration_cap`.
    pub fn finalize(
        self,
        duration_cap: u32,
        default_language: &str,
    ) -> Result<SceneInput, BuilderError> {
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .ok_or_else(|| invalid("description", "must not be blank"))?;

        let duration_seconds = match self.duration_seconds {
            None => None,
            Some(d) if d.is_finite() && d >= 0.5 && d <= duration_cap as f32 + 0.05 => {
                Some((d.round() as u32).clamp(1, duration_cap))
            }
            Some(d) => {
                return Err(invalid(
                    "duration_seconds",
                    &format!("{} is outside 1..={}", d, duration_cap),
                ));
            }
        };

        let mut key_actions = Vec::with_capacity(self.key_actions.len());
        for action in self.key_actions {
            let text = action.text().to_string();
            if text.is_empty() {
                return Err(invalid("key_actions", "action text must not be blank"));
            }
            let window = match action {
                DraftAction::Detailed {
                    start_seconds: Some(start),
                    end_seconds: Some(end),
                    ..
                } => Some(TimeWindow::from_seconds(start, end).ok_or_else(|| {
                    invalid(
                        "key_actions",
                        &format!("malformed time window {}s-{}s for '{}'", start, end, text),
                    )
                })?),
                DraftAction::Detailed {
                    start_seconds: None,
                    end_seconds: None,
                    ..
                }
                | DraftAction::Text(_) => None,
                DraftAction::Detailed { .. } => {
                    return Err(invalid(
                        "key_actions",
                        &format!("time window for '{}' needs both start and end", text),
                    ));
                }
            };
            if let (Some(window), Some(d)) = (window, duration_seconds)
                && *window.end_tenths() > d * 10
            {
                return Err(invalid(
                    "key_actions",
                    &format!("'{}' ends after the {}s clip", text, d),
                ));
            }
            key_actions.push(KeyAction { text, window });
        }

        let mut characters_in_scene: Vec<String> = Vec::new();
        let mut character_sketches: Vec<CharacterSketch> = Vec::new();
        for mut sketch in self.characters {
            let name = sketch.name.split_whitespace().collect::<Vec<_>>().join(" ");
            if name.is_empty() {
                continue;
            }
            let key = CharacterRegistry::key_for(&name);
            if characters_in_scene
                .iter()
                .any(|n| CharacterRegistry::key_for(n) == key)
            {
                continue;
            }
            sketch.name = name.clone();
            characters_in_scene.push(name);
            character_sketches.push(sketch);
        }

        if characters_in_scene.is_empty() && !self.characterless {
            return Err(invalid("characters", "at least one character is required"));
        }
        if key_actions.is_empty() {
            return Err(invalid("key_actions", "at least one action is required"));
        }

        let language = self
            .language
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| default_language.to_string());

        Ok(SceneInput {
            description,
            characters_in_scene,
            character_sketches,
            dialogue: self
                .dialogue
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            key_actions,
            duration_seconds,
            language,
            characterless: self.characterless,
        })
    }
}

#[track_caller]
fn invalid(field: &str, reason: &str) -> BuilderError {
    BuilderError::new(BuilderErrorKind::InvalidField {
        field: field.to_string(),
        reason: reason.to_string(),
    })
}

/// A complete, validated scene request.
///
/// Only [`SceneDraft::finalize`] and revision produce one, so every instance
/// satisfies the scene schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct SceneInput {
    /// What the scene shows
    description: String,
    /// Character names in order of appearance, deduplicated
    characters_in_scene: Vec<String>,
    /// Scene-local descriptions, parallel to `characters_in_scene`
    character_sketches: Vec<CharacterSketch>,
    /// Spoken line, if requested
    dialogue: Option<String>,
    /// Concrete actions in order
    key_actions: Vec<KeyAction>,
    /// Clip length in whole seconds
    duration_seconds: Option<u32>,
    /// Language tag for dialogue
    language: String,
    /// Scene intentionally has no characters
    characterless: bool,
}

impl SceneInput {
    /// Draft carrying the same content, for sending back to the elaborator.
    pub fn to_draft(&self) -> SceneDraft {
        SceneDraft {
            description: Some(self.description.clone()),
            characters: self.character_sketches.clone(),
            dialogue: self.dialogue.clone(),
            key_actions: self
                .key_actions
                .iter()
                .map(|a| match a.window() {
                    Some(w) => DraftAction::Detailed {
                        text: a.text().clone(),
                        start_seconds: Some(*w.start_tenths() as f32 / 10.0),
                        end_seconds: Some(*w.end_tenths() as f32 / 10.0),
                    },
                    None => DraftAction::Text(a.text().clone()),
                })
                .collect(),
            duration_seconds: self.duration_seconds.map(|d| d as f32),
            language: Some(self.language.clone()),
            characterless: self.characterless,
        }
    }

    /// Sketch for a character in this scene.
    pub fn sketch(&self, name: &str) -> Option<&CharacterSketch> {
        let key = CharacterRegistry::key_for(name);
        self.character_sketches
            .iter()
            .find(|s| CharacterRegistry::key_for(&s.name) == key)
    }
}

/// What to ask the user before elaboration can continue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ClarificationRequest {
    /// Slots still empty
    missing: Vec<SceneSlot>,
    /// Question shown to the user
    question: String,
    /// 1-based clarification round
    round: u32,
}

impl ClarificationRequest {
    /// Request for the given slots. Uses `suggested` as the question when the
    /// elaborator supplied one, otherwise joins the per-slot questions.
    pub fn new(missing: Vec<SceneSlot>, suggested: Option<String>, round: u32) -> Self {
        let question = suggested
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .unwrap_or_else(|| {
                missing
                    .iter()
                    .map(SceneSlot::question)
                    .collect::<Vec<_>>()
                    .join(" ")
            });
        Self {
            missing,
            question,
            round,
        }
    }
}

/// Production prose for a scene: setting, mood, camera, sound and props.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into), default)]
pub struct SceneStaging {
    /// Who the camera follows, in one or two sentences
    #[serde(default)]
    main_character_description: String,
    /// Where the scene happens
    #[serde(default)]
    scene_setting_description: String,
    /// Emotional tone
    #[serde(default)]
    atmosphere_and_mood: String,
    /// Camera handling
    #[serde(default)]
    camera_style: String,
    /// Audible elements in order of prominence
    #[serde(default)]
    sounds: Vec<String>,
    /// Terrain, vegetation, weather, light
    #[serde(default)]
    landscape_notes: String,
    /// Objects in frame
    #[serde(default)]
    props: Vec<String>,
}

impl SceneStaging {
    /// Start building staging prose.
    pub fn builder() -> SceneStagingBuilder {
        SceneStagingBuilder::default()
    }

    /// Names of mandatory text fields that are blank.
    pub fn blank_fields(&self) -> Vec<&'static str> {
        [
            ("scene_setting_description", &self.scene_setting_description),
            ("atmosphere_and_mood", &self.atmosphere_and_mood),
            ("camera_style", &self.camera_style),
            ("landscape_notes", &self.landscape_notes),
        ]
        .into_iter()
        .filter(|(_, text)| text.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// A scene with every character resolved against the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ResolvedScene {
    /// The validated request
    input: SceneInput,
    /// Registry snapshot of each character, in scene order
    cast: Vec<Character>,
    /// Production prose, empty until the staging step runs
    staging: SceneStaging,
}

impl ResolvedScene {
    /// Resolved scene without staging.
    pub fn new(input: SceneInput, cast: Vec<Character>) -> Self {
        Self {
            input,
            cast,
            staging: SceneStaging::default(),
        }
    }

    /// Same scene with staging prose attached.
    pub fn with_staging(mut self, staging: SceneStaging) -> Self {
        self.staging = staging;
        self
    }
}
