//! The assembled prompt.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use veoprompt_error::{BuilderError, BuilderErrorKind};

/// One entry of a timing breakdown.
///
/// # Examples
///
/// ```
/// use veoprompt_core::TimingSegment;
///
/// let segment = TimingSegment::new(27, 53, "sits down on a stump");
/// assert_eq!(segment.label(), "2.7-5.3s");
/// assert_eq!(TimingSegment::new(0, 80, "whole clip").label(), "0-8s");
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters,
)]
pub struct TimingSegment {
    /// Inclusive start in tenths of a second
    start_tenths: u32,
    /// Exclusive end in tenths of a second
    end_tenths: u32,
    /// What happens in this span
    action: String,
}

impl TimingSegment {
    /// New segment.
    pub fn new(start_tenths: u32, end_tenths: u32, action: impl Into<String>) -> Self {
        Self {
            start_tenths,
            end_tenths,
            action: action.into(),
        }
    }

    /// Range label such as `0-2.7s`.
    pub fn label(&self) -> String {
        format!(
            "{}-{}s",
            format_tenths(self.start_tenths),
            format_tenths(self.end_tenths)
        )
    }
}

fn format_tenths(tenths: u32) -> String {
    if tenths % 10 == 0 {
        (tenths / 10).to_string()
    } else {
        format!("{}.{}", tenths / 10, tenths % 10)
    }
}

/// A finished text-to-video prompt, one per accepted scene.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
pub struct FinalPrompt {
    /// Who the camera follows
    main_character_description: String,
    /// Where the scene takes place
    scene_setting_description: String,
    /// Emotional tone
    atmosphere_and_mood: String,
    /// Actions in order, then dialogue if any was requested
    core_action_and_dialogue: String,
    /// Camera handling
    camera_style: String,
    /// Audible elements
    #[builder(default)]
    sounds: Vec<String>,
    /// Canonical appearance per character, keyed by display name
    #[builder(default)]
    character_appearance_notes: BTreeMap<String, String>,
    /// Terrain, vegetation, weather, light
    landscape_notes: String,
    /// Objects in frame
    #[builder(default)]
    props: Vec<String>,
    /// Partition of the clip, when a duration was given
    #[builder(default)]
    timing_breakdown: Option<Vec<TimingSegment>>,
    /// Clip length the breakdown covers
    #[builder(default)]
    duration_seconds: Option<u32>,
    /// Dialogue language tag
    language: String,
}

impl FinalPrompt {
    /// Start building a prompt.
    pub fn builder() -> FinalPromptBuilder {
        FinalPromptBuilder::default()
    }
}

impl FinalPromptBuilder {
    /// Build the prompt and check the timing partition.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError`] if a field is missing, or if the timing
    /// breakdown does not cover `[0, duration_seconds]` contiguously.
    pub fn build(&self) -> Result<FinalPrompt, BuilderError> {
        let prompt = self
            .build_internal()
            .map_err(|e| BuilderError::new(BuilderErrorKind::MissingField(e.to_string())))?;
        if let Some(segments) = &prompt.timing_breakdown {
            let duration = prompt.duration_seconds.ok_or_else(|| {
                BuilderError::new(BuilderErrorKind::InvalidField {
                    field: "timing_breakdown".to_string(),
                    reason: "requires duration_seconds".to_string(),
                })
            })?;
            if !is_partition(segments, duration * 10) {
                return Err(BuilderError::new(BuilderErrorKind::InvalidField {
                    field: "timing_breakdown".to_string(),
                    reason: format!("does not partition [0, {}s]", duration),
                }));
            }
        }
        Ok(prompt)
    }
}

/// Whether `segments` cover `[0, end_tenths]` in order with no gap or overlap.
///
/// # Examples
///
/// ```
/// use veoprompt_core::{is_partition, TimingSegment};
///
/// let segments = vec![TimingSegment::new(0, 40, "a"), TimingSegment::new(40, 80, "b")];
/// assert!(is_partition(&segments, 80));
/// assert!(!is_partition(&segments[..1], 80));
/// ```
pub fn is_partition(segments: &[TimingSegment], end_tenths: u32) -> bool {
    let mut cursor = 0;
    for segment in segments {
        if segment.start_tenths != cursor || segment.end_tenths <= segment.start_tenths {
            return false;
        }
        cursor = segment.end_tenths;
    }
    !segments.is_empty() && cursor == end_tenths
}
