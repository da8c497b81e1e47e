//! Template rendering with minijinja.

use crate::{REQUIRED_SECTIONS, parse_sections};
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, instrument};
use veoprompt_core::FinalPrompt;
use veoprompt_error::{TemplateError, TemplateErrorKind};

/// First line of every prompt.
pub const OPENING_STATEMENT: &str =
    "Create a realistic, entertaining YouTube vlog video in the style of the channel 'Outdoor Boys.'";

/// Style guard placed after the scene description.
pub const AUTHENTICITY_STATEMENT: &str = "The video should look like a genuine, spontaneous scene from a real vlog, not cinematic or overly polished. Just natural, handheld, and authentic.";

const BUNDLED_TEMPLATE: &str = include_str!("../templates/veoprompt.md.j2");

static ENV: OnceLock<Environment<'static>> = OnceLock::new();

fn environment() -> &'static Environment<'static> {
    ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env
    })
}

#[derive(Serialize)]
struct AppearanceView<'a> {
    name: &'a str,
    appearance: &'a str,
}

#[derive(Serialize)]
struct SegmentView<'a> {
    label: String,
    action: &'a str,
}

/// Everything the template can reference. Collections are always present,
/// possibly empty, so strict undefined checking never trips on them.
#[derive(Serialize)]
struct PromptView<'a> {
    opening: &'static str,
    authenticity: &'static str,
    main_character_description: &'a str,
    scene_setting_description: &'a str,
    atmosphere_and_mood: &'a str,
    core_action_and_dialogue: &'a str,
    camera_style: &'a str,
    sounds: Vec<&'a str>,
    character_appearances: Vec<AppearanceView<'a>>,
    landscape_notes: &'a str,
    props: Vec<&'a str>,
    timing: Vec<SegmentView<'a>>,
    duration_seconds: Option<u32>,
    language: &'a str,
}

impl<'a> PromptView<'a> {
    fn new(prompt: &'a FinalPrompt) -> Self {
        let non_blank = |items: &'a [String]| {
            items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
        };
        Self {
            opening: OPENING_STATEMENT,
            authenticity: AUTHENTICITY_STATEMENT,
            main_character_description: prompt.main_character_description().trim(),
            scene_setting_description: prompt.scene_setting_description().trim(),
            atmosphere_and_mood: prompt.atmosphere_and_mood().trim(),
            core_action_and_dialogue: prompt.core_action_and_dialogue().trim(),
            camera_style: prompt.camera_style().trim(),
            sounds: non_blank(prompt.sounds()),
            character_appearances: prompt
                .character_appearance_notes()
                .iter()
                .map(|(name, appearance)| AppearanceView {
                    name: name.as_str(),
                    appearance: appearance.trim(),
                })
                .collect(),
            landscape_notes: prompt.landscape_notes().trim(),
            props: non_blank(prompt.props()),
            timing: prompt
                .timing_breakdown()
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(|segment| SegmentView {
                    label: segment.label(),
                    action: segment.action().as_str(),
                })
                .collect(),
            duration_seconds: *prompt.duration_seconds(),
            language: prompt.language().as_str(),
        }
    }
}

/// Renders prompts through a Markdown template.
///
/// # Examples
///
/// ```
/// use veoprompt_template::PromptRenderer;
///
/// let renderer = PromptRenderer::new();
/// assert_eq!(renderer.name(), "veoprompt.md.j2");
/// ```
#[derive(Debug, Clone)]
pub struct PromptRenderer {
    name: String,
    source: String,
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptRenderer {
    /// Renderer using the bundled template.
    pub fn new() -> Self {
        Self {
            name: "veoprompt.md.j2".to_string(),
            source: BUNDLED_TEMPLATE.to_string(),
        }
    }

    /// Renderer using custom template source.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateErrorKind::InvalidTemplate`] if the source does not
    /// compile.
    pub fn from_source(
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<Self, TemplateError> {
        let name = name.into();
        let source = source.into();
        Environment::new()
            .template_from_str(&source)
            .map_err(|e| {
                TemplateError::new(TemplateErrorKind::InvalidTemplate(format!("{}: {}", name, e)))
            })?;
        Ok(Self { name, source })
    }

    /// Renderer reading template source from a file.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateErrorKind::InvalidTemplate`] if the file cannot be
    /// read or does not compile.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            TemplateError::new(TemplateErrorKind::InvalidTemplate(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_source(name, source)
    }

    /// Template name, for diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render a prompt and check the result against [`REQUIRED_SECTIONS`].
    ///
    /// # Errors
    ///
    /// Returns [`TemplateErrorKind::RenderFailed`] if the engine fails, or
    /// [`TemplateErrorKind::MissingField`] if a required section is absent or
    /// empty, or if the output contains a `None`/`null` marker.
    #[instrument(skip(self, prompt), fields(template = %self.name))]
    pub fn render(&self, prompt: &FinalPrompt) -> Result<String, TemplateError> {
        let view = PromptView::new(prompt);
        let rendered = environment()
            .render_str(&self.source, &view)
            .map_err(|e| TemplateError::new(TemplateErrorKind::RenderFailed(e.to_string())))?;
        let rendered = format!("{}\n", rendered.trim_end());

        let sections = parse_sections(&rendered);
        for required in REQUIRED_SECTIONS {
            match sections.get(*required) {
                Some(body) if !body.is_empty() => {}
                _ => {
                    return Err(TemplateError::new(TemplateErrorKind::MissingField(
                        (*required).to_string(),
                    )));
                }
            }
        }
        if let Some((title, _)) = sections
            .iter()
            .find(|(_, body)| body.lines().any(is_null_marker))
        {
            return Err(TemplateError::new(TemplateErrorKind::MissingField(
                title.clone(),
            )));
        }

        debug!(sections = sections.len(), chars = rendered.len(), "Rendered prompt");
        Ok(rendered)
    }
}

fn is_null_marker(line: &str) -> bool {
    let value = line.trim().trim_start_matches("- ");
    let value = value.rsplit(": ").next().unwrap_or(value);
    matches!(value.trim(), "None" | "null" | "none")
}
