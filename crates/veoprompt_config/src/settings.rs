//! Typed configuration sections and the layered loader.

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};
use veoprompt_error::{ConfigError, VeoResult};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../veoprompt.toml");

/// Scene defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SceneConfig {
    /// Dialogue language used when the user names none
    pub language: String,
    /// Longest clip the target model produces, in seconds
    pub duration_cap_seconds: u32,
}

/// Loop bounds and policy switches.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Clarification rounds before elaboration gives up
    pub max_clarification_rounds: u32,
    /// Realism filter attempts per scene
    pub max_filter_attempts: u32,
    /// Record the last candidate instead of failing when the filter never accepts
    #[serde(default)]
    pub accept_degraded: bool,
    /// Refuse to create characters the registry does not know
    #[serde(default)]
    pub strict_characters: bool,
}

/// Time allowances.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TimeoutConfig {
    /// Per model-backed stage, including its retries
    pub stage_secs: u64,
    /// Waiting for the user to answer a clarification
    pub clarification_secs: u64,
}

impl TimeoutConfig {
    /// Stage allowance as a [`Duration`].
    pub fn stage(&self) -> Duration {
        Duration::from_secs(self.stage_secs)
    }

    /// Clarification allowance as a [`Duration`].
    pub fn clarification(&self) -> Duration {
        Duration::from_secs(self.clarification_secs)
    }
}

/// Backoff for transient inference failures.
///
/// By default each failure kind brings its own schedule (a rate limit backs
/// off longer than a malformed reply); the optional fields replace the
/// kind's value for every failure.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Upper bound on retries after the first attempt
    pub max_retries: usize,
    /// First backoff delay
    #[serde(default)]
    pub initial_backoff_ms: Option<u64>,
    /// Upper bound on a single delay
    #[serde(default)]
    pub max_delay_secs: Option<u64>,
}

/// Model settings for one capability.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModelConfig {
    /// Model identifier, e.g. "gemini-2.5-flash"
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Output token limit
    pub max_tokens: u32,
}

/// Model settings per capability.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModelsConfig {
    /// Scene elaboration
    pub elaborator: ModelConfig,
    /// Staging prose generation
    pub composer: ModelConfig,
    /// Realism classification
    pub judge: ModelConfig,
}

/// Template selection.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct TemplateConfig {
    /// Custom template file; the bundled template is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Complete VeoPrompt configuration.
///
/// # Example
///
/// ```
/// use veoprompt_config::VeoPromptConfig;
///
/// let config = VeoPromptConfig::defaults().unwrap();
/// assert_eq!(config.scene.duration_cap_seconds, 8);
/// assert_eq!(config.scene.language, "turkish");
/// assert_eq!(config.pipeline.max_clarification_rounds, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VeoPromptConfig {
    /// Scene defaults
    pub scene: SceneConfig,
    /// Loop bounds and policy switches
    pub pipeline: PipelineConfig,
    /// Time allowances
    pub timeouts: TimeoutConfig,
    /// Retry backoff
    pub retry: RetryConfig,
    /// Per-capability model settings
    pub models: ModelsConfig,
    /// Template selection
    #[serde(default)]
    pub template: TemplateConfig,
}

impl VeoPromptConfig {
    /// Bundled defaults only.
    #[instrument]
    pub fn defaults() -> VeoResult<Self> {
        Self::finish(Self::bundled())
    }

    /// Load with the full precedence chain.
    ///
    /// `explicit` is layered above the current-directory file and is
    /// required to exist when given.
    #[instrument]
    pub fn load(explicit: Option<&Path>) -> VeoResult<Self> {
        debug!("Loading configuration: env > explicit > current dir > home dir > bundled");

        let mut builder = Self::bundled();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/veoprompt/veoprompt.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("veoprompt").required(false));

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::new(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
                .into());
            }
            builder = builder.add_source(File::from(path));
        }

        Self::finish(builder.add_source(Self::environment()))
    }

    /// Bundled defaults overlaid with a single file. No home, working
    /// directory or environment lookups.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> VeoResult<Self> {
        debug!("Loading configuration from file");
        Self::finish(Self::bundled().add_source(File::from(path.as_ref())))
    }

    /// Bundled defaults overlaid with TOML text.
    pub fn from_toml_str(toml: &str) -> VeoResult<Self> {
        Self::finish(Self::bundled().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn bundled() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn environment() -> Environment {
        Environment::with_prefix("VEOPROMPT")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> VeoResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check bounds that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first out-of-range value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scene.duration_cap_seconds == 0 {
            return Err(ConfigError::new("scene.duration_cap_seconds must be at least 1"));
        }
        if self.scene.language.trim().is_empty() {
            return Err(ConfigError::new("scene.language must not be blank"));
        }
        if self.pipeline.max_clarification_rounds == 0 {
            return Err(ConfigError::new(
                "pipeline.max_clarification_rounds must be at least 1",
            ));
        }
        if self.pipeline.max_filter_attempts == 0 {
            return Err(ConfigError::new("pipeline.max_filter_attempts must be at least 1"));
        }
        if self.timeouts.stage_secs == 0 || self.timeouts.clarification_secs == 0 {
            return Err(ConfigError::new("timeouts must be at least one second"));
        }
        for (name, model) in [
            ("elaborator", &self.models.elaborator),
            ("composer", &self.models.composer),
            ("judge", &self.models.judge),
        ] {
            if model.model.trim().is_empty() {
                return Err(ConfigError::new(format!("models.{}.model must be set", name)));
            }
            if !(0.0..=2.0).contains(&model.temperature) {
                return Err(ConfigError::new(format!(
                    "models.{}.temperature must be within 0.0..=2.0",
                    name
                )));
            }
        }
        Ok(())
    }
}
