//! Configuration for VeoPrompt.
//!
//! Settings are layered, later sources overriding earlier ones:
//! - bundled defaults (`veoprompt.toml` compiled into the binary)
//! - `~/.config/veoprompt/veoprompt.toml`
//! - `./veoprompt.toml`
//! - an explicit file, if the caller passes one
//! - `VEOPROMPT__<SECTION>__<KEY>` environment variables
//!
//! Credentials never live in configuration files; see [`Credentials`].
//! Configuration is loaded once at start-up and shared immutably.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod credentials;
mod settings;

pub use credentials::Credentials;
pub use settings::{
    ModelConfig, ModelsConfig, PipelineConfig, RetryConfig, SceneConfig, TemplateConfig,
    TimeoutConfig, VeoPromptConfig,
};
