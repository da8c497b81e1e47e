//! VeoPrompt - conversational prompt building for text-to-video models
//!
//! VeoPrompt turns loose scene descriptions into structured prompts for
//! eight-second, vlog-style video clips. Every scene passes through a fixed
//! pipeline:
//!
//! - **Elaboration**: free text becomes a validated scene, with a bounded
//!   clarification dialogue for anything essential that is missing
//! - **Consistency**: characters keep one canonical appearance per session
//! - **Staging**: setting, mood, camera, sounds and props
//! - **Realism filter**: cartoonish or theatrical scenes are sent back for
//!   field-scoped revision
//! - **Assembly and rendering** into the final Markdown prompt
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use veoprompt::{Console, GeminiClient, Orchestrator, Session, VeoPromptConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(VeoPromptConfig::load(None)?);
//!     let client = GeminiClient::from_env(&config.models.elaborator.model)?;
//!     let orchestrator = Orchestrator::from_driver(client, config)?;
//!
//!     let mut session = Session::new();
//!     let record = orchestrator
//!         .process(&mut session, "Bigfoot cooks breakfast at camp", &Console::stdio())
//!         .await?;
//!     println!("{}", record.rendered());
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `gemini` (default) - Google Gemini driver
//!
//! # Architecture
//!
//! - `veoprompt_error` - Error types
//! - `veoprompt_core` - Scene, character and prompt types
//! - `veoprompt_interface` - Driver and capability traits
//! - `veoprompt_config` - Layered configuration
//! - `veoprompt_models` - Model provider drivers
//! - `veoprompt_template` - Prompt rendering
//! - `veoprompt_pipeline` - The scene pipeline and session
//!
//! This crate re-exports the public surface and adds the terminal front end.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod console;
mod conversation;
mod observability;

pub use console::Console;
pub use conversation::{ChatCommand, chat, describe_failure, describe_record, save};
pub use observability::{ObservabilityConfig, init_logging};

pub use veoprompt_config::{Credentials, ModelConfig, ModelsConfig, VeoPromptConfig};
pub use veoprompt_core::{
    Character, CharacterRegistry, CharacterSketch, CharacterType, ClarificationRequest,
    DraftAction, FinalPrompt, RealismConcern, RealismOutcome, RejectReason, ResolvedScene,
    SceneDraft, SceneInput, SceneRecord, SceneStaging, Verdict,
};
pub use veoprompt_error::{Disposition, VeoError, VeoErrorKind, VeoResult};
pub use veoprompt_interface::{
    ClarificationResponder, ElaborationRequest, RealismJudge, SceneComposer, SceneElaborator,
    VeoDriver,
};
#[cfg(feature = "gemini")]
pub use veoprompt_models::GeminiClient;
pub use veoprompt_pipeline::{CharacterEdit, DriverCapabilities, Orchestrator, Session};
pub use veoprompt_template::PromptRenderer;
