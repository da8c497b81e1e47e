//! Core data types for the VeoPrompt scene pipeline.
//!
//! Scenes flow through these types in order: a [`SceneDraft`] from the
//! elaborator becomes a validated [`SceneInput`], which resolves against the
//! [`CharacterRegistry`] into a [`ResolvedScene`], which assembles into a
//! [`FinalPrompt`] and is archived as a [`SceneRecord`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod character;
mod input;
mod message;
mod output;
mod prompt;
mod realism;
mod record;
mod registry;
mod request;
mod role;
mod scene;

pub use character::{Character, CharacterBuilder, CharacterSketch, CharacterType};
pub use input::Input;
pub use message::Message;
pub use output::Output;
pub use prompt::{FinalPrompt, FinalPromptBuilder, TimingSegment, is_partition};
pub use realism::{RealismConcern, RejectReason, RevisionDirective, SceneField, Verdict};
pub use record::{RealismOutcome, SceneRecord};
pub use registry::{CharacterRegistry, RegistryEntry};
pub use request::{GenerateRequest, GenerateResponse};
pub use role::Role;
pub use scene::{
    ClarificationRequest, DraftAction, KeyAction, ResolvedScene, SceneDraft, SceneInput,
    SceneSlot, SceneStaging, SceneStagingBuilder, TimeWindow,
};
