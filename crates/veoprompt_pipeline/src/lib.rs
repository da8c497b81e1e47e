//! The VeoPrompt scene pipeline.
//!
//! Raw scene text goes through a fixed sequence of stages:
//!
//! 1. **Elaboration**: the text becomes a validated [`SceneInput`], asking the
//!    user for anything essential that is missing
//! 2. **Consistency**: characters resolve against the session registry
//! 3. **Staging**: production prose for setting, camera, sound and props
//! 4. **Realism filter**: the rendered candidate is judged; rejects send the
//!    affected fields back to elaboration
//! 5. **Assembly** and rendering into the final prompt text
//!
//! [`Orchestrator`] runs the stages and appends accepted scenes to a
//! [`Session`].
//!
//! [`SceneInput`]: veoprompt_core::SceneInput

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assembly;
mod consistency;
mod descriptor;
mod elaboration;
mod extraction;
mod filter;
mod inference;
mod orchestrator;
mod prompts;
mod retry;
mod session;
mod staging;

pub use assembly::assemble;
pub use consistency::reconcile;
pub use descriptor::{Appearance, Attribute, AttributeValue, Contradiction};
pub use elaboration::{Elaboration, ElaborationStage, SceneContext};
pub use extraction::{extract_object, parse_reply};
pub use filter::{AttemptLedger, MarkerScan, NextStep, RealismFilter};
pub use inference::DriverCapabilities;
pub use orchestrator::Orchestrator;
pub use session::{CharacterEdit, CharacterEditBuilder, Session};
pub use staging::stage_scene;
