//! Trait definitions for VeoPrompt.
//!
//! [`VeoDriver`] is the raw text-generation boundary. The capability traits
//! ([`SceneElaborator`], [`SceneComposer`], [`RealismJudge`]) are what the
//! pipeline consumes; [`ClarificationResponder`] is the interactive surface.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{ClarificationResponder, RealismJudge, SceneComposer, SceneElaborator, VeoDriver};
pub use types::{ClarifiedAnswer, ElaborationRequest, ElaborationRequestBuilder};
