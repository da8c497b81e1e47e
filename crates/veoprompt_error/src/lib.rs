//! Error types for the VeoPrompt pipeline.
//!
//! Every domain follows the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum names the specific condition
//! - `*Error` struct wraps the kind and records where it was raised
//! - constructors use `#[track_caller]` so the location is captured automatically
//!
//! All domain errors convert into [`VeoError`], which callers inspect through
//! [`VeoError::disposition`] to decide whether to re-prompt the user or abort
//! the scene.
//!
//! # Examples
//!
//! ```
//! use veoprompt_error::{ConsistencyError, ConsistencyErrorKind, Disposition, VeoResult};
//!
//! fn reconcile() -> VeoResult<()> {
//!     Err(ConsistencyError::new(ConsistencyErrorKind::UnknownCharacterReference(
//!         "Yeti".to_string(),
//!     )))?
//! }
//!
//! let err = reconcile().unwrap_err();
//! assert_eq!(err.disposition(), Disposition::Reprompt);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod consistency;
mod elaboration;
mod error;
mod gemini;
mod inference;
mod json;
mod realism;
mod session;
mod stage;
mod template;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use consistency::{ConsistencyError, ConsistencyErrorKind};
pub use elaboration::{ElaborationError, ElaborationErrorKind};
pub use error::{Disposition, VeoError, VeoErrorKind, VeoResult};
pub use gemini::{GeminiError, GeminiErrorKind, RetryableError};
pub use inference::{InferenceError, InferenceErrorKind};
pub use json::JsonError;
pub use realism::{RealismError, RealismErrorKind};
pub use session::{SessionError, SessionErrorKind};
pub use stage::{PipelineStage, StageError, StageErrorKind};
pub use template::{TemplateError, TemplateErrorKind};
