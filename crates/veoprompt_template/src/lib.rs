//! Markdown rendering for assembled prompts.
//!
//! [`PromptRenderer`] turns a [`FinalPrompt`](veoprompt_core::FinalPrompt)
//! into the text handed to the video model. The output is checked against the
//! section contract after every render; see [`REQUIRED_SECTIONS`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod renderer;
mod sections;

pub use renderer::{AUTHENTICITY_STATEMENT, OPENING_STATEMENT, PromptRenderer};
pub use sections::{REQUIRED_SECTIONS, parse_sections};
