//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the veoprompt binary.

mod commands;
mod run;

pub use commands::{Cli, Commands};
pub use run::{build_orchestrator, run_chat, run_scene};
