//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// VeoPrompt - turn scene ideas into realistic text-to-video prompts
#[derive(Parser, Debug)]
#[command(name = "veoprompt")]
#[command(about = "Turn scene ideas into realistic, character-consistent text-to-video prompts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file layered over the defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Custom prompt template
    #[arg(long, global = true)]
    pub template: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a prompt for a single scene
    Scene {
        /// Scene description
        text: String,

        /// Print the assembled prompt as JSON instead of rendered text
        #[arg(long)]
        json: bool,

        /// Also write the output to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Start a multi-scene conversation
    Chat {
        /// Write the session to this file on exit
        #[arg(long)]
        save: Option<PathBuf>,
    },
}
