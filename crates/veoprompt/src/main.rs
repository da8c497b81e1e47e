//! VeoPrompt CLI binary.
//!
//! - `scene`: build one prompt, asking clarifying questions on the terminal
//! - `chat`: multi-scene conversation with a shared character registry

use clap::Parser;
use veoprompt::{ObservabilityConfig, init_logging};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, build_orchestrator, run_chat, run_scene};

    // Parse command-line arguments
    let cli = Cli::parse();

    // Pick up GEMINI_API_KEY from .env when present
    let _ = dotenvy::dotenv();

    let mut logging = ObservabilityConfig::default().with_json_logs(cli.json_logs);
    if cli.verbose {
        logging = logging.with_log_level("info,veoprompt_pipeline=debug");
    }
    init_logging(&logging)?;

    let orchestrator = build_orchestrator(cli.config.as_deref(), cli.template.clone())?;

    // Execute the requested command
    match cli.command {
        Commands::Scene { text, json, output } => {
            run_scene(&orchestrator, &text, json, output.as_deref()).await?;
        }

        Commands::Chat { save } => {
            run_chat(&orchestrator, save.as_deref()).await?;
        }
    }

    Ok(())
}
