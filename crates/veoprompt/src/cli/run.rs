//! Command handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use veoprompt::{
    Console, Orchestrator, Session, VeoPromptConfig, VeoResult, chat,
    describe_failure, save,
};

/// Loads configuration and builds the orchestrator over the Gemini driver.
pub fn build_orchestrator(
    config_path: Option<&Path>,
    template: Option<PathBuf>,
) -> VeoResult<Orchestrator> {
    let mut config = VeoPromptConfig::load(config_path)?;
    if template.is_some() {
        config.template.path = template;
    }
    let config = Arc::new(config);
    connect(config)
}

#[cfg(feature = "gemini")]
fn connect(config: Arc<VeoPromptConfig>) -> VeoResult<Orchestrator> {
    let client = veoprompt::GeminiClient::from_env(&config.models.elaborator.model)?;
    info!(
        elaborator = %config.models.elaborator.model,
        judge = %config.models.judge.model,
        "Gemini client ready"
    );
    Orchestrator::from_driver(client, config)
}

#[cfg(not(feature = "gemini"))]
fn connect(_config: Arc<VeoPromptConfig>) -> VeoResult<Orchestrator> {
    Err(veoprompt_error::ConfigError::new(
        "no model provider compiled in; rebuild with --features gemini",
    )
    .into())
}

/// One-shot scene: clarifications are asked on the terminal, the result is
/// printed to stdout.
pub async fn run_scene(
    orchestrator: &Orchestrator,
    text: &str,
    json: bool,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let console = Console::stdio();
    let mut session = Session::new();

    let record = match orchestrator.process(&mut session, text, &console).await {
        Ok(record) => record,
        Err(e) => {
            eprintln!("{}", describe_failure(&e));
            return Err(e.into());
        }
    };

    let out = if json {
        serde_json::to_string_pretty(record.prompt())?
    } else {
        record.rendered().clone()
    };
    println!("{}", out);

    if let Some(path) = output {
        std::fs::write(path, &out)?;
        info!(path = %path.display(), "Prompt written");
    }
    Ok(())
}

/// Interactive conversation on the terminal.
pub async fn run_chat(
    orchestrator: &Orchestrator,
    save_to: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let console = Console::stdio();
    let mut session = Session::new();

    chat(orchestrator, &mut session, &console).await?;

    if let Some(path) = save_to {
        save(&session, path)?;
        eprintln!("Session saved to {}", path.display());
    }
    Ok(())
}
