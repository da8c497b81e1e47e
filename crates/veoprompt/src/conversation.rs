//! The multi-scene chat loop.

use crate::console::Console;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{info, instrument, warn};
use veoprompt_core::{RealismOutcome, SceneRecord};
use veoprompt_error::{
    Disposition, JsonError, SessionError, SessionErrorKind, VeoError, VeoResult,
};
use veoprompt_pipeline::{CharacterEdit, Orchestrator, Session};

const HELP: &str = "\
Describe a scene to turn it into a prompt. Commands:
  /correct <scene> <text>   rework an earlier scene
  /edit <name>: <appearance> replace a character's description
  /characters               list registered characters
  /scenes                   print the latest version of every scene
  /save <path>              write the session as JSON
  /help                     show this text
  /quit                     leave";

/// One line of chat input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// New scene text
    Scene(String),
    /// Rework scene `sequence`
    Correct {
        /// Scene to rework
        sequence: u32,
        /// What to change
        text: String,
    },
    /// Replace a character's appearance
    Edit {
        /// Character name
        name: String,
        /// New appearance
        appearance: String,
    },
    /// List registered characters
    Characters,
    /// Print every scene
    Scenes,
    /// Write the session to a file
    Save(PathBuf),
    /// Show usage
    Help,
    /// End the conversation
    Quit,
    /// Nothing to do
    Empty,
    /// A command that could not be parsed; carries the usage hint
    Invalid(String),
}

impl ChatCommand {
    /// Parses one input line.
    ///
    /// # Examples
    ///
    /// ```
    /// use veoprompt::ChatCommand;
    ///
    /// assert_eq!(
    ///     ChatCommand::parse("/correct 2 make it rain"),
    ///     ChatCommand::Correct { sequence: 2, text: "make it rain".to_string() }
    /// );
    /// assert_eq!(
    ///     ChatCommand::parse("Bigfoot naps in a hammock"),
    ///     ChatCommand::Scene("Bigfoot naps in a hammock".to_string())
    /// );
    /// assert!(matches!(ChatCommand::parse("/correct two"), ChatCommand::Invalid(_)));
    /// ```
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ChatCommand::Empty;
        }
        let Some(command) = line.strip_prefix('/') else {
            return ChatCommand::Scene(line.to_string());
        };
        let (name, rest) = command
            .split_once(char::is_whitespace)
            .map(|(name, rest)| (name, rest.trim()))
            .unwrap_or((command, ""));

        match name.to_lowercase().as_str() {
            "quit" | "exit" | "q" => ChatCommand::Quit,
            "help" | "?" => ChatCommand::Help,
            "characters" | "chars" => ChatCommand::Characters,
            "scenes" => ChatCommand::Scenes,
            "save" if !rest.is_empty() => ChatCommand::Save(PathBuf::from(rest)),
            "save" => ChatCommand::Invalid("usage: /save <path>".to_string()),
            "correct" => {
                let parsed = rest.split_once(char::is_whitespace).and_then(|(n, text)| {
                    let text = text.trim();
                    (!text.is_empty())
                        .then(|| n.trim_start_matches('#').parse::<u32>().ok())
                        .flatten()
                        .map(|sequence| (sequence, text.to_string()))
                });
                match parsed {
                    Some((sequence, text)) => ChatCommand::Correct { sequence, text },
                    None => ChatCommand::Invalid("usage: /correct <scene number> <text>".to_string()),
                }
            }
            "edit" => match rest.split_once(':') {
                Some((name, appearance))
                    if !name.trim().is_empty() && !appearance.trim().is_empty() =>
                {
                    ChatCommand::Edit {
                        name: name.trim().to_string(),
                        appearance: appearance.trim().to_string(),
                    }
                }
                _ => ChatCommand::Invalid("usage: /edit <name>: <appearance>".to_string()),
            },
            other => ChatCommand::Invalid(format!("unknown command /{}; try /help", other)),
        }
    }
}

/// Text shown for an accepted scene.
pub fn describe_record(record: &SceneRecord) -> String {
    let mut out = format!(
        "=== Scene {} (version {}) ===\n{}",
        record.sequence(),
        record.version(),
        record.rendered()
    );
    if let RealismOutcome::Degraded(reasons) = record.realism() {
        out.push_str("\n\nWarning: kept despite realism concerns:\n");
        for reason in reasons {
            out.push_str(&format!("- {}\n", reason));
        }
    }
    out
}

/// Text shown for a failed scene.
pub fn describe_failure(err: &VeoError) -> String {
    match err.disposition() {
        Disposition::Reprompt => format!("{}\nPlease revise the scene and try again.", err),
        Disposition::Abort => format!("Scene dropped: {}", err),
    }
}

/// Runs the chat loop until `/quit` or end of input.
///
/// Scene failures are reported and the conversation continues; only console
/// I/O failures end it early.
///
/// # Errors
///
/// Fails if the console cannot be read or written.
#[instrument(skip_all, fields(session = %session.id()))]
pub async fn chat<R, W>(
    orchestrator: &Orchestrator,
    session: &mut Session,
    console: &Console<R, W>,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    console
        .say("VeoPrompt: describe a scene, or /help for commands.")
        .await?;

    loop {
        console.write("\nscene> ").await?;
        let Some(line) = console.read_line().await? else {
            break;
        };

        let reply = match ChatCommand::parse(&line) {
            ChatCommand::Empty => continue,
            ChatCommand::Quit => break,
            ChatCommand::Help => HELP.to_string(),
            ChatCommand::Invalid(usage) => usage,
            ChatCommand::Scene(text) => match orchestrator.process(session, &text, console).await {
                Ok(record) => describe_record(&record),
                Err(e) => {
                    warn!(error = %e, "Scene failed");
                    describe_failure(&e)
                }
            },
            ChatCommand::Correct { sequence, text } => {
                match orchestrator.correct(session, sequence, &text, console).await {
                    Ok(record) => describe_record(&record),
                    Err(e) => {
                        warn!(error = %e, sequence, "Correction failed");
                        describe_failure(&e)
                    }
                }
            }
            ChatCommand::Edit { name, appearance } => {
                match session.edit_character(&name, CharacterEdit::appearance(appearance)) {
                    Ok(character) => format!(
                        "{} is now: {}",
                        character.name(),
                        character.physical_description()
                    ),
                    Err(e) => e.to_string(),
                }
            }
            ChatCommand::Characters => list_characters(session),
            ChatCommand::Scenes => {
                let scenes = session.scenes();
                if scenes.is_empty() {
                    "No scenes yet.".to_string()
                } else {
                    scenes
                        .into_iter()
                        .map(describe_record)
                        .collect::<Vec<_>>()
                        .join("\n\n")
                }
            }
            ChatCommand::Save(path) => match save(session, &path) {
                Ok(()) => format!("Session saved to {}", path.display()),
                Err(e) => e.to_string(),
            },
        };
        console.say(&reply).await?;
    }

    info!(scenes = session.scenes().len(), "Conversation ended");
    Ok(())
}

fn list_characters(session: &Session) -> String {
    let registry = session.registry();
    if registry.is_empty() {
        return "No characters yet.".to_string();
    }
    registry
        .characters()
        .map(|c| {
            let mut line = format!("- {} ({}): {}", c.name(), c.character_type(), c.physical_description());
            if !c.consistency_notes().is_empty() {
                line.push_str(&format!(" [{}]", c.consistency_notes().join("; ")));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes the session as pretty JSON.
///
/// # Errors
///
/// Fails if the session cannot be serialized or the file cannot be written.
pub fn save(session: &Session, path: &std::path::Path) -> VeoResult<()> {
    let json = serde_json::to_string_pretty(session)
        .map_err(|e| JsonError::new(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| {
        SessionError::new(SessionErrorKind::SaveFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    })?;
    info!(path = %path.display(), "Session saved");
    Ok(())
}
