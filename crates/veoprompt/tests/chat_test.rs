mod test_utils;

use test_utils::*;
use veoprompt::{ChatCommand, Console, SceneDraft, Session, VeoErrorKind, chat, save};
use veoprompt_error::SessionErrorKind;

async fn run(input: &str, drafts: Vec<SceneDraft>) -> anyhow::Result<(Session, String)> {
    let orchestrator = orchestrator(drafts)?;
    let mut session = Session::new();
    let console = Console::new(input.as_bytes(), Vec::new());
    chat(&orchestrator, &mut session, &console).await?;
    let (_, written) = console.into_inner();
    Ok((session, String::from_utf8(written)?))
}

#[tokio::test]
async fn scene_is_rendered_and_recorded() -> anyhow::Result<()> {
    let (session, out) = run("Bigfoot makes coffee at camp\n/quit\n", vec![camp_draft()]).await?;

    assert!(out.starts_with("VeoPrompt: describe a scene"));
    assert!(out.contains("=== Scene 1 (version 1) ==="));
    assert!(out.contains("Bigfoot"));
    assert_eq!(session.scenes().len(), 1);
    Ok(())
}

#[tokio::test]
async fn end_of_input_ends_the_conversation() -> anyhow::Result<()> {
    let (session, out) = run("", vec![camp_draft()]).await?;

    assert!(out.ends_with("scene> "));
    assert!(session.scenes().is_empty());
    Ok(())
}

#[tokio::test]
async fn clarification_reads_the_next_line() -> anyhow::Result<()> {
    let (session, out) = run(
        "Bigfoot at camp\nhe pours coffee and raises the mug\n/quit\n",
        vec![actionless_draft(), camp_draft()],
    )
    .await?;

    assert!(out.contains("? "), "a question was asked: {}", out);
    assert!(out.contains("=== Scene 1 (version 1) ==="));
    assert_eq!(session.scenes().len(), 1);
    Ok(())
}

#[tokio::test]
async fn unknown_command_keeps_the_conversation_going() -> anyhow::Result<()> {
    let (_, out) = run("/frobnicate\n/characters\n/scenes\n/quit\n", vec![camp_draft()]).await?;

    assert!(out.contains("unknown command /frobnicate; try /help"));
    assert!(out.contains("No characters yet."));
    assert!(out.contains("No scenes yet."));
    Ok(())
}

#[tokio::test]
async fn edited_character_rejects_the_old_description() -> anyhow::Result<()> {
    let (session, out) = run(
        "Bigfoot makes coffee\n/characters\n/edit bigfoot: short, white fur\nBigfoot makes coffee again\n/quit\n",
        vec![camp_draft()],
    )
    .await?;

    assert!(out.contains("- Bigfoot ("));
    assert!(out.contains("Bigfoot is now: short, white fur"));
    assert!(out.contains("Please revise the scene and try again."));
    assert_eq!(session.scenes().len(), 1);
    Ok(())
}

#[tokio::test]
async fn correction_adds_a_version() -> anyhow::Result<()> {
    let (session, out) = run(
        "Bigfoot makes coffee\n/correct 1 make it colder\n/correct 7 anything\n/quit\n",
        vec![camp_draft()],
    )
    .await?;

    assert!(out.contains("=== Scene 1 (version 2) ==="));
    assert!(out.contains("No scene #7"), "unknown scene reported: {}", out);
    assert_eq!(session.history().len(), 2);
    Ok(())
}

#[tokio::test]
async fn save_writes_the_session() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("session.json");
    let input = format!("Bigfoot makes coffee\n/save {}\n/quit\n", path.display());

    let (session, out) = run(&input, vec![camp_draft()]).await?;

    assert!(out.contains("Session saved to"));
    let restored: Session = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(restored.id(), session.id());
    assert_eq!(restored.scenes().len(), 1);
    Ok(())
}

#[test]
fn commands_parse() {
    assert_eq!(ChatCommand::parse("  "), ChatCommand::Empty);
    assert_eq!(ChatCommand::parse("/EXIT"), ChatCommand::Quit);
    assert_eq!(ChatCommand::parse("/chars"), ChatCommand::Characters);
    assert_eq!(
        ChatCommand::parse("/correct #3 drop the hat"),
        ChatCommand::Correct {
            sequence: 3,
            text: "drop the hat".to_string()
        }
    );
    assert_eq!(
        ChatCommand::parse("/edit Yeti : white fur, blue eyes"),
        ChatCommand::Edit {
            name: "Yeti".to_string(),
            appearance: "white fur, blue eyes".to_string()
        }
    );
    assert!(matches!(ChatCommand::parse("/edit Yeti"), ChatCommand::Invalid(_)));
    assert!(matches!(ChatCommand::parse("/save"), ChatCommand::Invalid(_)));
}

#[test]
fn unwritable_save_path_is_a_session_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("missing").join("session.json");

    let err = save(&Session::new(), &path).unwrap_err();

    assert!(matches!(
        err.kind(),
        VeoErrorKind::Session(e) if matches!(&e.kind, SessionErrorKind::SaveFailed { .. })
    ));
    assert!(err.to_string().contains("Cannot write session to"));
    Ok(())
}
