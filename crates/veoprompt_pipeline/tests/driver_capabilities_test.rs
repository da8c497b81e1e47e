mod test_utils;

use test_utils::*;
use veoprompt_core::{
    CharacterRegistry, DraftAction, Input, RealismConcern, RejectReason, Role, SceneDraft,
    Verdict,
};
use veoprompt_error::{InferenceErrorKind, VeoErrorKind};
use veoprompt_interface::{
    ElaborationRequest, RealismJudge, SceneComposer, SceneElaborator,
};
use veoprompt_pipeline::{DriverCapabilities, reconcile};

fn request() -> ElaborationRequest {
    ElaborationRequest::builder()
        .raw_text("Bigfoot vlogging about cooking breakfast")
        .language("turkish")
        .duration_cap(8u32)
        .build()
        .unwrap()
}

fn text_of(input: &Input) -> &str {
    match input {
        Input::Text(text) => text,
    }
}

#[tokio::test]
async fn elaborator_reads_fenced_json() -> anyhow::Result<()> {
    let reply = r#"Here is the scene:
```json
{
  "description": "Bigfoot cooks breakfast at a campsite",
  "characters": [{"name": "Bigfoot", "physical_description": "tall, brown fur"}],
  "key_actions": [
    "cracks eggs into a pan",
    {"text": "flips the bacon", "start_seconds": 4, "end_seconds": 8}
  ],
  "duration_seconds": 8
}
```"#;
    let driver = MockDriver::new(&[reply]);
    let config = test_config();
    let capabilities = DriverCapabilities::shared(driver.clone(), config.models.clone());

    let draft = capabilities.draft(&request()).await?;

    assert_eq!(
        draft.description.as_deref(),
        Some("Bigfoot cooks breakfast at a campsite")
    );
    assert_eq!(draft.characters[0].description(), Some("tall, brown fur"));
    assert_eq!(
        draft.key_actions[1],
        DraftAction::Detailed {
            text: "flips the bacon".to_string(),
            start_seconds: Some(4.0),
            end_seconds: Some(8.0),
        }
    );
    assert!(!draft.characterless);

    let sent = driver.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].model.as_deref(), Some(config.models.elaborator.model.as_str()));
    assert_eq!(sent[0].temperature, Some(config.models.elaborator.temperature));
    assert_eq!(sent[0].messages[0].role, Role::System);
    assert_eq!(sent[0].messages[1].role, Role::User);
    assert!(text_of(&sent[0].messages[1].content[0]).contains("Bigfoot vlogging about cooking breakfast"));
    Ok(())
}

#[tokio::test]
async fn judge_uses_its_own_model_settings() -> anyhow::Result<()> {
    let driver = MockDriver::new(&[
        r#"{"verdict": "reject", "reasons": [{"concern": "theatrical_delivery", "detail": "takes a bow"}]}"#,
    ]);
    let config = test_config();
    let capabilities = DriverCapabilities::shared(driver.clone(), config.models.clone());

    let verdict = capabilities.judge("## Opening Statement\n...").await?;

    assert_eq!(
        verdict,
        Verdict::Reject(vec![RejectReason::new(
            RealismConcern::TheatricalDelivery,
            "takes a bow"
        )])
    );
    let sent = driver.requests();
    assert_eq!(sent[0].model.as_deref(), Some(config.models.judge.model.as_str()));
    assert_eq!(sent[0].temperature, Some(config.models.judge.temperature));
    assert_eq!(sent[0].max_tokens, Some(config.models.judge.max_tokens));
    assert_eq!(text_of(&sent[0].messages[1].content[0]), "## Opening Statement\n...");
    Ok(())
}

#[tokio::test]
async fn judge_accepts() -> anyhow::Result<()> {
    let capabilities = DriverCapabilities::shared(
        MockDriver::new(&[r#"{"verdict": "Accept", "reasons": []}"#]),
        test_config().models,
    );
    assert_eq!(capabilities.judge("candidate").await?, Verdict::Accept);
    Ok(())
}

#[tokio::test]
async fn malformed_replies_are_invalid_shape() {
    let capabilities = DriverCapabilities::shared(
        MockDriver::new(&["I'd rather not answer in JSON today."]),
        test_config().models,
    );

    let err = capabilities.draft(&request()).await.unwrap_err();
    match err.kind() {
        VeoErrorKind::Inference(e) => {
            assert!(matches!(
                &e.kind,
                InferenceErrorKind::InvalidResponseShape { capability, .. } if capability == "elaborator"
            ));
        }
        other => panic!("expected inference error, got {other}"),
    }
}

#[tokio::test]
async fn reject_without_reasons_is_invalid_shape() {
    let capabilities = DriverCapabilities::shared(
        MockDriver::new(&[r#"{"verdict": "reject"}"#]),
        test_config().models,
    );

    let err = capabilities.judge("candidate").await.unwrap_err();
    assert!(err.to_string().contains("rejection without reasons"));
}

#[tokio::test]
async fn composer_reply_becomes_staging() -> anyhow::Result<()> {
    let reply = r#"{
        "main_character_description": "A towering figure in red flannel",
        "scene_setting_description": "A pine-forest campsite",
        "atmosphere_and_mood": "Cozy",
        "camera_style": "POV, selfie stick",
        "sounds": ["sizzling bacon"],
        "landscape_notes": "Morning mist",
        "props": []
    }"#;
    let driver = MockDriver::new(&[reply]);
    let config = test_config();
    let capabilities = DriverCapabilities::shared(driver.clone(), config.models.clone());

    let input = breakfast_draft().finalize(8, "turkish")?;
    let (scene, _) = reconcile(input, &CharacterRegistry::default(), false)?;
    let staging = capabilities.compose(&scene).await?;

    assert_eq!(staging.camera_style(), "POV, selfie stick");
    assert_eq!(staging.sounds(), &["sizzling bacon".to_string()]);
    assert!(staging.blank_fields().is_empty());
    assert_eq!(
        driver.requests()[0].model.as_deref(),
        Some(config.models.composer.model.as_str())
    );
    let body = driver.requests()[0].messages[1].content[0].clone();
    assert!(text_of(&body).contains("cracks eggs into a cast-iron pan"));
    Ok(())
}

#[test]
fn unused_draft_fields_default() {
    let draft: SceneDraft = serde_json::from_str(r#"{"description": "fog"}"#).unwrap();
    assert!(draft.characters.is_empty());
    assert!(draft.key_actions.is_empty());
    assert_eq!(draft.duration_seconds, None);
}
