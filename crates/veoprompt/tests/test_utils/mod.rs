//! Fixed capabilities for driving the chat loop without a model.
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use veoprompt::{
    CharacterSketch, DraftAction, ElaborationRequest, Orchestrator, RealismJudge, ResolvedScene,
    SceneComposer, SceneDraft, SceneElaborator, SceneStaging, VeoPromptConfig, VeoResult, Verdict,
};

pub fn camp_draft() -> SceneDraft {
    SceneDraft {
        description: Some("Bigfoot vlogging from a campsite at dawn".to_string()),
        characters: vec![CharacterSketch {
            name: "Bigfoot".to_string(),
            physical_description: Some("tall, dark brown fur, red flannel shirt".to_string()),
            personality_traits: vec!["cheerful".to_string()],
        }],
        key_actions: vec![
            DraftAction::Text("pours coffee from a dented kettle".to_string()),
            DraftAction::Text("raises the mug to the camera".to_string()),
        ],
        duration_seconds: Some(8.0),
        ..SceneDraft::default()
    }
}

/// The camp scene before the user has said what happens.
pub fn actionless_draft() -> SceneDraft {
    SceneDraft {
        key_actions: vec![],
        ..camp_draft()
    }
}

/// Replays drafts in order, repeating the last.
pub struct FixedElaborator {
    drafts: Vec<SceneDraft>,
    calls: Mutex<usize>,
}

#[async_trait]
impl SceneElaborator for FixedElaborator {
    async fn draft(&self, _request: &ElaborationRequest) -> VeoResult<SceneDraft> {
        let mut calls = self.calls.lock().unwrap();
        let index = (*calls).min(self.drafts.len() - 1);
        *calls += 1;
        Ok(self.drafts[index].clone())
    }
}

pub struct FixedComposer;

#[async_trait]
impl SceneComposer for FixedComposer {
    async fn compose(&self, _scene: &ResolvedScene) -> VeoResult<SceneStaging> {
        Ok(SceneStaging::builder()
            .main_character_description("A towering figure in flannel, filming himself")
            .scene_setting_description("A lakeside campsite with a smoking fire pit")
            .atmosphere_and_mood("Quiet and content")
            .camera_style("POV, handheld selfie angle")
            .sounds(vec!["kettle whistle".to_string(), "loons".to_string()])
            .landscape_notes("Fog over the water, first light on the ridge")
            .props(vec!["dented kettle".to_string()])
            .build()
            .expect("staging builds"))
    }
}

pub struct AcceptingJudge;

#[async_trait]
impl RealismJudge for AcceptingJudge {
    async fn judge(&self, _candidate: &str) -> VeoResult<Verdict> {
        Ok(Verdict::Accept)
    }
}

pub fn orchestrator(drafts: Vec<SceneDraft>) -> anyhow::Result<Orchestrator> {
    let mut config = VeoPromptConfig::defaults()?;
    config.retry.initial_backoff_ms = Some(1);
    Ok(Orchestrator::new(
        Arc::new(FixedElaborator {
            drafts,
            calls: Mutex::new(0),
        }),
        Arc::new(FixedComposer),
        Arc::new(AcceptingJudge),
        Arc::new(config),
    )?)
}
