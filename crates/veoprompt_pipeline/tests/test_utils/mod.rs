//! Scripted capabilities for pipeline tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use veoprompt_config::VeoPromptConfig;
use veoprompt_core::{
    CharacterSketch, ClarificationRequest, DraftAction, GenerateRequest, GenerateResponse,
    Output, ResolvedScene, SceneDraft, SceneStaging, Verdict,
};
use veoprompt_error::{InferenceError, InferenceErrorKind, VeoError, VeoResult};
use veoprompt_interface::{
    ClarificationResponder, ElaborationRequest, RealismJudge, SceneComposer, SceneElaborator,
    VeoDriver,
};

/// Defaults with millisecond backoff so retry tests stay fast.
pub fn test_config() -> VeoPromptConfig {
    let mut config = VeoPromptConfig::defaults().expect("bundled config loads");
    config.retry.initial_backoff_ms = Some(1);
    config.retry.max_delay_secs = Some(1);
    config.timeouts.stage_secs = 5;
    config.timeouts.clarification_secs = 5;
    config
}

pub fn shared(config: VeoPromptConfig) -> Arc<VeoPromptConfig> {
    Arc::new(config)
}

pub fn sketch(name: &str, description: Option<&str>) -> CharacterSketch {
    CharacterSketch {
        name: name.to_string(),
        physical_description: description.map(str::to_string),
        personality_traits: vec![],
    }
}

pub fn actions(texts: &[&str]) -> Vec<DraftAction> {
    texts
        .iter()
        .map(|t| DraftAction::Text(t.to_string()))
        .collect()
}

/// Bigfoot cooking breakfast; the description never says "bigfoot".
pub fn breakfast_draft() -> SceneDraft {
    SceneDraft {
        description: Some("Bigfoot vlogging about cooking breakfast at a campsite".to_string()),
        characters: vec![sketch(
            "Bigfoot",
            Some("tall, dark brown fur, wears a red flannel shirt"),
        )],
        key_actions: actions(&[
            "cracks eggs into a cast-iron pan",
            "flips the bacon with a fork",
            "holds the plate up to the camera",
        ]),
        duration_seconds: Some(8.0),
        ..SceneDraft::default()
    }
}

pub fn staging() -> SceneStaging {
    SceneStaging::builder()
        .main_character_description("A towering figure in a red flannel shirt, filming himself")
        .scene_setting_description("A pine-forest campsite at sunrise")
        .atmosphere_and_mood("Cozy, unhurried, a little goofy")
        .camera_style("POV, selfie stick, handheld and slightly shaky")
        .sounds(vec![
            "sizzling bacon".to_string(),
            "birdsong".to_string(),
            "crackling fire".to_string(),
        ])
        .landscape_notes("Morning mist between the pines, dew on the grass")
        .props(vec!["cast-iron pan".to_string(), "camp stove".to_string()])
        .build()
        .expect("staging builds")
}

fn unavailable() -> VeoError {
    InferenceError::new(InferenceErrorKind::ServiceUnavailable("503 from mock".to_string())).into()
}

/// Elaborator that replays drafts in order and repeats the last one.
pub struct ScriptedElaborator {
    drafts: Vec<SceneDraft>,
    requests: Mutex<Vec<ElaborationRequest>>,
}

impl ScriptedElaborator {
    pub fn new(drafts: Vec<SceneDraft>) -> Arc<Self> {
        Arc::new(Self {
            drafts,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ElaborationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl SceneElaborator for ScriptedElaborator {
    async fn draft(&self, request: &ElaborationRequest) -> VeoResult<SceneDraft> {
        let mut requests = self.requests.lock().unwrap();
        let index = requests.len().min(self.drafts.len().saturating_sub(1));
        requests.push(request.clone());
        Ok(self.drafts[index].clone())
    }
}

/// Composer returning fixed staging, optionally failing or stalling first.
pub struct ScriptedComposer {
    staging: SceneStaging,
    failures: usize,
    delay: Option<Duration>,
    scenes: Mutex<Vec<ResolvedScene>>,
}

impl ScriptedComposer {
    pub fn new(staging: SceneStaging) -> Arc<Self> {
        Self::failing(staging, 0)
    }

    /// Fails `failures` times with `ServiceUnavailable` before succeeding.
    pub fn failing(staging: SceneStaging, failures: usize) -> Arc<Self> {
        Arc::new(Self {
            staging,
            failures,
            delay: None,
            scenes: Mutex::new(Vec::new()),
        })
    }

    /// Sleeps for `delay` before every reply.
    pub fn stalling(staging: SceneStaging, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            staging,
            failures: 0,
            delay: Some(delay),
            scenes: Mutex::new(Vec::new()),
        })
    }

    pub fn scenes(&self) -> Vec<ResolvedScene> {
        self.scenes.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.scenes.lock().unwrap().len()
    }
}

#[async_trait]
impl SceneComposer for ScriptedComposer {
    async fn compose(&self, scene: &ResolvedScene) -> VeoResult<SceneStaging> {
        let call = {
            let mut scenes = self.scenes.lock().unwrap();
            scenes.push(scene.clone());
            scenes.len()
        };
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if call <= self.failures {
            return Err(unavailable());
        }
        Ok(self.staging.clone())
    }
}

/// Judge that replays verdicts in order and repeats the last one.
pub struct ScriptedJudge {
    verdicts: Vec<Verdict>,
    candidates: Mutex<Vec<String>>,
}

impl ScriptedJudge {
    pub fn new(verdicts: Vec<Verdict>) -> Arc<Self> {
        Arc::new(Self {
            verdicts,
            candidates: Mutex::new(Vec::new()),
        })
    }

    pub fn accepting() -> Arc<Self> {
        Self::new(vec![Verdict::Accept])
    }

    pub fn candidates(&self) -> Vec<String> {
        self.candidates.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.candidates.lock().unwrap().len()
    }
}

#[async_trait]
impl RealismJudge for ScriptedJudge {
    async fn judge(&self, candidate: &str) -> VeoResult<Verdict> {
        let mut candidates = self.candidates.lock().unwrap();
        let index = candidates.len().min(self.verdicts.len().saturating_sub(1));
        candidates.push(candidate.to_string());
        Ok(self.verdicts[index].clone())
    }
}

/// Responder that answers from a script and records the questions.
pub struct ScriptedResponder {
    answers: Vec<String>,
    asked: Mutex<Vec<ClarificationRequest>>,
}

impl ScriptedResponder {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Responder for scenes that must never need clarification.
    pub fn silent() -> Self {
        Self::new(&[])
    }

    pub fn asked(&self) -> Vec<ClarificationRequest> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClarificationResponder for ScriptedResponder {
    async fn answer(&self, request: &ClarificationRequest) -> VeoResult<String> {
        let mut asked = self.asked.lock().unwrap();
        asked.push(request.clone());
        Ok(self
            .answers
            .get(asked.len() - 1)
            .or_else(|| self.answers.last())
            .cloned()
            .unwrap_or_else(|| "more detail".to_string()))
    }
}

/// Driver that replays raw text replies and records requests.
pub struct MockDriver {
    replies: Vec<String>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl MockDriver {
    pub fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: replies.iter().map(|r| r.to_string()).collect(),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl VeoDriver for MockDriver {
    async fn generate(&self, req: &GenerateRequest) -> VeoResult<GenerateResponse> {
        let mut requests = self.requests.lock().unwrap();
        let index = requests.len().min(self.replies.len().saturating_sub(1));
        requests.push(req.clone());
        Ok(GenerateResponse {
            outputs: vec![Output::Text(self.replies[index].clone())],
        })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
