//! Realism filtering: a local marker scan unioned with the remote judge, and
//! the bookkeeping for the bounded revise-and-retry loop.

use crate::retry::run_stage;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use veoprompt_config::VeoPromptConfig;
use veoprompt_core::{RealismConcern, RejectReason, ResolvedScene, RevisionDirective, Verdict};
use veoprompt_error::{ConfigError, PipelineStage, RealismError, RealismErrorKind, VeoResult};
use veoprompt_interface::RealismJudge;

const MARKERS: &[(RealismConcern, &str)] = &[
    (
        RealismConcern::CartoonishQuality,
        r"(?i)\b(cartoon\w*|animated (?:film|movie|character|style|figure)s?|anime|googly|pixar|claymation|toy-like)\b",
    ),
    (
        RealismConcern::ExaggeratedExpression,
        r"(?i)\b(jaw (?:drops|dropping|hits the floor)|eyes (?:pop|popping|bulge|bulging)|over-the-top|faints)\b",
    ),
    (
        RealismConcern::ImplausibleAction,
        r"(?i)\b(levitat\w*|teleport\w*|defies gravity|floats? (?:in|into|through) the air)\b",
    ),
    (
        RealismConcern::TheatricalDelivery,
        r"(?i)\b(dramatic(?:ally)? bows?|takes a bow|monologue|soliloquy|addresses the audience|winks at the (?:camera|audience))\b",
    ),
    (
        RealismConcern::ArtificialElement,
        r"(?i)\b(neon|cgi|hologram\w*|glowing eyes|lasers?|magic(?:al)? aura)\b",
    ),
];

/// Keyword scan over the user-controlled scene text.
///
/// Only the description, actions and dialogue are scanned. Template
/// boilerplate and composer prose would trip the markers on phrases such as
/// "no CGI".
#[derive(Debug, Clone)]
pub struct MarkerScan {
    markers: Vec<(RealismConcern, Regex)>,
}

impl MarkerScan {
    /// Compiles the built-in markers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a marker pattern fails to compile.
    pub fn new() -> Result<Self, ConfigError> {
        let mut markers = Vec::with_capacity(MARKERS.len());
        for (concern, pattern) in MARKERS {
            let regex = Regex::new(pattern).map_err(|e| {
                ConfigError::new(format!("Invalid realism marker for {}: {}", concern, e))
            })?;
            markers.push((*concern, regex));
        }
        Ok(Self { markers })
    }

    /// Scans a scene; every matched marker becomes a reject reason quoting
    /// the matched phrase.
    ///
    /// # Examples
    ///
    /// ```
    /// use veoprompt_core::{CharacterSketch, DraftAction, ResolvedScene, SceneDraft};
    /// use veoprompt_pipeline::MarkerScan;
    ///
    /// let input = SceneDraft {
    ///     description: Some("A cartoon yeti at the lake".to_string()),
    ///     characterless: true,
    ///     key_actions: vec![DraftAction::Text("waves".to_string())],
    ///     ..SceneDraft::default()
    /// }
    /// .finalize(8, "turkish")
    /// .unwrap();
    ///
    /// let verdict = MarkerScan::new().unwrap().scan(&ResolvedScene::new(input, vec![]));
    /// assert!(!verdict.is_accept());
    /// ```
    pub fn scan(&self, scene: &ResolvedScene) -> Verdict {
        let input = scene.input();
        let mut texts: Vec<&str> = vec![input.description().as_str()];
        texts.extend(input.key_actions().iter().map(|a| a.text().as_str()));
        if let Some(dialogue) = input.dialogue() {
            texts.push(dialogue.as_str());
        }

        let mut reasons = Vec::new();
        for (concern, regex) in &self.markers {
            for text in &texts {
                for found in regex.find_iter(text) {
                    reasons.push(RejectReason::new(*concern, found.as_str()));
                }
            }
        }

        if reasons.is_empty() {
            Verdict::Accept
        } else {
            Verdict::Accept.union(Verdict::Reject(reasons))
        }
    }
}

/// The realism filter stage.
#[derive(Clone)]
pub struct RealismFilter {
    judge: Arc<dyn RealismJudge>,
    markers: MarkerScan,
}

impl RealismFilter {
    /// Filter over a judge capability with the built-in markers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a marker pattern fails to compile.
    pub fn new(judge: Arc<dyn RealismJudge>) -> Result<Self, ConfigError> {
        Ok(Self {
            judge,
            markers: MarkerScan::new()?,
        })
    }

    /// Judges one candidate.
    ///
    /// The verdict rejects if either the marker scan or the judge rejects,
    /// with the reasons of both.
    #[instrument(skip_all, fields(candidate_length = candidate.len()))]
    pub async fn filter(
        &self,
        scene: &ResolvedScene,
        candidate: &str,
        config: &VeoPromptConfig,
    ) -> VeoResult<Verdict> {
        let local = self.markers.scan(scene);
        if !local.is_accept() {
            debug!(?local, "Marker scan rejected candidate");
        }
        let remote = run_stage(
            PipelineStage::Filter,
            &config.retry,
            config.timeouts.stage(),
            || self.judge.judge(candidate),
        )
        .await?;
        Ok(local.union(remote))
    }
}

/// What the filter loop should do after a reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextStep {
    /// Regenerate the affected fields and try again
    Revise(RevisionDirective),
    /// Stop: attempts exhausted or the judge repeated itself
    Stop,
}

/// Attempt and reason accumulator for the filter loop.
///
/// # Examples
///
/// ```
/// use veoprompt_core::{RealismConcern, RejectReason};
/// use veoprompt_pipeline::{AttemptLedger, NextStep};
///
/// let reason = || vec![RejectReason::new(RealismConcern::CartoonishQuality, "googly eyes")];
/// let mut ledger = AttemptLedger::new(3);
/// assert!(matches!(ledger.record_reject(reason()), NextStep::Revise(_)));
/// // Same reasons twice in a row: retrying will not help.
/// assert_eq!(ledger.record_reject(reason()), NextStep::Stop);
/// assert_eq!(ledger.attempts(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct AttemptLedger {
    max_attempts: u32,
    attempts: u32,
    accumulated: Vec<RejectReason>,
    previous: Option<BTreeSet<(RealismConcern, String)>>,
}

impl AttemptLedger {
    /// Ledger allowing `max_attempts` candidates.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            attempts: 0,
            accumulated: Vec::new(),
            previous: None,
        }
    }

    /// Records a rejected candidate and decides whether to try again.
    pub fn record_reject(&mut self, reasons: Vec<RejectReason>) -> NextStep {
        self.attempts += 1;
        let keys: BTreeSet<_> = reasons.iter().map(RejectReason::dedupe_key).collect();
        for reason in &reasons {
            let key = reason.dedupe_key();
            if !self.accumulated.iter().any(|r| r.dedupe_key() == key) {
                self.accumulated.push(reason.clone());
            }
        }

        if self.previous.as_ref() == Some(&keys) {
            warn!(attempts = self.attempts, "Identical rejection repeated; stopping early");
            return NextStep::Stop;
        }
        if self.attempts >= self.max_attempts {
            warn!(attempts = self.attempts, "Realism attempts exhausted");
            return NextStep::Stop;
        }
        self.previous = Some(keys);
        NextStep::Revise(RevisionDirective::from_reasons(reasons))
    }

    /// Candidates rejected so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Every distinct reason seen, in first-seen order, formatted for display.
    pub fn reasons(&self) -> Vec<String> {
        self.accumulated.iter().map(ToString::to_string).collect()
    }

    /// The failure to surface when the loop stops without acceptance.
    #[track_caller]
    pub fn into_error(self) -> RealismError {
        RealismError::new(RealismErrorKind::RealismValidationFailed {
            attempts: self.attempts,
            reasons: self.reasons(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veoprompt_core::{DraftAction, SceneDraft};

    fn landscape(description: &str) -> ResolvedScene {
        let input = SceneDraft {
            description: Some(description.to_string()),
            characterless: true,
            key_actions: vec![DraftAction::Text("the wind moves the reeds".to_string())],
            ..SceneDraft::default()
        }
        .finalize(8, "turkish")
        .unwrap();
        ResolvedScene::new(input, vec![])
    }

    #[test]
    fn animated_only_matches_animation_styles() {
        let scan = MarkerScan::new().unwrap();
        assert!(
            scan.scan(&landscape("Hikers in an animated conversation by the lake"))
                .is_accept()
        );
        assert_eq!(
            scan.scan(&landscape("The lake as an animated film backdrop")),
            Verdict::Reject(vec![RejectReason::new(
                RealismConcern::CartoonishQuality,
                "animated film"
            )])
        );
    }

    #[test]
    fn ledger_stops_at_the_attempt_bound() {
        let mut ledger = AttemptLedger::new(2);
        let first = vec![RejectReason::new(RealismConcern::ArtificialElement, "neon sign")];
        let second = vec![RejectReason::new(RealismConcern::ImplausibleAction, "levitates")];
        assert!(matches!(ledger.record_reject(first), NextStep::Revise(_)));
        assert_eq!(ledger.record_reject(second), NextStep::Stop);

        let err = ledger.into_error();
        assert_eq!(
            err.reasons(),
            &[
                "artificial-looking element: neon sign".to_string(),
                "physically implausible action: levitates".to_string(),
            ]
        );
    }

    #[test]
    fn reworded_case_counts_as_the_same_reason() {
        let mut ledger = AttemptLedger::new(5);
        ledger.record_reject(vec![RejectReason::new(
            RealismConcern::TheatricalDelivery,
            "Takes A Bow",
        )]);
        let next = ledger.record_reject(vec![RejectReason::new(
            RealismConcern::TheatricalDelivery,
            "takes a bow",
        )]);
        assert_eq!(next, NextStep::Stop);
        assert_eq!(ledger.reasons().len(), 1);
    }
}
