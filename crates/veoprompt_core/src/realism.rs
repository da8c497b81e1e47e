//! Realism verdicts and the revision directives derived from them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The fixed rejection taxonomy.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum RealismConcern {
    /// Faces or reactions pushed past what a person would do on camera
    #[display("exaggerated expression")]
    ExaggeratedExpression,
    /// Looks drawn, animated or toy-like
    #[display("cartoonish quality")]
    CartoonishQuality,
    /// Breaks physics or anatomy
    #[display("physically implausible action")]
    ImplausibleAction,
    /// Delivered like a stage performance
    #[display("theatrical delivery")]
    TheatricalDelivery,
    /// Something that looks CGI, staged or fake
    #[display("artificial-looking element")]
    ArtificialElement,
}

impl RealismConcern {
    /// Scene fields regenerated when this concern is raised.
    pub fn affected_fields(&self) -> &'static [SceneField] {
        match self {
            RealismConcern::ExaggeratedExpression => &[SceneField::KeyActions, SceneField::Dialogue],
            RealismConcern::CartoonishQuality => &[SceneField::Description],
            RealismConcern::ImplausibleAction => &[SceneField::KeyActions],
            RealismConcern::TheatricalDelivery => &[SceneField::Dialogue, SceneField::KeyActions],
            RealismConcern::ArtificialElement => &[SceneField::Description],
        }
    }
}

/// A scene field the elaborator can regenerate in isolation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum SceneField {
    /// Overall scene description
    #[display("description")]
    Description,
    /// Spoken line
    #[display("dialogue")]
    Dialogue,
    /// Concrete actions
    #[display("key_actions")]
    KeyActions,
}

/// One reason a candidate was rejected.
///
/// # Examples
///
/// ```
/// use veoprompt_core::{RealismConcern, RejectReason};
///
/// let reason = RejectReason::new(RealismConcern::CartoonishQuality, "eyes pop out of his head");
/// assert_eq!(reason.to_string(), "cartoonish quality: eyes pop out of his head");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_more::Display,
)]
#[display("{}: {}", concern, detail)]
pub struct RejectReason {
    /// Taxonomy bucket
    concern: RealismConcern,
    /// The offending detail, quoted from the candidate where possible
    detail: String,
}

impl RejectReason {
    /// New reason with the detail trimmed.
    pub fn new(concern: RealismConcern, detail: impl Into<String>) -> Self {
        Self {
            concern,
            detail: detail.into().trim().to_string(),
        }
    }

    /// Key used to treat reworded duplicates as the same reason.
    pub fn dedupe_key(&self) -> (RealismConcern, String) {
        (self.concern, self.detail.to_lowercase())
    }
}

/// Outcome of judging one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Candidate looks like a genuine vlog clip
    Accept,
    /// Candidate was rejected for these reasons
    Reject(Vec<RejectReason>),
}

impl Verdict {
    /// Whether the candidate was accepted.
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }

    /// Combines two verdicts: reject if either rejects, with the union of
    /// reasons in first-seen order.
    pub fn union(self, other: Verdict) -> Verdict {
        match (self, other) {
            (Verdict::Accept, Verdict::Accept) => Verdict::Accept,
            (Verdict::Reject(reasons), Verdict::Accept)
            | (Verdict::Accept, Verdict::Reject(reasons)) => Verdict::Reject(dedupe(reasons)),
            (Verdict::Reject(mut first), Verdict::Reject(second)) => {
                first.extend(second);
                Verdict::Reject(dedupe(first))
            }
        }
    }
}

fn dedupe(reasons: Vec<RejectReason>) -> Vec<RejectReason> {
    let mut seen = BTreeSet::new();
    reasons
        .into_iter()
        .filter(|r| seen.insert(r.dedupe_key()))
        .collect()
}

/// Instructions for regenerating part of a rejected scene.
///
/// # Examples
///
/// ```
/// use veoprompt_core::{RealismConcern, RejectReason, RevisionDirective, SceneField};
///
/// let directive = RevisionDirective::from_reasons(vec![
///     RejectReason::new(RealismConcern::TheatricalDelivery, "bows to the camera"),
/// ]);
/// assert!(directive.fields().contains(&SceneField::Dialogue));
/// assert!(!directive.fields().contains(&SceneField::Description));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct RevisionDirective {
    /// Why the previous candidate failed
    reasons: Vec<RejectReason>,
    /// Fields to regenerate; everything else is kept
    fields: BTreeSet<SceneField>,
}

impl RevisionDirective {
    /// Directive covering every field affected by `reasons`.
    pub fn from_reasons(reasons: Vec<RejectReason>) -> Self {
        let fields = reasons
            .iter()
            .flat_map(|r| r.concern().affected_fields().iter().copied())
            .collect();
        Self { reasons, fields }
    }

    /// Whether `field` should be regenerated.
    pub fn covers(&self, field: SceneField) -> bool {
        self.fields.contains(&field)
    }
}
