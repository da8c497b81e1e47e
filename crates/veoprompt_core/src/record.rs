//! Archived scenes.

use crate::FinalPrompt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a scene got past the realism filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RealismOutcome {
    /// The final candidate was accepted
    Accepted,
    /// Attempts ran out and degraded output was allowed; carries the reasons
    Degraded(Vec<String>),
}

/// One version of one accepted scene. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct SceneRecord {
    /// 1-based position of the scene in the session
    sequence: u32,
    /// 1-based version; corrections add a new version
    version: u32,
    /// The assembled prompt
    prompt: FinalPrompt,
    /// The prompt rendered through the template
    rendered: String,
    /// Realism filter outcome
    realism: RealismOutcome,
    /// When the version was recorded
    created_at: DateTime<Utc>,
}

impl SceneRecord {
    /// New record stamped with the current time.
    pub fn new(
        sequence: u32,
        version: u32,
        prompt: FinalPrompt,
        rendered: String,
        realism: RealismOutcome,
    ) -> Self {
        Self {
            sequence,
            version,
            prompt,
            rendered,
            realism,
            created_at: Utc::now(),
        }
    }
}
