// The audit record a decision cycle produces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decision::verdict::LinkVerdict;
use crate::graph::UserId;

/// Everything a reviewer needs to reconstruct one allow/deny call:
/// the evidence, the component outcomes, and the final answer. The
/// verdicts are None when that evidence was never produced, either
/// because the request failed validation or the task timed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub subject_id: UserId,
    pub decided_at: DateTime<Utc>,
    pub anchors: Vec<UserId>,
    pub follow_verdict: Option<LinkVerdict>,
    pub friend_verdict: Option<LinkVerdict>,
    pub follow_linked: bool,
    pub friend_linked: bool,
    pub activity_consistent: bool,
    pub allowed: bool,
    /// Set when something other than plain evidence shaped the outcome,
    /// such as a rejected request or a timed-out evidence task.
    pub note: Option<String>,
}

impl DecisionRecord {
    /// A denial issued before any evidence was gathered, for requests
    /// that fail validation.
    pub fn denied_invalid(subject_id: UserId, anchors: Vec<UserId>, note: &str) -> Self {
        Self {
            subject_id,
            decided_at: Utc::now(),
            anchors,
            follow_verdict: None,
            friend_verdict: None,
            follow_linked: false,
            friend_linked: false,
            activity_consistent: false,
            allowed: false,
            note: Some(note.to_string()),
        }
    }
}
