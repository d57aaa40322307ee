// Anchor sets, per-anchor link verdicts, and the majority tally that
// reduces a list of boolean checks to a single outcome.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::graph::UserId;

/// The configured anchor accounts, validated once at the edge: the
/// list must be non-empty and free of duplicates. Order is preserved
/// so verdicts and reports always line up with configuration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorSet {
    ids: Vec<UserId>,
}

impl AnchorSet {
    pub fn new(ids: Vec<UserId>) -> Result<Self> {
        if ids.is_empty() {
            bail!("Anchor list is empty");
        }
        for (i, id) in ids.iter().enumerate() {
            if ids[..i].contains(id) {
                bail!("Duplicate anchor id {}", id);
            }
        }
        Ok(Self { ids })
    }

    pub fn ids(&self) -> &[UserId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: UserId) -> bool {
        self.ids.contains(&id)
    }
}

/// One anchor's result within a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorCheck {
    pub anchor_id: UserId,
    pub linked: bool,
}

/// Per-anchor link outcomes for one relation, in anchor order. Starts
/// all-unlinked; evidence flips individual anchors to linked. Absent
/// or failed evidence therefore reads as "no links found".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkVerdict {
    checks: Vec<AnchorCheck>,
}

impl LinkVerdict {
    pub fn all_unlinked(anchors: &AnchorSet) -> Self {
        Self {
            checks: anchors
                .ids()
                .iter()
                .map(|&anchor_id| AnchorCheck {
                    anchor_id,
                    linked: false,
                })
                .collect(),
        }
    }

    /// Flips the given anchor to linked. Ids outside the anchor set
    /// are ignored.
    pub fn mark_linked(&mut self, anchor_id: UserId) {
        if let Some(check) = self.checks.iter_mut().find(|c| c.anchor_id == anchor_id) {
            check.linked = true;
        }
    }

    pub fn checks(&self) -> &[AnchorCheck] {
        &self.checks
    }

    pub fn linked_count(&self) -> usize {
        self.checks.iter().filter(|c| c.linked).count()
    }

    /// Collapses the verdict to one boolean by majority vote.
    pub fn reduce(&self) -> bool {
        let votes: Vec<bool> = self.checks.iter().map(|c| c.linked).collect();
        majority_vote(&votes)
    }
}

/// The tally rule shared by link verdicts and drift checks: no checks
/// at all fail, otherwise a strict majority of dissent fails and
/// everything else (ties included) passes.
pub fn majority_vote(checks: &[bool]) -> bool {
    if checks.is_empty() {
        return false;
    }
    let dissent = checks.iter().filter(|&&ok| !ok).count();
    let assent = checks.len() - dissent;
    dissent <= assent
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchors(ids: &[UserId]) -> AnchorSet {
        AnchorSet::new(ids.to_vec()).unwrap()
    }

    #[test]
    fn test_anchor_set_rejects_empty() {
        assert!(AnchorSet::new(Vec::new()).is_err());
    }

    #[test]
    fn test_anchor_set_rejects_duplicates() {
        let err = AnchorSet::new(vec![500, 501, 500]).unwrap_err();
        assert!(err.to_string().contains("Duplicate anchor id 500"));
    }

    #[test]
    fn test_anchor_set_preserves_order() {
        let set = anchors(&[503, 500, 501]);
        assert_eq!(set.ids(), &[503, 500, 501]);
    }

    #[test]
    fn test_verdict_starts_all_unlinked() {
        let verdict = LinkVerdict::all_unlinked(&anchors(&[500, 501]));
        assert!(verdict.checks().iter().all(|c| !c.linked));
        assert_eq!(verdict.linked_count(), 0);
    }

    #[test]
    fn test_mark_linked_flips_only_matching_anchor() {
        let mut verdict = LinkVerdict::all_unlinked(&anchors(&[500, 501]));
        verdict.mark_linked(501);
        verdict.mark_linked(999);
        assert_eq!(verdict.linked_count(), 1);
        assert!(!verdict.checks()[0].linked);
        assert!(verdict.checks()[1].linked);
    }

    #[test]
    fn test_majority_vote_empty_fails() {
        assert!(!majority_vote(&[]));
    }

    #[test]
    fn test_majority_vote_unanimous() {
        assert!(majority_vote(&[true, true, true]));
        assert!(!majority_vote(&[false, false, false]));
    }

    #[test]
    fn test_majority_vote_tie_passes() {
        assert!(majority_vote(&[true, false]));
        assert!(majority_vote(&[true, true, false, false]));
    }

    #[test]
    fn test_majority_vote_strict_dissent_fails() {
        assert!(!majority_vote(&[true, false, false]));
    }

    #[test]
    fn test_reduce_follows_majority() {
        let set = anchors(&[500, 501, 502]);
        let mut verdict = LinkVerdict::all_unlinked(&set);
        assert!(!verdict.reduce());

        verdict.mark_linked(500);
        // One of three linked, dissent majority.
        assert!(!verdict.reduce());

        verdict.mark_linked(502);
        assert!(verdict.reduce());
    }
}
