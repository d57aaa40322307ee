// Anchor-link evidence: which anchors appear in the subject's
// follower and friend lists.

use tracing::{debug, warn};

use crate::decision::verdict::{AnchorSet, LinkVerdict};
use crate::graph::{SocialGraphProvider, UserId};

/// Checks which anchors follow the subject. Starts from an all-unlinked
/// verdict and flips each anchor found in the subject's follower list;
/// a failed lookup leaves the verdict all-unlinked, so missing evidence
/// never counts in the subject's favor.
pub async fn evaluate_following(
    provider: &dyn SocialGraphProvider,
    subject: UserId,
    anchors: &AnchorSet,
) -> LinkVerdict {
    match provider.follower_ids(subject).await {
        Ok(ids) => mark_links(anchors, &ids),
        Err(error) => {
            warn!(
                subject,
                error = %error,
                "Follower lookup failed, counting no links"
            );
            LinkVerdict::all_unlinked(anchors)
        }
    }
}

/// Checks which anchors the subject follows, over the friend list.
/// Same degradation as [`evaluate_following`].
pub async fn evaluate_friends(
    provider: &dyn SocialGraphProvider,
    subject: UserId,
    anchors: &AnchorSet,
) -> LinkVerdict {
    match provider.friend_ids(subject).await {
        Ok(ids) => mark_links(anchors, &ids),
        Err(error) => {
            warn!(
                subject,
                error = %error,
                "Friend lookup failed, counting no links"
            );
            LinkVerdict::all_unlinked(anchors)
        }
    }
}

fn mark_links(anchors: &AnchorSet, ids: &[UserId]) -> LinkVerdict {
    let mut verdict = LinkVerdict::all_unlinked(anchors);
    for &id in ids {
        if anchors.contains(id) {
            verdict.mark_linked(id);
        }
    }
    debug!(
        scanned = ids.len(),
        linked = verdict.linked_count(),
        "Marked anchor links"
    );
    verdict
}
