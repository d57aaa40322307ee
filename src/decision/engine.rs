// The decision engine: validates the request, gathers the three
// evidence streams concurrently, combines them, and persists the
// audit record.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::activity::{is_consistent, SnapshotBuilder};
use crate::classify::TopicClassifier;
use crate::decision::evaluate;
use crate::decision::record::DecisionRecord;
use crate::decision::verdict::AnchorSet;
use crate::graph::{SocialGraphProvider, UserId};
use crate::store::SnapshotStore;

pub struct DecisionEngine {
    provider: Arc<dyn SocialGraphProvider>,
    store: Arc<dyn SnapshotStore>,
    builder: SnapshotBuilder,
    evidence_timeout: Duration,
}

impl DecisionEngine {
    pub fn new(
        provider: Arc<dyn SocialGraphProvider>,
        classifier: Arc<dyn TopicClassifier>,
        store: Arc<dyn SnapshotStore>,
        evidence_timeout: Duration,
    ) -> Result<Self> {
        let builder = SnapshotBuilder::new(provider.clone(), classifier)?;
        Ok(Self {
            provider,
            store,
            builder,
            evidence_timeout,
        })
    }

    /// Runs one full decision cycle for `subject` and returns the
    /// persisted audit record.
    ///
    /// Invalid requests (unset user id, empty or duplicated anchors)
    /// deny immediately without touching the graph provider or the
    /// classifier. Valid requests gather follower links, friend links
    /// and activity drift concurrently; an evidence task that exceeds
    /// the timeout counts as its conservative default. Storage
    /// failures are the one thing that aborts the cycle: an audit
    /// trail that cannot be written is a deployment fault, not
    /// evidence.
    pub async fn decide(
        &self,
        subject: UserId,
        anchor_ids: Vec<UserId>,
        since: Option<DateTime<Utc>>,
    ) -> Result<DecisionRecord> {
        if subject == 0 {
            warn!("Rejecting decision request with unset user id");
            return self
                .deny_invalid(subject, anchor_ids, "requesting user id is unset")
                .await;
        }
        let anchors = match AnchorSet::new(anchor_ids.clone()) {
            Ok(anchors) => anchors,
            Err(error) => {
                warn!(error = %error, "Rejecting decision request with bad anchor list");
                return self
                    .deny_invalid(subject, anchor_ids, &error.to_string())
                    .await;
            }
        };

        let follow_task = timeout(
            self.evidence_timeout,
            evaluate::evaluate_following(self.provider.as_ref(), subject, &anchors),
        );
        let friend_task = timeout(
            self.evidence_timeout,
            evaluate::evaluate_friends(self.provider.as_ref(), subject, &anchors),
        );
        let activity_task = timeout(
            self.evidence_timeout,
            self.activity_evidence(subject, &anchors, since),
        );

        let (follow_result, friend_result, activity_result) =
            tokio::join!(follow_task, friend_task, activity_task);

        let mut notes: Vec<String> = Vec::new();

        let follow_verdict = match follow_result {
            Ok(verdict) => Some(verdict),
            Err(_) => {
                warn!(subject, "Follower evidence timed out");
                notes.push("follower evidence timed out".to_string());
                None
            }
        };
        let friend_verdict = match friend_result {
            Ok(verdict) => Some(verdict),
            Err(_) => {
                warn!(subject, "Friend evidence timed out");
                notes.push("friend evidence timed out".to_string());
                None
            }
        };
        let activity_consistent = match activity_result {
            Ok(consistent) => consistent?,
            Err(_) => {
                warn!(subject, "Activity evidence timed out");
                notes.push("activity evidence timed out".to_string());
                false
            }
        };

        let follow_linked = follow_verdict.as_ref().map(|v| v.reduce()).unwrap_or(false);
        let friend_linked = friend_verdict.as_ref().map(|v| v.reduce()).unwrap_or(false);
        let allowed = combine_evidence(follow_linked, friend_linked, activity_consistent);

        let record = DecisionRecord {
            subject_id: subject,
            decided_at: Utc::now(),
            anchors: anchors.ids().to_vec(),
            follow_verdict,
            friend_verdict,
            follow_linked,
            friend_linked,
            activity_consistent,
            allowed,
            note: if notes.is_empty() {
                None
            } else {
                Some(notes.join("; "))
            },
        };

        self.store.record_decision(&record).await?;

        info!(
            subject,
            follow = follow_linked,
            friend = friend_linked,
            activity = activity_consistent,
            allowed,
            "Decision complete"
        );

        Ok(record)
    }

    async fn deny_invalid(
        &self,
        subject: UserId,
        anchors: Vec<UserId>,
        why: &str,
    ) -> Result<DecisionRecord> {
        let record = DecisionRecord::denied_invalid(subject, anchors, why);
        self.store.record_decision(&record).await?;
        Ok(record)
    }

    /// Builds and persists this cycle's snapshot, then reads the full
    /// history back and checks drift. Without an explicit `since`, the
    /// window starts at the subject's previous snapshot.
    async fn activity_evidence(
        &self,
        subject: UserId,
        anchors: &AnchorSet,
        since: Option<DateTime<Utc>>,
    ) -> Result<bool> {
        let baseline = match since {
            Some(at) => Some(at),
            None => self.store.latest_snapshot_at(subject).await?,
        };

        let snapshot = self.builder.build(subject, anchors.ids(), baseline).await;
        self.store.append(&snapshot).await?;

        let history = self.store.read_history(subject).await?;
        Ok(is_consistent(&history))
    }
}

/// Joins the three evidence streams into the final answer. The friend
/// link is advisory: it can confirm an allow that follower links and
/// activity already support, but never veto one.
fn combine_evidence(follow: bool, friend: bool, activity: bool) -> bool {
    if follow && friend && activity {
        true
    } else {
        follow && activity
    }
}
