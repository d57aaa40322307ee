// Storage trait for snapshot history and decision audit records.
//
// The decision engine only sees this trait, so tests drive it with
// in-memory fakes and the backend stays swappable.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::activity::ActivitySnapshot;
use crate::decision::DecisionRecord;
use crate::graph::UserId;

/// Row counts reported by `kith status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub snapshots: i64,
    pub subjects: i64,
    pub decisions: i64,
}

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Appends one snapshot to its subject's history. A decision cycle
    /// calls this exactly once, before reading the history back.
    async fn append(&self, snapshot: &ActivitySnapshot) -> Result<()>;

    /// Full snapshot history for a subject, oldest first.
    async fn read_history(&self, subject: UserId) -> Result<Vec<ActivitySnapshot>>;

    /// When the subject's newest snapshot was taken, if any exists.
    /// Decision cycles without an explicit baseline start here.
    async fn latest_snapshot_at(&self, subject: UserId) -> Result<Option<DateTime<Utc>>>;

    /// Writes a decision to the audit log.
    async fn record_decision(&self, record: &DecisionRecord) -> Result<()>;

    /// Audited decisions, newest first, optionally for one subject.
    async fn recent_decisions(
        &self,
        subject: Option<UserId>,
        limit: u32,
    ) -> Result<Vec<DecisionRecord>>;

    async fn stats(&self) -> Result<StoreStats>;
}
