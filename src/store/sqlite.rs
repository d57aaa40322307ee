// SqliteStore — rusqlite backend implementing the SnapshotStore trait.
//
// The Connection sits behind a tokio::sync::Mutex: trait methods lock,
// do synchronous rusqlite work, and return without awaiting under the
// lock. The mutex also serializes writers, so a decision cycle's
// append happens at most once and never interleaves with another.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tokio::sync::Mutex;

use crate::activity::ActivitySnapshot;
use crate::decision::DecisionRecord;
use crate::graph::UserId;

use super::traits::{SnapshotStore, StoreStats};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl SnapshotStore for SqliteStore {
    async fn append(&self, snapshot: &ActivitySnapshot) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::append_snapshot(&conn, snapshot)
    }

    async fn read_history(&self, subject: UserId) -> Result<Vec<ActivitySnapshot>> {
        let conn = self.conn.lock().await;
        super::queries::read_history(&conn, subject)
    }

    async fn latest_snapshot_at(&self, subject: UserId) -> Result<Option<DateTime<Utc>>> {
        let conn = self.conn.lock().await;
        super::queries::latest_snapshot_at(&conn, subject)
    }

    async fn record_decision(&self, record: &DecisionRecord) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::insert_decision(&conn, record).map(|_| ())
    }

    async fn recent_decisions(
        &self,
        subject: Option<UserId>,
        limit: u32,
    ) -> Result<Vec<DecisionRecord>> {
        let conn = self.conn.lock().await;
        super::queries::recent_decisions(&conn, subject, limit)
    }

    async fn stats(&self) -> Result<StoreStats> {
        let conn = self.conn.lock().await;
        super::queries::stats(&conn)
    }
}
