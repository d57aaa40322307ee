// Query functions operating on a rusqlite Connection.
//
// Snapshots and decision records are stored as JSON documents with the
// fields needed for ordering and filtering denormalized into columns.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::activity::ActivitySnapshot;
use crate::decision::DecisionRecord;
use crate::graph::UserId;
use crate::store::traits::StoreStats;

pub fn append_snapshot(conn: &Connection, snapshot: &ActivitySnapshot) -> Result<()> {
    let json = serde_json::to_string(snapshot).context("Failed to serialize snapshot")?;
    conn.execute(
        "INSERT INTO snapshots (subject_id, generated_at, snapshot_json)
         VALUES (?1, ?2, ?3)",
        params![
            snapshot.subject_id,
            snapshot.generated_at.timestamp_millis(),
            json
        ],
    )
    .with_context(|| {
        format!(
            "Failed to append snapshot for subject {}",
            snapshot.subject_id
        )
    })?;
    Ok(())
}

/// A subject's snapshots, oldest first.
pub fn read_history(conn: &Connection, subject: UserId) -> Result<Vec<ActivitySnapshot>> {
    let mut stmt = conn.prepare(
        "SELECT snapshot_json FROM snapshots
         WHERE subject_id = ?1
         ORDER BY generated_at ASC",
    )?;
    let rows = stmt.query_map(params![subject], |row| row.get::<_, String>(0))?;

    let mut history = Vec::new();
    for json in rows {
        let json = json?;
        let snapshot: ActivitySnapshot = serde_json::from_str(&json)
            .with_context(|| format!("Corrupt snapshot row for subject {}", subject))?;
        history.push(snapshot);
    }
    Ok(history)
}

pub fn latest_snapshot_at(conn: &Connection, subject: UserId) -> Result<Option<DateTime<Utc>>> {
    let json: Option<String> = conn
        .query_row(
            "SELECT snapshot_json FROM snapshots
             WHERE subject_id = ?1
             ORDER BY generated_at DESC
             LIMIT 1",
            params![subject],
            |row| row.get(0),
        )
        .optional()?;

    match json {
        Some(json) => {
            let snapshot: ActivitySnapshot = serde_json::from_str(&json)
                .with_context(|| format!("Corrupt snapshot row for subject {}", subject))?;
            Ok(Some(snapshot.generated_at))
        }
        None => Ok(None),
    }
}

pub fn insert_decision(conn: &Connection, record: &DecisionRecord) -> Result<i64> {
    let json = serde_json::to_string(record).context("Failed to serialize decision record")?;
    conn.execute(
        "INSERT INTO decisions
         (subject_id, decided_at, follow_linked, friend_linked,
          activity_consistent, allowed, record_json)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            record.subject_id,
            record.decided_at.timestamp_millis(),
            record.follow_linked,
            record.friend_linked,
            record.activity_consistent,
            record.allowed,
            json
        ],
    )
    .with_context(|| format!("Failed to record decision for subject {}", record.subject_id))?;
    Ok(conn.last_insert_rowid())
}

/// Audited decisions, newest first. `subject` narrows to one user.
pub fn recent_decisions(
    conn: &Connection,
    subject: Option<UserId>,
    limit: u32,
) -> Result<Vec<DecisionRecord>> {
    let mut rows: Vec<String> = Vec::new();
    match subject {
        Some(id) => {
            let mut stmt = conn.prepare(
                "SELECT record_json FROM decisions
                 WHERE subject_id = ?1
                 ORDER BY decided_at DESC, id DESC
                 LIMIT ?2",
            )?;
            let mapped = stmt.query_map(params![id, limit], |row| row.get::<_, String>(0))?;
            for json in mapped {
                rows.push(json?);
            }
        }
        None => {
            let mut stmt = conn.prepare(
                "SELECT record_json FROM decisions
                 ORDER BY decided_at DESC, id DESC
                 LIMIT ?1",
            )?;
            let mapped = stmt.query_map(params![limit], |row| row.get::<_, String>(0))?;
            for json in mapped {
                rows.push(json?);
            }
        }
    }

    let mut records = Vec::with_capacity(rows.len());
    for json in rows {
        records.push(serde_json::from_str(&json).context("Corrupt decision record row")?);
    }
    Ok(records)
}

pub fn stats(conn: &Connection) -> Result<StoreStats> {
    let snapshots: i64 = conn.query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))?;
    let subjects: i64 = conn.query_row(
        "SELECT COUNT(DISTINCT subject_id) FROM snapshots",
        [],
        |row| row.get(0),
    )?;
    let decisions: i64 = conn.query_row("SELECT COUNT(*) FROM decisions", [], |row| row.get(0))?;
    Ok(StoreStats {
        snapshots,
        subjects,
        decisions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::snapshot::TopicCount;
    use crate::store::schema::create_tables;
    use chrono::TimeZone;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    fn snapshot(subject: UserId, day: u32) -> ActivitySnapshot {
        ActivitySnapshot {
            subject_id: subject,
            generated_at: Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap(),
            baseline: Utc.with_ymd_and_hms(2024, 5, day, 0, 0, 0).unwrap(),
            topic_ranking: vec![TopicCount {
                topic: "music".to_string(),
                count: day,
            }],
            post_texts: Vec::new(),
            favorites: Vec::new(),
            interactions: Vec::new(),
        }
    }

    fn record(subject: UserId, day: u32, allowed: bool) -> DecisionRecord {
        DecisionRecord {
            subject_id: subject,
            decided_at: Utc.with_ymd_and_hms(2024, 5, day, 18, 0, 0).unwrap(),
            anchors: vec![500, 501],
            follow_verdict: None,
            friend_verdict: None,
            follow_linked: allowed,
            friend_linked: false,
            activity_consistent: allowed,
            allowed,
            note: None,
        }
    }

    #[test]
    fn test_history_reads_oldest_first() {
        let conn = test_conn();
        // Insert out of order; the read must sort by timestamp.
        append_snapshot(&conn, &snapshot(42, 3)).unwrap();
        append_snapshot(&conn, &snapshot(42, 1)).unwrap();
        append_snapshot(&conn, &snapshot(42, 2)).unwrap();

        let history = read_history(&conn, 42).unwrap();
        let days: Vec<u32> = history.iter().map(|s| s.topic_ranking[0].count).collect();
        assert_eq!(days, vec![1, 2, 3]);
    }

    #[test]
    fn test_history_is_per_subject() {
        let conn = test_conn();
        append_snapshot(&conn, &snapshot(42, 1)).unwrap();
        append_snapshot(&conn, &snapshot(77, 2)).unwrap();

        assert_eq!(read_history(&conn, 42).unwrap().len(), 1);
        assert_eq!(read_history(&conn, 77).unwrap().len(), 1);
        assert!(read_history(&conn, 99).unwrap().is_empty());
    }

    #[test]
    fn test_latest_snapshot_at() {
        let conn = test_conn();
        assert_eq!(latest_snapshot_at(&conn, 42).unwrap(), None);

        append_snapshot(&conn, &snapshot(42, 1)).unwrap();
        append_snapshot(&conn, &snapshot(42, 5)).unwrap();

        let latest = latest_snapshot_at(&conn, 42).unwrap().unwrap();
        assert_eq!(latest, Utc.with_ymd_and_hms(2024, 5, 5, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_snapshot_round_trip_preserves_content() {
        let conn = test_conn();
        let original = snapshot(42, 1);
        append_snapshot(&conn, &original).unwrap();

        let history = read_history(&conn, 42).unwrap();
        assert_eq!(history, vec![original]);
    }

    #[test]
    fn test_recent_decisions_newest_first_with_limit() {
        let conn = test_conn();
        insert_decision(&conn, &record(42, 1, false)).unwrap();
        insert_decision(&conn, &record(42, 2, true)).unwrap();
        insert_decision(&conn, &record(42, 3, true)).unwrap();

        let recent = recent_decisions(&conn, None, 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(
            recent[0].decided_at,
            Utc.with_ymd_and_hms(2024, 5, 3, 18, 0, 0).unwrap()
        );
        assert_eq!(
            recent[1].decided_at,
            Utc.with_ymd_and_hms(2024, 5, 2, 18, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_recent_decisions_filters_by_subject() {
        let conn = test_conn();
        insert_decision(&conn, &record(42, 1, true)).unwrap();
        insert_decision(&conn, &record(77, 2, false)).unwrap();

        let only_42 = recent_decisions(&conn, Some(42), 10).unwrap();
        assert_eq!(only_42.len(), 1);
        assert_eq!(only_42[0].subject_id, 42);
        assert!(only_42[0].allowed);
    }

    #[test]
    fn test_stats_counts() {
        let conn = test_conn();
        append_snapshot(&conn, &snapshot(42, 1)).unwrap();
        append_snapshot(&conn, &snapshot(42, 2)).unwrap();
        append_snapshot(&conn, &snapshot(77, 1)).unwrap();
        insert_decision(&conn, &record(42, 1, true)).unwrap();

        let stats = stats(&conn).unwrap();
        assert_eq!(stats.snapshots, 3);
        assert_eq!(stats.subjects, 2);
        assert_eq!(stats.decisions, 1);
    }
}
