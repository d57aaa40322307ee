// Database schema — table creation and migrations.
//
// A `schema_version` table tracks which migrations have run; each
// migration is a function that executes its SQL once.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet.
///
/// This is idempotent — safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- Tracks schema version for future migrations
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Snapshot history, one JSON document per snapshot.
        -- generated_at is unix milliseconds so ordering is numeric,
        -- never lexicographic on a formatted date.
        CREATE TABLE IF NOT EXISTS snapshots (
            subject_id INTEGER NOT NULL,
            generated_at INTEGER NOT NULL,
            snapshot_json TEXT NOT NULL,
            PRIMARY KEY (subject_id, generated_at)
        );

        -- Decision audit log. Component outcomes are denormalized into
        -- integer columns so they can be filtered without parsing JSON.
        CREATE TABLE IF NOT EXISTS decisions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            subject_id INTEGER NOT NULL,
            decided_at INTEGER NOT NULL,
            follow_linked INTEGER NOT NULL,
            friend_linked INTEGER NOT NULL,
            activity_consistent INTEGER NOT NULL,
            allowed INTEGER NOT NULL,
            record_json TEXT NOT NULL
        );
        ",
    )
    .context("Failed to create database tables")?;

    // Record initial schema version if not already set
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    // Migration v2: index decisions by subject, added when per-subject
    // audit listing arrived.
    run_migration(conn, 2, |c| {
        c.execute_batch(
            "CREATE INDEX IF NOT EXISTS idx_decisions_subject
                 ON decisions(subject_id, decided_at);",
        )
    })?;

    Ok(())
}

/// Run a migration if it hasn't been applied yet.
fn run_migration<F>(conn: &Connection, version: i64, migrate: F) -> Result<()>
where
    F: FnOnce(&Connection) -> rusqlite::Result<()>,
{
    let already_applied: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM schema_version WHERE version = ?1",
        [version],
        |row| row.get(0),
    )?;

    if !already_applied {
        migrate(conn).with_context(|| format!("Migration v{version} failed"))?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )?;
    }

    Ok(())
}

/// Count the number of tables in the database (useful for init confirmation).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}
