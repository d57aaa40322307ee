// System status display — shows DB stats and the last audited decision.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::store::{self, SnapshotStore, SqliteStore};

/// Display system status to the terminal.
pub async fn show(config: &Config) -> Result<()> {
    if !Path::new(&config.db_path).exists() {
        println!("Database: not initialized");
        println!("\nRun `kith init` to set up the database.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&config.db_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", config.db_path, file_size);

    let store = SqliteStore::new(store::open(&config.db_path)?);

    let stats = store.stats().await?;
    println!(
        "Snapshots: {} across {} subjects",
        stats.snapshots, stats.subjects
    );
    println!("Decisions: {} audited", stats.decisions);

    let recent = store.recent_decisions(None, 1).await?;
    match recent.first() {
        Some(record) => {
            let outcome = if record.allowed { "allow" } else { "deny" };
            println!(
                "Last decision: {} for user {} at {}",
                outcome,
                record.subject_id,
                record.decided_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
        None => {
            println!("Last decision: never");
            println!("  Run `kith decide <user>` to make one");
        }
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
