// Colored terminal output for decisions, snapshots, and audit listings.
//
// This module handles all terminal-specific formatting. The main.rs
// command handlers delegate here.

use colored::Colorize;

use crate::activity::snapshot::InteractionKind;
use crate::activity::ActivitySnapshot;
use crate::decision::{DecisionRecord, LinkVerdict};
use crate::graph::UserId;

/// Display one decision in full: outcome, per-anchor evidence, notes.
pub fn display_decision(record: &DecisionRecord) {
    println!(
        "\n{}",
        format!("=== Decision for user {} ===", record.subject_id).bold()
    );
    println!();

    let outcome = if record.allowed {
        "ALLOW".green().bold()
    } else {
        "DENY".red().bold()
    };
    println!("  Outcome: {}", outcome);
    println!(
        "  Decided: {}",
        record.decided_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();

    verdict_line("Follower links", record.follow_verdict.as_ref(), record.follow_linked);
    verdict_line("Friend links", record.friend_verdict.as_ref(), record.friend_linked);

    let activity = if record.activity_consistent {
        "consistent".green()
    } else {
        "drifted".red()
    };
    println!("  {:<16} {}", "Activity:", activity);

    if record.allowed && !record.friend_linked {
        println!(
            "\n  {}",
            "Friend links absent; allow carried by followers and activity.".dimmed()
        );
    }
    if let Some(note) = &record.note {
        println!("\n  {} {}", "Note:".yellow(), note);
    }
    println!();
}

fn verdict_line(label: &str, verdict: Option<&LinkVerdict>, passed: bool) {
    let label = format!("{label}:");
    match verdict {
        Some(verdict) => {
            let outcome = if passed { "pass".green() } else { "fail".red() };
            let anchors: Vec<String> = verdict
                .checks()
                .iter()
                .map(|check| {
                    if check.linked {
                        check.anchor_id.to_string().green().to_string()
                    } else {
                        check.anchor_id.to_string().dimmed().to_string()
                    }
                })
                .collect();
            println!(
                "  {:<16} {}/{} anchors  [{}]  {}",
                label,
                verdict.linked_count(),
                verdict.checks().len(),
                anchors.join(" "),
                outcome
            );
        }
        None => {
            println!("  {:<16} {}", label, "no evidence gathered".yellow());
        }
    }
}

/// Display one snapshot in detail: topics, favorites, interactions.
pub fn display_snapshot(snapshot: &ActivitySnapshot) {
    println!(
        "\n{}",
        format!("=== Activity snapshot for user {} ===", snapshot.subject_id).bold()
    );
    println!();
    println!(
        "  Taken:  {}",
        snapshot.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if snapshot.baseline == snapshot.generated_at {
        println!("  Window: everything available (no prior baseline)");
    } else {
        println!(
            "  Window: since {}",
            snapshot.baseline.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    println!("  Posts:  {}", snapshot.post_texts.len());

    if snapshot.topic_ranking.is_empty() {
        println!("\n  {}", "No topics determined this window.".dimmed());
    } else {
        println!("\n  Topics:");
        for (i, entry) in snapshot.topic_ranking.iter().enumerate() {
            println!("    {:>2}. {:<24} {:>4}", i + 1, entry.topic, entry.count);
        }
    }

    if !snapshot.favorites.is_empty() {
        println!("\n  Favorites ({}):", snapshot.favorites.len());
        for favorite in &snapshot.favorites {
            let topic = favorite.topic.as_deref().unwrap_or("undetermined");
            let preview = super::truncate_chars(&favorite.text, 60);
            println!("    [{}] \"{}\"", topic, preview.dimmed());
        }
    }

    if !snapshot.interactions.is_empty() {
        println!("\n  Anchor interactions:");
        for interaction in &snapshot.interactions {
            let verb = match interaction.kind {
                InteractionKind::Favorite => "favorited a post by",
            };
            println!(
                "    {} anchor {} at {}",
                verb,
                interaction.anchor_id,
                interaction.occurred_at.format("%Y-%m-%d %H:%M")
            );
        }
    }
    println!();
}

/// Display a subject's snapshot history, oldest first.
pub fn display_history(subject: UserId, history: &[ActivitySnapshot]) {
    if history.is_empty() {
        println!("No snapshots stored for user {subject}. Run `kith snapshot {subject}` first.");
        return;
    }

    println!(
        "\n{}",
        format!(
            "=== Snapshot history for user {} ({} snapshots) ===",
            subject,
            history.len()
        )
        .bold()
    );
    println!();

    for (i, snapshot) in history.iter().enumerate() {
        let topics: Vec<String> = snapshot
            .topic_ranking
            .iter()
            .take(5)
            .map(|t| format!("{}({})", t.topic, t.count))
            .collect();
        let topics = if topics.is_empty() {
            "no topics".dimmed().to_string()
        } else {
            topics.join(" ")
        };
        println!(
            "  {:>3}. {}  posts: {:>3}  favorites: {:>3}  {}",
            i + 1,
            snapshot.generated_at.format("%Y-%m-%d %H:%M"),
            snapshot.post_texts.len(),
            snapshot.favorites.len(),
            topics
        );
    }
    println!();
}

/// Display audited decisions, newest first.
pub fn display_decisions(records: &[DecisionRecord]) {
    if records.is_empty() {
        println!("No decisions recorded yet. Run `kith decide <user>` first.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Recent decisions ({}) ===", records.len()).bold()
    );
    println!();
    println!(
        "  {:<17} {:>10}  {:^6} {:^6} {:^8}  Outcome",
        "When".dimmed(),
        "User".dimmed(),
        "Follow".dimmed(),
        "Friend".dimmed(),
        "Activity".dimmed(),
    );
    println!("  {}", "-".repeat(64).dimmed());

    for record in records {
        let outcome = if record.allowed {
            "ALLOW".green().bold()
        } else {
            "DENY".red()
        };
        println!(
            "  {:<17} {:>10}  {:^6} {:^6} {:^8}  {}",
            record.decided_at.format("%Y-%m-%d %H:%M"),
            record.subject_id,
            mark(record.follow_linked),
            mark(record.friend_linked),
            mark(record.activity_consistent),
            outcome
        );
    }
    println!();
}

fn mark(ok: bool) -> colored::ColoredString {
    if ok {
        "yes".green()
    } else {
        "no".dimmed()
    }
}
