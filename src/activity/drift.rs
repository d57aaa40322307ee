// Topic drift comparison across a user's snapshot history.

use tracing::debug;

use crate::activity::snapshot::ActivitySnapshot;
use crate::decision::majority_vote;

/// How many of the older snapshot's top topics are checked for
/// survival in the newer snapshot at each step.
const TOP_TOPICS_COMPARED: usize = 2;

/// Decides whether a user's interests evolved gradually across their
/// snapshot history. `history` must be ordered oldest to newest; the
/// walk runs newest-first so the freshest activity anchors the
/// comparison.
///
/// Each adjacent pair contributes up to two checks: did the older
/// snapshot's leading topics survive into the newer one? Identical
/// distributions anywhere mean the interests never moved and settle
/// the question outright. A snapshot with no topics at all makes the
/// history unusable. The collected checks then pass or fail on a
/// majority vote, ties passing.
pub fn is_consistent(history: &[ActivitySnapshot]) -> bool {
    if history.len() < 2 {
        debug!(
            snapshots = history.len(),
            "Not enough history to compare drift"
        );
        return false;
    }

    let mut checks: Vec<bool> = Vec::new();

    for pair in history.windows(2).rev() {
        let older = &pair[0];
        let newer = &pair[1];

        if older.topic_ranking.is_empty() || newer.topic_ranking.is_empty() {
            debug!("Snapshot without topics, history unusable");
            return false;
        }

        if newer.same_distribution(older) {
            debug!("Topic distributions identical, interests stable");
            return true;
        }

        for topic in older.top_topics(TOP_TOPICS_COMPARED) {
            checks.push(newer.has_topic(topic));
        }
    }

    let consistent = majority_vote(&checks);
    debug!(
        checks = checks.len(),
        consistent, "Drift comparison complete"
    );
    consistent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::snapshot::TopicCount;
    use chrono::{TimeZone, Utc};

    // Oldest-first constructor; the day index keeps timestamps ordered.
    fn snap(day: u32, topics: &[(&str, u32)]) -> ActivitySnapshot {
        ActivitySnapshot {
            subject_id: 1,
            generated_at: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
            baseline: Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap(),
            topic_ranking: topics
                .iter()
                .map(|(topic, count)| TopicCount {
                    topic: topic.to_string(),
                    count: *count,
                })
                .collect(),
            post_texts: Vec::new(),
            favorites: Vec::new(),
            interactions: Vec::new(),
        }
    }

    #[test]
    fn test_empty_history_is_inconsistent() {
        assert!(!is_consistent(&[]));
    }

    #[test]
    fn test_single_snapshot_is_inconsistent() {
        assert!(!is_consistent(&[snap(1, &[("music", 3)])]));
    }

    #[test]
    fn test_identical_distributions_short_circuit() {
        let history = vec![
            snap(1, &[("music", 3), ("news", 1)]),
            snap(2, &[("news", 1), ("music", 3)]),
        ];
        assert!(is_consistent(&history));
    }

    #[test]
    fn test_empty_ranking_in_newest_snapshot_fails() {
        let history = vec![snap(1, &[("music", 3)]), snap(2, &[])];
        assert!(!is_consistent(&history));
    }

    #[test]
    fn test_empty_ranking_in_older_snapshot_fails() {
        let history = vec![snap(1, &[]), snap(2, &[("music", 3)])];
        assert!(!is_consistent(&history));
    }

    #[test]
    fn test_top_topics_surviving_is_consistent() {
        // Older leads with music and news; both still present later.
        let history = vec![
            snap(1, &[("music", 4), ("news", 2), ("sports", 1)]),
            snap(2, &[("news", 3), ("music", 2), ("tech", 2)]),
        ];
        assert!(is_consistent(&history));
    }

    #[test]
    fn test_one_of_two_surviving_ties_to_consistent() {
        let history = vec![
            snap(1, &[("music", 3), ("news", 2), ("sports", 1)]),
            snap(2, &[("music", 4), ("tech", 2)]),
        ];
        assert!(is_consistent(&history));
    }

    #[test]
    fn test_full_topic_swap_is_inconsistent() {
        let history = vec![
            snap(1, &[("music", 3), ("news", 2)]),
            snap(2, &[("crypto", 5), ("forex", 4)]),
        ];
        assert!(!is_consistent(&history));
    }

    #[test]
    fn test_majority_across_three_snapshots() {
        // Pair (2,3): music yes, news no. Pair (1,2): music yes, sports no.
        // Two of four survive, tie passes.
        let history = vec![
            snap(1, &[("music", 3), ("sports", 2)]),
            snap(2, &[("music", 4), ("news", 1)]),
            snap(3, &[("music", 2), ("tech", 2)]),
        ];
        assert!(is_consistent(&history));
    }

    #[test]
    fn test_dissent_majority_across_three_snapshots() {
        // Pair (2,3): crypto no, forex no. Pair (1,2): music no, sports no.
        let history = vec![
            snap(1, &[("music", 3), ("sports", 2)]),
            snap(2, &[("crypto", 4), ("forex", 1)]),
            snap(3, &[("gold", 2), ("oil", 2)]),
        ];
        assert!(!is_consistent(&history));
    }

    #[test]
    fn test_single_topic_snapshot_contributes_one_check() {
        let history = vec![snap(1, &[("music", 5)]), snap(2, &[("music", 2), ("news", 1)])];
        assert!(is_consistent(&history));

        let history = vec![snap(1, &[("poetry", 5)]), snap(2, &[("music", 2), ("news", 1)])];
        assert!(!is_consistent(&history));
    }

    #[test]
    fn test_identical_pair_beats_older_drift() {
        // The two newest snapshots match exactly; the walk never
        // reaches the older mismatch.
        let history = vec![
            snap(1, &[("crypto", 9)]),
            snap(2, &[("music", 3)]),
            snap(3, &[("music", 3)]),
        ];
        assert!(is_consistent(&history));
    }
}
