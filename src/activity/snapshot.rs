// Activity snapshot model: what a user did since a baseline, reduced
// to ranked topics. Snapshots are persisted as JSON and compared over
// time, so everything here derives Serialize/Deserialize.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::graph::UserId;

/// One topic and how many posts landed on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCount {
    pub topic: String,
    pub count: u32,
}

/// A favorited post, with the topic the classifier assigned it.
/// `topic` is None when classification failed or came back nameless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub post_id: i64,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
    pub text: String,
    pub topic: Option<String>,
    pub probability: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Favorite,
}

/// A direct touch between the subject and one of the anchor accounts,
/// noted when a favorited post turns out to be anchor-authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorInteraction {
    pub anchor_id: UserId,
    pub kind: InteractionKind,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySnapshot {
    pub subject_id: UserId,
    /// When this snapshot was built. Also its identity within history.
    pub generated_at: DateTime<Utc>,
    /// Start of the window the activity was gathered against. A cold
    /// start has no earlier cycle, so it records the generation time.
    pub baseline: DateTime<Utc>,
    /// Topics by descending post count; ties keep first-seen order.
    pub topic_ranking: Vec<TopicCount>,
    /// Cleaned post texts that went to the classifier.
    pub post_texts: Vec<String>,
    pub favorites: Vec<FavoriteRecord>,
    pub interactions: Vec<AnchorInteraction>,
}

impl ActivitySnapshot {
    /// The `n` most frequent topics.
    pub fn top_topics(&self, n: usize) -> Vec<&str> {
        self.topic_ranking
            .iter()
            .take(n)
            .map(|t| t.topic.as_str())
            .collect()
    }

    pub fn has_topic(&self, topic: &str) -> bool {
        self.topic_ranking.iter().any(|t| t.topic == topic)
    }

    /// True when both snapshots rank exactly the same topics with the
    /// same counts, regardless of order.
    pub fn same_distribution(&self, other: &ActivitySnapshot) -> bool {
        self.topic_ranking.len() == other.topic_ranking.len()
            && self
                .topic_ranking
                .iter()
                .all(|t| other.topic_ranking.contains(t))
    }
}

/// Tallies classifier labels into a ranking: descending count, stable
/// on ties so equal-count topics keep the order they first appeared in.
pub fn rank_topics<I>(labels: I) -> Vec<TopicCount>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: Vec<TopicCount> = Vec::new();
    for label in labels {
        match counts.iter_mut().find(|c| c.topic == label) {
            Some(entry) => entry.count += 1,
            None => counts.push(TopicCount {
                topic: label,
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_rank_topics_counts_and_sorts() {
        let ranking = rank_topics(labels(&["music", "news", "music", "music", "news", "tech"]));
        assert_eq!(
            ranking,
            vec![
                TopicCount {
                    topic: "music".to_string(),
                    count: 3
                },
                TopicCount {
                    topic: "news".to_string(),
                    count: 2
                },
                TopicCount {
                    topic: "tech".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_rank_topics_ties_keep_first_seen_order() {
        let ranking = rank_topics(labels(&["tech", "music", "tech", "music"]));
        assert_eq!(ranking[0].topic, "tech");
        assert_eq!(ranking[1].topic, "music");
    }

    #[test]
    fn test_rank_topics_empty_input() {
        assert!(rank_topics(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_same_distribution_ignores_order() {
        let base = snapshot_with_topics(&[("music", 3), ("news", 1)]);
        let reordered = snapshot_with_topics(&[("news", 1), ("music", 3)]);
        let different = snapshot_with_topics(&[("music", 3), ("news", 2)]);

        assert!(base.same_distribution(&reordered));
        assert!(!base.same_distribution(&different));
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let snapshot = ActivitySnapshot {
            subject_id: 42,
            generated_at: Utc.with_ymd_and_hms(2024, 5, 4, 12, 0, 0).unwrap(),
            baseline: Utc.with_ymd_and_hms(2024, 4, 27, 12, 0, 0).unwrap(),
            topic_ranking: vec![TopicCount {
                topic: "music".to_string(),
                count: 2,
            }],
            post_texts: vec!["new single out".to_string()],
            favorites: vec![FavoriteRecord {
                post_id: 7,
                author_id: 500,
                created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
                text: "tour dates".to_string(),
                topic: Some("music".to_string()),
                probability: Some(0.81),
            }],
            interactions: vec![AnchorInteraction {
                anchor_id: 500,
                kind: InteractionKind::Favorite,
                occurred_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
            }],
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: ActivitySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
        assert!(json.contains("\"kind\":\"favorite\""));
    }

    fn snapshot_with_topics(topics: &[(&str, u32)]) -> ActivitySnapshot {
        ActivitySnapshot {
            subject_id: 1,
            generated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            baseline: Utc.with_ymd_and_hms(2023, 12, 25, 0, 0, 0).unwrap(),
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
}
